//! Order aggregation: dedup, cancellation heuristic, order value, summary.

use common::{AggregateSummary, OrderRecord};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::fields::{first_present, first_text};
use crate::numeric::parse_number;

// ── Alias tables ──────────────────────────────────────────────────────

pub const ID_FIELDS: &[&str] = &["posting_number", "order_id", "order_number", "id"];
pub const STATUS_FIELDS: &[&str] = &["status", "state"];
pub const ANALYTICS_FIELDS: &[&str] = &["analytics_data", "analytics"];
pub const ANALYTICS_TOTAL_FIELDS: &[&str] = &["total_price", "price_total", "total"];
pub const LINE_ITEM_FIELDS: &[&str] = &["products", "items"];
pub const QUANTITY_FIELDS: &[&str] = &["quantity", "offer_quantity", "items_count"];
pub const UNIT_PRICE_FIELDS: &[&str] = &["price", "client_price", "original_price"];

/// Build an `OrderRecord` from one raw posting. Returns `None` when the
/// record is not a mapping.
pub fn order_record(raw: &Value) -> Option<OrderRecord> {
    let fields = raw.as_object()?;

    Some(OrderRecord {
        id: first_text(fields, ID_FIELDS).unwrap_or_default(),
        status: first_text(fields, STATUS_FIELDS).unwrap_or_default(),
        raw_fields: fields.clone(),
    })
}

fn analytics_total(fields: &Map<String, Value>) -> Option<f64> {
    let analytics = first_present(fields, ANALYTICS_FIELDS)?.as_object()?;
    let total = parse_number(first_present(analytics, ANALYTICS_TOTAL_FIELDS)?);
    (total > 0.0).then_some(total)
}

fn line_items_total(fields: &Map<String, Value>) -> f64 {
    let Some(items) = first_present(fields, LINE_ITEM_FIELDS).and_then(Value::as_array) else {
        return 0.0;
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let quantity = first_present(item, QUANTITY_FIELDS).map_or(0.0, parse_number);
            let unit_price = first_present(item, UNIT_PRICE_FIELDS).map_or(0.0, parse_number);
            quantity * unit_price
        })
        .sum()
}

/// Value of one order: the analytics total price when present and positive,
/// else the sum of `quantity × unit price` over its line items.
pub fn compute_order_value(record: &OrderRecord) -> f64 {
    analytics_total(&record.raw_fields).unwrap_or_else(|| line_items_total(&record.raw_fields))
}

/// Any status containing "cancel", case-insensitively. The status vocabulary
/// is unstable across endpoints, so this is a substring match on purpose.
pub fn classify_cancelled(record: &OrderRecord) -> bool {
    record.status.to_lowercase().contains("cancel")
}

/// Keep the first record per id. Records without an id are never merged.
pub fn dedupe(records: &[OrderRecord]) -> Vec<&OrderRecord> {
    let mut seen: HashSet<&str> = HashSet::new();
    let distinct: Vec<&OrderRecord> = records
        .iter()
        .filter(|r| r.id.is_empty() || seen.insert(r.id.as_str()))
        .collect();

    if distinct.len() != records.len() {
        debug!(
            "Dropped {} duplicate records ({} distinct)",
            records.len() - distinct.len(),
            distinct.len()
        );
    }
    distinct
}

/// Counts and values over the distinct records.
pub fn summarize(records: &[OrderRecord]) -> AggregateSummary {
    let mut summary = AggregateSummary::default();

    for record in dedupe(records) {
        let value = compute_order_value(record);
        summary.total_count += 1;
        summary.total_value += value;

        if classify_cancelled(record) {
            summary.cancelled_count += 1;
        } else {
            summary.ok_value += value;
        }
    }

    summary.ok_count = summary.total_count - summary.cancelled_count;
    summary.average_check = if summary.ok_count > 0 {
        summary.ok_value / summary.ok_count as f64
    } else {
        0.0
    };
    summary
}

/// `summarize` over raw postings. Non-mapping entries are skipped.
pub fn summarize_values(raw: &[Value]) -> AggregateSummary {
    let records: Vec<OrderRecord> = raw.iter().filter_map(order_record).collect();
    if records.len() != raw.len() {
        debug!("Skipped {} non-object posting entries", raw.len() - records.len());
    }
    summarize(&records)
}

/// Distinct records per lower-cased status (empty status as "unknown").
pub fn status_breakdown(records: &[OrderRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in dedupe(records) {
        let status = match record.status.trim() {
            "" => "unknown".to_string(),
            s => s.to_lowercase(),
        };
        *counts.entry(status).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> OrderRecord {
        order_record(&v).expect("object record")
    }

    fn posting(id: &str, status: &str, price: &str, qty: i64) -> OrderRecord {
        record(json!({
            "posting_number": id,
            "status": status,
            "products": [{"price": price, "quantity": qty}],
        }))
    }

    #[test]
    fn test_order_record_resolves_aliases() {
        let r = record(json!({"order_id": 77, "state": "delivered"}));
        assert_eq!(r.id, "77");
        assert_eq!(r.status, "delivered");

        let r = record(json!({"status": "awaiting_packaging"}));
        assert!(r.id.is_empty());
        assert!(order_record(&json!("not an object")).is_none());
    }

    #[test]
    fn test_value_prefers_positive_analytics_total() {
        let r = record(json!({
            "posting_number": "1",
            "analytics_data": {"total_price": "2 500,00"},
            "products": [{"price": "100", "quantity": 1}],
        }));
        assert_eq!(compute_order_value(&r), 2500.0);

        let r = record(json!({
            "posting_number": "2",
            "analytics_data": {"total_price": 0},
            "products": [{"price": "100", "quantity": 3}],
        }));
        assert_eq!(compute_order_value(&r), 300.0);
    }

    #[test]
    fn test_value_sums_line_items_with_aliases() {
        let r = record(json!({
            "posting_number": "1",
            "items": [
                {"offer_quantity": 2, "client_price": "150,5"},
                {"quantity": null, "items_count": 3, "price": null, "original_price": 10},
                {"quantity": 1},
                "junk"
            ],
        }));
        assert_eq!(compute_order_value(&r), 2.0 * 150.5 + 3.0 * 10.0);

        assert_eq!(compute_order_value(&record(json!({"posting_number": "x"}))), 0.0);
    }

    #[test]
    fn test_cancel_classification_is_substring() {
        assert!(classify_cancelled(&posting("1", "cancelled", "1", 1)));
        assert!(classify_cancelled(&posting("1", "CANCELED_BY_CLIENT", "1", 1)));
        assert!(classify_cancelled(&posting("1", "not_accepted_cancel", "1", 1)));
        assert!(!classify_cancelled(&posting("1", "delivered", "1", 1)));
        assert!(!classify_cancelled(&posting("1", "", "1", 1)));
    }

    #[test]
    fn test_summarize_dedupes_keeping_first() {
        let records = vec![
            posting("A", "delivered", "100", 1),
            posting("A", "delivered", "999", 1),
            posting("B", "cancelled", "50", 2),
            posting("C", "delivering", "300", 1),
        ];

        let s = summarize(&records);
        assert_eq!(s.total_count, 3);
        assert_eq!(s.cancelled_count, 1);
        assert_eq!(s.ok_count, 2);
        assert_eq!(s.total_value, 100.0 + 100.0 + 300.0);
        assert_eq!(s.ok_value, 400.0);
        assert_eq!(s.average_check, 200.0);
    }

    #[test]
    fn test_records_without_id_are_not_merged() {
        let records = vec![
            record(json!({"status": "delivered", "products": [{"price": 10, "quantity": 1}]})),
            record(json!({"status": "delivered", "products": [{"price": 20, "quantity": 1}]})),
        ];
        let s = summarize(&records);
        assert_eq!(s.total_count, 2);
        assert_eq!(s.total_value, 30.0);
    }

    #[test]
    fn test_average_check_zero_without_ok_orders() {
        let s = summarize(&[posting("A", "cancelled", "100", 1)]);
        assert_eq!(s.ok_count, 0);
        assert_eq!(s.average_check, 0.0);
        assert_eq!(s.total_value, 100.0);

        assert_eq!(summarize(&[]), AggregateSummary::default());
    }

    #[test]
    fn test_summarize_values_skips_non_objects() {
        let raw = vec![
            json!({"posting_number": "A", "status": "delivered", "products": [{"price": "10", "quantity": 2}]}),
            json!(42),
            json!({"posting_number": "A", "status": "cancelled"}),
        ];
        let s = summarize_values(&raw);
        assert_eq!(s.total_count, 1);
        assert_eq!(s.ok_value, 20.0);
    }

    #[test]
    fn test_status_breakdown() {
        let records = vec![
            posting("A", "delivered", "1", 1),
            posting("A", "cancelled", "1", 1),
            posting("B", "Delivered", "1", 1),
            posting("C", "cancelled", "1", 1),
            record(json!({"posting_number": "D"})),
        ];
        let counts = status_breakdown(&records);
        assert_eq!(counts.get("delivered"), Some(&2));
        assert_eq!(counts.get("cancelled"), Some(&1));
        assert_eq!(counts.get("unknown"), Some(&1));
    }
}
