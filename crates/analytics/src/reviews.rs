//! Review statistics: rating distribution, average, recent digests.

use chrono::{DateTime, NaiveDateTime, Utc};
use common::{ReviewDigest, ReviewSummary, TimeWindow};
use serde_json::{Map, Value};

use crate::fields::{first_present, first_text};
use crate::numeric::try_parse_number;
use crate::window::from_local;

pub const RATING_FIELDS: &[&str] = &["rating", "grade"];
pub const DATE_FIELDS: &[&str] = &["date", "created_at", "createdAt"];
pub const TEXT_FIELDS: &[&str] = &["text", "comment"];
pub const OFFER_FIELDS: &[&str] = &["offer_id", "sku"];

const MAX_TEXT_CHARS: usize = 70;

/// Parse an API timestamp. Accepts RFC 3339 (with `Z` or an offset) and a
/// space in place of `T`. Timestamps without an offset are Moscow time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replacen(' ', "T", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(from_local)
}

/// Star rating from the first alias holding a positive number, truncated
/// to a whole star. Anything outside 1..=5 is 0 (unrated).
fn review_rating(fields: &Map<String, Value>) -> u8 {
    let stars = RATING_FIELDS
        .iter()
        .filter_map(|alias| fields.get(*alias).and_then(try_parse_number))
        .find(|value| *value > 0.0)
        .map_or(0.0, f64::trunc);

    if (1.0..=5.0).contains(&stars) {
        stars as u8
    } else {
        0
    }
}

fn shorten(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_CHARS {
        let head: String = text.chars().take(MAX_TEXT_CHARS - 3).collect();
        format!("{}…", head)
    } else {
        text.to_string()
    }
}

/// Summarize raw reviews falling inside `window`.
///
/// Reviews with a parsed date outside the window are skipped; undated ones
/// are kept. Only ratings 1..=5 count toward the distribution and average.
/// The first `recent_limit` kept reviews become digests, in input order.
pub fn summarize_reviews(records: &[Value], window: &TimeWindow, recent_limit: usize) -> ReviewSummary {
    let mut summary = ReviewSummary::default();
    let mut rating_sum = 0usize;

    for fields in records.iter().filter_map(Value::as_object) {
        let created_at = first_present(fields, DATE_FIELDS)
            .and_then(Value::as_str)
            .and_then(parse_timestamp);

        if matches!(created_at, Some(ts) if !window.contains(&ts)) {
            continue;
        }

        let rating = review_rating(fields);

        if rating > 0 {
            summary.distribution[usize::from(rating - 1)] += 1;
            summary.total += 1;
            rating_sum += usize::from(rating);
        }

        if summary.recent.len() < recent_limit {
            summary.recent.push(ReviewDigest {
                rating,
                created_at,
                offer: first_text(fields, OFFER_FIELDS).unwrap_or_default(),
                text: shorten(&first_text(fields, TEXT_FIELDS).unwrap_or_default()),
            });
        }
    }

    if summary.total > 0 {
        summary.average_rating = rating_sum as f64 / summary.total as f64;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::month_window;
    use chrono::TimeZone;
    use serde_json::json;

    fn window() -> TimeWindow {
        month_window(Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 11, 15, 7, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-11-15T07:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-11-15 10:30:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-11-15T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_distribution_and_average() {
        let reviews = vec![
            json!({"rating": 5, "date": "2025-11-19T10:00:00Z", "text": "great", "offer_id": "SKU-1"}),
            json!({"grade": "4", "created_at": "2025-11-18 09:00:00"}),
            json!({"rating": 1, "createdAt": "2025-11-02T00:00:00Z", "comment": "bad", "sku": 123}),
            json!({"rating": 5}),
            json!({"rating": 0, "text": "no rating"}),
            json!({"rating": 3, "date": "2025-10-15T10:00:00Z"}),
            json!("junk"),
        ];

        let s = summarize_reviews(&reviews, &window(), 10);
        assert_eq!(s.total, 4);
        assert_eq!(s.distribution, [1, 0, 0, 1, 2]);
        assert!((s.average_rating - 15.0 / 4.0).abs() < 1e-9);

        assert_eq!(s.recent.len(), 5, "out-of-window and non-object entries are dropped");
        assert_eq!(s.recent[0].offer, "SKU-1");
        assert_eq!(s.recent[2].offer, "123");
        assert_eq!(s.recent[2].text, "bad");
        assert_eq!(s.recent[4].rating, 0);
    }

    #[test]
    fn test_rating_falls_through_to_grade_and_truncates() {
        let reviews = vec![
            json!({"rating": 0, "grade": 3}),
            json!({"rating": null, "grade": "4,6"}),
            json!({"rating": "", "grade": 2}),
            json!({"rating": 5.9}),
            json!({"rating": 0.5}),
            json!({"grade": 7}),
        ];

        let s = summarize_reviews(&reviews, &window(), 10);
        let ratings: Vec<u8> = s.recent.iter().map(|d| d.rating).collect();
        assert_eq!(ratings, vec![3, 4, 2, 5, 0, 0]);
        assert_eq!(s.total, 4);
        assert_eq!(s.distribution, [0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_recent_limit_and_text_shortening() {
        let long = "я".repeat(100);
        let reviews = vec![
            json!({"rating": 4, "text": long}),
            json!({"rating": 2, "text": "ok"}),
        ];

        let s = summarize_reviews(&reviews, &window(), 1);
        assert_eq!(s.total, 2);
        assert_eq!(s.recent.len(), 1);
        assert_eq!(s.recent[0].text.chars().count(), MAX_TEXT_CHARS - 2);
        assert!(s.recent[0].text.ends_with('…'));
    }

    #[test]
    fn test_empty_input() {
        let s = summarize_reviews(&[], &window(), 10);
        assert_eq!(s, ReviewSummary::default());
    }
}
