//! Financial totals from `/v3/finance/transaction/totals`.
//!
//! The API reports deductions (commission, logistics, refunds, services)
//! as negative amounts. Formulas:
//!
//! - `sales    = accruals_for_sale + refunds_and_cancellations`
//! - `expenses = |sale_commission| + |processing_and_delivery| + max(0, refunds_and_cancellations)
//!              + |services_amount| + |others_amount|`
//! - `accrued  = sum of all seven fields, signed`
//! - `profit   = accrued - expenses`
//!
//! An approximation for display, not bookkeeping.

use common::FinancialTotals;
use ozon_client::extract_map;
use serde_json::Value;

use crate::numeric::parse_number;

pub const ACCRUALS_FOR_SALE: &str = "accruals_for_sale";
pub const SALE_COMMISSION: &str = "sale_commission";
pub const PROCESSING_AND_DELIVERY: &str = "processing_and_delivery";
pub const REFUNDS_AND_CANCELLATIONS: &str = "refunds_and_cancellations";
pub const SERVICES_AMOUNT: &str = "services_amount";
pub const OTHERS_AMOUNT: &str = "others_amount";
pub const COMPENSATION_AMOUNT: &str = "compensation_amount";

/// Reduce a raw totals response (bare or wrapped in `result`) to named totals.
pub fn compute_totals(raw: &Value) -> FinancialTotals {
    let totals = extract_map(raw.clone());
    let field = |name: &str| totals.get(name).map_or(0.0, parse_number);

    let accruals = field(ACCRUALS_FOR_SALE);
    let commission = field(SALE_COMMISSION);
    let delivery = field(PROCESSING_AND_DELIVERY);
    let refunds = field(REFUNDS_AND_CANCELLATIONS);
    let services = field(SERVICES_AMOUNT);
    let others = field(OTHERS_AMOUNT);
    let compensation = field(COMPENSATION_AMOUNT);

    let sales = accruals + refunds;
    let expenses =
        commission.abs() + delivery.abs() + refunds.max(0.0) + services.abs() + others.abs();
    let accrued = accruals + commission + delivery + refunds + services + others + compensation;

    FinancialTotals {
        accrued,
        sales,
        expenses,
        profit: accrued - expenses,
    }
}
