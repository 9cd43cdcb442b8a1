//! Aggregation crate.
//!
//! Turns normalized Seller API records into display-ready summaries:
//! reporting windows, tolerant number parsing, order and finance totals,
//! review statistics.

pub mod fields;
pub mod finance;
pub mod numeric;
pub mod orders;
pub mod reviews;
pub mod window;

pub use finance::compute_totals;
pub use numeric::{parse_number, parse_number_str, try_parse_number};
pub use orders::{
    classify_cancelled, compute_order_value, order_record, status_breakdown, summarize,
    summarize_values,
};
pub use reviews::summarize_reviews;
pub use window::{day_window, month_window, to_wire};
