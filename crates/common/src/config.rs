//! Bot configuration types.

use serde::{Deserialize, Serialize};

/// Production Seller API host.
pub const DEFAULT_BASE_URL: &str = "https://api-seller.ozon.ru";

/// Allowed per-call timeout range, in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 15;
pub const MAX_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Ozon seller `Client-Id`.
    #[serde(default)]
    pub client_id: String,

    /// Ozon seller `Api-Key`.
    #[serde(default)]
    pub api_key: String,

    /// Seller API base URL, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout. Must stay within 15..=30 seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Records requested per page on list endpoints.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Hard cap on page requests for one fetch.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Client-side request quota.
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Review list size requested from the API.
    #[serde(default = "default_review_fetch_limit")]
    pub review_fetch_limit: usize,

    /// Number of recent reviews kept in a review summary.
    #[serde(default = "default_recent_reviews")]
    pub recent_reviews: usize,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> usize {
    1000
}
fn default_max_pages() -> usize {
    60
}
fn default_rps() -> u32 {
    10
}
fn default_review_fetch_limit() -> usize {
    100
}
fn default_recent_reviews() -> usize {
    10
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            api_key: String::new(),
            base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            requests_per_second: default_rps(),
            review_fetch_limit: default_review_fetch_limit(),
            recent_reviews: default_recent_reviews(),
        }
    }
}
