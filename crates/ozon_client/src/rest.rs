//! REST client for the Ozon Seller API.
//!
//! Covers: posting lists (FBO/FBS), finance totals, seller info, reviews.
//! Every call is a single rate-limited POST with static credentials.

use async_trait::async_trait;
use common::config::BotConfig;
use common::{Credentials, Error, TimeWindow};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Map, Value};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::normalize::{extract_list, extract_map};
use crate::rate_limit::RateLimiter;
use crate::transport::{paginated_fetch, PageLimits, Transport};

pub const FBO_POSTINGS_PATH: &str = "/v2/posting/fbo/list";
pub const FBS_POSTINGS_PATH: &str = "/v3/posting/fbs/list";
pub const FINANCE_TOTALS_PATH: &str = "/v3/finance/transaction/totals";
pub const SELLER_INFO_PATH: &str = "/v1/seller/info";
pub const REVIEWS_PATH: &str = "/v1/review/list";

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so network failures (DNS/TLS/socket) are visible.
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

fn summarize_response_body(raw: &str) -> String {
    const MAX_CHARS: usize = 800;
    let compact = raw.replace(['\n', '\r'], " ");
    match compact.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}…", &compact[..cut]),
        None => compact,
    }
}

fn auth_headers(credentials: &Credentials) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    for (name, value) in [
        ("client-id", credentials.client_id()),
        ("api-key", credentials.api_key()),
    ] {
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Config(format!("{} contains characters not valid in a header", name)))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Filter shared by the posting list endpoints.
fn posting_filter(window: &TimeWindow, with_analytics: bool) -> Map<String, Value> {
    let mut filter = Map::new();
    filter.insert("dir".into(), json!("asc"));
    filter.insert(
        "filter".into(),
        json!({
            "since": window.since(),
            "to": window.to(),
        }),
    );
    filter.insert(
        "with".into(),
        json!({
            "analytics_data": with_analytics,
            "financial_data": false,
        }),
    );
    filter
}

/// Async REST client for the Seller API.
#[derive(Debug, Clone)]
pub struct OzonRestClient {
    client: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
    limits: PageLimits,
    limiter: RateLimiter,
}

impl OzonRestClient {
    /// Create a client from validated credentials and config.
    pub fn new(credentials: &Credentials, config: &BotConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        let base_url = normalize_base_url(&config.base_url);
        info!("Ozon Seller API: {}", base_url);

        Ok(Self {
            client,
            headers: auth_headers(credentials)?,
            base_url,
            limits: PageLimits::new(config.page_size, config.max_pages),
            limiter: RateLimiter::per_second(config.requests_per_second),
        })
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn page_limits(&self) -> PageLimits {
        self.limits
    }

    // ── Raw call ──────────────────────────────────────────────────────

    /// POST `payload` to `path` and decode the JSON response.
    ///
    /// One attempt only. Transport failures map to `Error::Http`; non-2xx
    /// statuses and undecodable bodies map to `Error::Upstream`.
    pub async fn post(&self, path: &str, payload: &Value) -> Result<Value, Error> {
        self.limiter.wait().await;

        debug!("POST {}", path);

        let resp = self
            .client
            .post(self.url(path))
            .headers(self.headers.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Http(format!("{}: {}", path, format_reqwest_error(&e))))?;

        let status = resp.status();
        let raw_body = resp
            .text()
            .await
            .map_err(|e| Error::Http(format!("{}: {}", path, format_reqwest_error(&e))))?;

        if !status.is_success() {
            warn!("{} returned HTTP {}", path, status.as_u16());
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: summarize_response_body(&raw_body),
            });
        }

        serde_json::from_str(&raw_body).map_err(|e| Error::Upstream {
            status: status.as_u16(),
            body: format!(
                "non-JSON response from {}: {}; body={}",
                path,
                e,
                summarize_response_body(&raw_body)
            ),
        })
    }

    // ── Postings ──────────────────────────────────────────────────────

    /// FBO postings created within `window`, all pages.
    pub async fn fbo_postings(&self, window: &TimeWindow) -> Result<Vec<Value>, Error> {
        let filter = posting_filter(window, true);
        paginated_fetch(self, FBO_POSTINGS_PATH, &filter, self.limits).await
    }

    /// FBS postings created within `window`, all pages.
    pub async fn fbs_postings(&self, window: &TimeWindow) -> Result<Vec<Value>, Error> {
        let filter = posting_filter(window, true);
        paginated_fetch(self, FBS_POSTINGS_PATH, &filter, self.limits).await
    }

    // ── Finance ───────────────────────────────────────────────────────

    /// Raw transaction totals for `window`, unwrapped from `result`.
    pub async fn finance_totals(&self, window: &TimeWindow) -> Result<Value, Error> {
        let payload = json!({
            "filter": {
                "transaction_type": "all",
                "posting_number": [],
                "date": {
                    "from": window.since(),
                    "to": window.to(),
                },
            }
        });

        let raw = self.post(FINANCE_TOTALS_PATH, &payload).await?;
        Ok(extract_map(raw))
    }

    // ── Account ───────────────────────────────────────────────────────

    /// Seller account info, unwrapped from `result`.
    pub async fn seller_info(&self) -> Result<Value, Error> {
        let raw = self.post(SELLER_INFO_PATH, &json!({})).await?;
        Ok(extract_map(raw))
    }

    // ── Reviews ───────────────────────────────────────────────────────

    /// Most recent reviews, newest first, in a single call.
    pub async fn reviews(&self, limit: usize) -> Result<Vec<Value>, Error> {
        let payload = json!({
            "limit": limit,
            "sort_dir": "DESC",
            "status": "ALL",
        });

        let raw = self.post(REVIEWS_PATH, &payload).await?;
        let reviews = extract_list(&raw);
        debug!("Fetched {} reviews", reviews.len());
        Ok(reviews)
    }
}

#[async_trait]
impl Transport for OzonRestClient {
    async fn post(&self, path: &str, payload: &Value) -> Result<Value, Error> {
        OzonRestClient::post(self, path, payload).await
    }
}
