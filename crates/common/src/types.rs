//! Domain types shared across the workspace.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::Error;

// ── Credentials ───────────────────────────────────────────────────────

/// Static Seller API credentials, loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    api_key: String,
}

impl Credentials {
    /// Both values are required; blank strings are rejected.
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self, Error> {
        let client_id = client_id.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        if client_id.is_empty() {
            return Err(Error::Config(
                "OZON_CLIENT_ID is required (set in .env or environment)".into(),
            ));
        }
        if api_key.is_empty() {
            return Err(Error::Config(
                "OZON_API_KEY is required (set in .env or environment)".into(),
            ));
        }

        Ok(Self { client_id, api_key })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ── Time windows ──────────────────────────────────────────────────────

/// Serialize an instant the way the Seller API expects it:
/// UTC, second precision, trailing `Z` (`2025-11-14T21:00:00Z`).
pub fn to_wire<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Half-open reporting interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl TimeWindow {
    /// Wire form of `start`.
    pub fn since(&self) -> String {
        to_wire(&self.start)
    }

    /// Wire form of `end`.
    pub fn to(&self) -> String {
        to_wire(&self.end)
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant < self.end
    }
}

// ── Orders ────────────────────────────────────────────────────────────

/// One posting as reported by a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Dedup key. Empty when the upstream record carried no identifier.
    pub id: String,
    pub status: String,
    pub raw_fields: Map<String, Value>,
}

/// Order counts and values for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total_count: usize,
    pub ok_count: usize,
    pub cancelled_count: usize,
    pub total_value: f64,
    pub ok_value: f64,
    pub average_check: f64,
}

// ── Finance ───────────────────────────────────────────────────────────

/// Named totals derived from `/v3/finance/transaction/totals`.
///
/// Approximation for display, not double-entry bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FinancialTotals {
    pub accrued: f64,
    pub sales: f64,
    pub expenses: f64,
    pub profit: f64,
}

// ── Reviews ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDigest {
    pub rating: u8,
    pub created_at: Option<DateTime<Utc>>,
    pub offer: String,
    pub text: String,
}

/// Rating statistics for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewSummary {
    /// Reviews with a rating in 1..=5.
    pub total: usize,
    pub average_rating: f64,
    /// Counts for 1★ through 5★.
    pub distribution: [usize; 5],
    pub recent: Vec<ReviewDigest>,
}
