//! Unified error type for seller-analytics.
//!
//! Only configuration and upstream failures are errors. Odd payload shapes
//! and unparseable numbers are absorbed by the normalizer and the numeric
//! parser and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Ozon API error (status={status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures that came from talking to the seller API.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Upstream { .. })
    }

    /// Upstream HTTP status, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
