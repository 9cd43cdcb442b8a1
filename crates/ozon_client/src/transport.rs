//! Request seam and offset pagination.
//!
//! `paginated_fetch` only needs something that can POST a JSON payload and
//! hand back the decoded response, so it is written against `Transport`
//! and driven by a stub upstream in tests.

use async_trait::async_trait;
use common::Error;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::normalize::extract_list;

/// Default records per page on list endpoints.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default hard cap on page requests for one fetch.
pub const DEFAULT_MAX_PAGES: usize = 60;

/// One authenticated POST against the Seller API.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, payload: &Value) -> Result<Value, Error>;
}

/// Page size and page cap for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub page_size: usize,
    pub max_pages: usize,
}

impl PageLimits {
    pub fn new(page_size: usize, max_pages: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGES)
    }
}

/// Fetch every record of an offset-paginated list endpoint.
///
/// Each request is `filter` plus `limit` and `offset`. Pages are requested
/// one after another and concatenated in request order. The loop ends on a
/// short (or empty) page or once `max_pages` requests have been made. A
/// failed page fails the whole fetch.
pub async fn paginated_fetch<T: Transport + ?Sized>(
    transport: &T,
    path: &str,
    filter: &Map<String, Value>,
    limits: PageLimits,
) -> Result<Vec<Value>, Error> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    for page_no in 1..=limits.max_pages {
        let mut payload = filter.clone();
        payload.insert("limit".into(), Value::from(limits.page_size));
        payload.insert("offset".into(), Value::from(offset));

        let raw = transport.post(path, &Value::Object(payload)).await?;
        let page = extract_list(&raw);
        let count = page.len();
        records.extend(page);

        debug!(
            "{}: page {} returned {} records (total: {})",
            path,
            page_no,
            count,
            records.len()
        );

        if count < limits.page_size {
            info!("{}: fetched {} records in {} pages", path, records.len(), page_no);
            return Ok(records);
        }

        if page_no == limits.max_pages {
            warn!(
                "{}: stopped at page cap ({} pages, {} records); upstream kept returning full pages",
                path,
                limits.max_pages,
                records.len()
            );
        }

        offset += limits.page_size;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Upstream double: serves queued responses and records every request.
    struct StubUpstream {
        responses: Mutex<VecDeque<Result<Value, Error>>>,
        requests: Mutex<Vec<Value>>,
    }

    impl StubUpstream {
        fn new(responses: Vec<Result<Value, Error>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubUpstream {
        async fn post(&self, _path: &str, payload: &Value) -> Result<Value, Error> {
            self.requests.lock().unwrap().push(payload.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"result": []})))
        }
    }

    fn page(start: usize, len: usize) -> Value {
        let postings: Vec<Value> = (start..start + len)
            .map(|i| json!({"posting_number": format!("P-{}", i)}))
            .collect();
        json!({"result": postings})
    }

    fn filter() -> Map<String, Value> {
        let mut filter = Map::new();
        filter.insert("dir".into(), json!("asc"));
        filter.insert("filter".into(), json!({"since": "a", "to": "b"}));
        filter
    }

    #[tokio::test]
    async fn test_stops_after_empty_page() {
        let stub = StubUpstream::new(vec![
            Ok(page(0, 3)),
            Ok(page(3, 3)),
            Ok(page(6, 3)),
            Ok(json!({"result": []})),
            Ok(page(100, 3)),
        ]);

        let records = paginated_fetch(&stub, "/v2/posting/fbo/list", &filter(), PageLimits::new(3, 60))
            .await
            .expect("fetch should succeed");

        assert_eq!(records.len(), 9);
        let ids: Vec<&str> = records
            .iter()
            .map(|r| r["posting_number"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["P-0", "P-1", "P-2", "P-3", "P-4", "P-5", "P-6", "P-7", "P-8"]);

        let requests = stub.requests();
        assert_eq!(requests.len(), 4, "no page-5 request expected");
        let offsets: Vec<u64> = requests.iter().map(|r| r["offset"].as_u64().unwrap()).collect();
        assert_eq!(offsets, vec![0, 3, 6, 9]);
        assert!(requests.iter().all(|r| r["limit"] == json!(3)));
        assert!(requests.iter().all(|r| r["dir"] == json!("asc")));
    }

    #[tokio::test]
    async fn test_short_page_ends_fetch() {
        let stub = StubUpstream::new(vec![Ok(page(0, 2)), Ok(page(2, 1))]);

        let records = paginated_fetch(&stub, "/p", &filter(), PageLimits::new(2, 60))
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(stub.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_page_cap_bounds_misbehaving_upstream() {
        let stub = StubUpstream::new((0..10).map(|i| Ok(page(i * 2, 2))).collect());

        let records = paginated_fetch(&stub, "/p", &filter(), PageLimits::new(2, 4))
            .await
            .unwrap();

        assert_eq!(records.len(), 8);
        assert_eq!(stub.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_page_fails_whole_fetch() {
        let stub = StubUpstream::new(vec![
            Ok(page(0, 2)),
            Err(Error::Upstream {
                status: 500,
                body: "boom".into(),
            }),
            Ok(page(4, 1)),
        ]);

        let err = paginated_fetch(&stub, "/p", &filter(), PageLimits::new(2, 60))
            .await
            .expect_err("second page failure must propagate");

        assert_eq!(err.status(), Some(500));
        assert_eq!(stub.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mixed_envelopes_across_pages() {
        let stub = StubUpstream::new(vec![
            Ok(json!([{"posting_number": "A"}, {"posting_number": "B"}])),
            Ok(json!({"result": {"postings": [{"posting_number": "C"}]}})),
        ]);

        let records = paginated_fetch(&stub, "/v3/posting/fbs/list", &filter(), PageLimits::new(2, 60))
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["posting_number"], json!("C"));
    }

    #[test]
    fn test_page_limits_never_zero() {
        assert_eq!(PageLimits::new(0, 0), PageLimits::new(1, 1));
        assert_eq!(PageLimits::default(), PageLimits::new(1000, 60));
    }
}
