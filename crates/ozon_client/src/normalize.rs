//! Payload extraction for the Seller API's inconsistent response envelopes.
//!
//! The same business payload shows up as a bare list, as `{"result": [...]}`,
//! as `{"result": {"postings": [...]}}`, under `items`, `reviews` or
//! `feedbacks`, or on a typed response struct. Extraction is total: an
//! unrecognised shape yields an empty list, never an error.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Top-level keys that may hold the record list, in resolution order.
pub const LIST_KEYS: &[&str] = &["result", "postings", "items", "reviews", "feedbacks"];

/// Keys that may hold the record list inside a `result` mapping.
pub const NESTED_LIST_KEYS: &[&str] = &["postings", "items"];

/// Read access to a response envelope, by mapping key or by named attribute.
pub trait Envelope {
    /// The envelope itself, when it already is a sequence.
    fn as_sequence(&self) -> Option<&[Value]>;

    /// A named member of the envelope.
    fn member(&self, name: &str) -> Option<&Value>;
}

impl Envelope for Value {
    fn as_sequence(&self) -> Option<&[Value]> {
        self.as_array().map(Vec::as_slice)
    }

    fn member(&self, name: &str) -> Option<&Value> {
        self.as_object()?.get(name)
    }
}

/// Typed envelope used where a response is decoded into a struct rather
/// than kept as raw JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagedEnvelope {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub postings: Option<Value>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub reviews: Option<Value>,
    #[serde(default)]
    pub feedbacks: Option<Value>,
}

impl Envelope for PagedEnvelope {
    fn as_sequence(&self) -> Option<&[Value]> {
        None
    }

    fn member(&self, name: &str) -> Option<&Value> {
        match name {
            "result" => self.result.as_ref(),
            "postings" => self.postings.as_ref(),
            "items" => self.items.as_ref(),
            "reviews" => self.reviews.as_ref(),
            "feedbacks" => self.feedbacks.as_ref(),
            _ => None,
        }
    }
}

/// Pull the record list out of a raw response.
///
/// First match wins: a bare sequence, then a top-level list key, then a
/// list nested under `result`. Anything else gives an empty list.
pub fn extract_list<E: Envelope + ?Sized>(raw: &E) -> Vec<Value> {
    if let Some(seq) = raw.as_sequence() {
        return seq.to_vec();
    }

    for key in LIST_KEYS {
        if let Some(Value::Array(list)) = raw.member(key) {
            return list.clone();
        }
    }

    if let Some(result) = raw.member("result").filter(|v| v.is_object()) {
        for key in NESTED_LIST_KEYS {
            if let Some(Value::Array(list)) = result.member(key) {
                return list.clone();
            }
        }
    }

    debug!("No record list found in response envelope; treating as empty");
    Vec::new()
}

/// Pull the business mapping out of a raw response: `result` when it is a
/// mapping, otherwise the response unchanged.
pub fn extract_map(raw: Value) -> Value {
    match raw {
        Value::Object(mut obj) => match obj.remove("result") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                obj.insert("result".into(), other);
                Value::Object(obj)
            }
            None => Value::Object(obj),
        },
        other => other,
    }
}
