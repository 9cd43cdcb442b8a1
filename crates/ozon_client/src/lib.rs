//! Ozon Seller API client library.
//!
//! Authenticated POST access, offset pagination, and normalization of the
//! API's many response envelopes into plain record lists and mappings.

pub mod normalize;
pub mod rate_limit;
pub mod rest;
pub mod transport;

pub use normalize::{extract_list, extract_map, Envelope, PagedEnvelope};
pub use rate_limit::RateLimiter;
pub use rest::OzonRestClient;
pub use transport::{paginated_fetch, PageLimits, Transport};
