//! elastik - result views for search backend replies
//!
//! elastik wraps a completed search reply and exposes its matched documents,
//! hit counts, timing and facet/aggregation data as an iterable collection.
//! It does no networking: a transport hands over the body text, elastik reads it.
//!
//! # Quick Start
//!
//! ```
//! use elastik::{Query, Response, ResultSet};
//! use std::sync::Arc;
//!
//! let body = r#"{"took": 5, "hits": {"total": 2, "hits": [{"_id": "1"}, {"_id": "2"}]}}"#;
//! let results = ResultSet::new(Arc::new(Response::new(body)), Arc::new(Query::new()));
//!
//! assert_eq!(results.count(), 2);
//! assert_eq!(results.total_time(), 5);
//! for hit in &results {
//!     assert!(hit.id().is_some());
//! }
//! ```
//!
//! # Architecture
//!
//! - `elastik-core`: loosely-typed JSON access, field paths, errors
//! - `elastik-client`: response, query, hit and result set types

pub use elastik_client::*;
pub use elastik_core::{get_at_path, Error, JsonPath, JsonValue, PathParseError, PathSegment, Result};
