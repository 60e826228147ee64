//! Result views over search backend responses
//!
//! This crate provides:
//! - Response: raw reply plus lazily decoded payload
//! - Query: opaque executed request body
//! - Hit: accessors over one matched document
//! - ResultSet: lazy, memoized, cursor-iterable view over a reply's hits
//! - ResponseLayout: configurable field paths (`elastik.toml`)
//!
//! # Usage
//!
//! ```
//! use elastik_client::{Query, Response, ResultSet};
//! use std::sync::Arc;
//!
//! let response = Response::new(r#"{"took": 5, "hits": {"total": 2, "hits": [{"_id": "a"}, {"_id": "b"}]}}"#);
//! let mut results = ResultSet::new(Arc::new(response), Arc::new(Query::new()));
//!
//! assert_eq!(results.count(), 2);
//! assert_eq!(results.total_hits(), 2);
//!
//! results.rewind();
//! while let Some(hit) = results.current() {
//!     assert!(hit.id().is_some());
//!     results.advance();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod hit;
pub mod query;
pub mod response;
pub mod result_set;

// Re-export commonly used types
pub use config::{ResponseLayout, CONFIG_FILE_NAME};
pub use hit::Hit;
pub use query::Query;
pub use response::Response;
pub use result_set::ResultSet;
