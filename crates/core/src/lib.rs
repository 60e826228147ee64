//! Core types for elastik
//!
//! This crate defines the foundational types used by the client layer:
//! - JsonValue: Loosely-typed wrapper over decoded backend payloads
//! - JsonPath: Dotted field paths (`hits.hits`, `hits.total.value`)
//! - get_at_path: Non-failing traversal
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;

pub use error::{Error, Result};
pub use json::{get_at_path, JsonPath, JsonValue, PathParseError, PathSegment};
