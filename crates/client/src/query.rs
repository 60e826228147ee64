//! The executed query, carried alongside its results
//!
//! Query construction happens elsewhere. A result set only needs to hand the
//! query back to the caller, so this is an opaque holder of the request body.

use elastik_core::{JsonValue, Result};

/// Body of an executed search request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    body: JsonValue,
}

impl Query {
    /// An empty query body (`{}`), which the backend treats as match-all
    pub fn new() -> Self {
        Query {
            body: JsonValue::object(),
        }
    }

    /// Wrap an existing request body
    pub fn from_value(body: impl Into<JsonValue>) -> Self {
        Query { body: body.into() }
    }

    /// Parse a request body from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`elastik_core::Error::Decode`] if the text is not JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Query {
            body: text.parse::<JsonValue>()?,
        })
    }

    /// Borrow the request body
    pub fn as_value(&self) -> &JsonValue {
        &self.body
    }

    /// Unwrap into the request body
    pub fn into_value(self) -> JsonValue {
        self.body
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::new()
    }
}

impl From<serde_json::Value> for Query {
    fn from(v: serde_json::Value) -> Self {
        Query::from_value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elastik_core::Error;
    use serde_json::json;

    #[test]
    fn test_new_is_empty_object() {
        let q = Query::new();
        assert_eq!(q.as_value(), &JsonValue::object());
        assert_eq!(q, Query::default());
    }

    #[test]
    fn test_from_json_str() {
        let q = Query::from_json_str(r#"{"query": {"match_all": {}}, "size": 5}"#).unwrap();
        assert_eq!(q.as_value().field("size").and_then(|v| v.coerce_u64()), Some(5));
        assert_eq!(
            q.into_value(),
            JsonValue::from(json!({"query": {"match_all": {}}, "size": 5}))
        );
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(matches!(Query::from_json_str("{query"), Err(Error::Decode(_))));
    }
}
