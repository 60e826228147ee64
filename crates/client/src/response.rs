//! Raw backend replies
//!
//! A [`Response`] holds the body text the transport received plus whatever
//! transfer metadata it recorded. The body is decoded on first use and the
//! decoded payload is cached for the lifetime of the response.

use elastik_core::{Error, JsonPath, JsonValue, Result};
use once_cell::sync::OnceCell;
use std::time::Duration;

/// A completed reply from the search backend.
#[derive(Debug, Default)]
pub struct Response {
    body: String,
    status: Option<u16>,
    query_time: Option<Duration>,
    data: OnceCell<Decoded>,
}

#[derive(Debug)]
struct Decoded {
    value: JsonValue,
    // Set when the body failed to parse and `value` is the degraded form
    error: Option<String>,
}

impl Response {
    /// Create a response from raw body text.
    pub fn new(body: impl Into<String>) -> Self {
        Response {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Create a response from an already decoded payload.
    ///
    /// The body text is the payload's compact JSON form.
    pub fn from_value(value: impl Into<JsonValue>) -> Self {
        let value = value.into();
        Response {
            body: value.to_json_string(),
            data: OnceCell::with_value(Decoded { value, error: None }),
            ..Default::default()
        }
    }

    /// Builder: record the HTTP status
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder: record the round-trip time measured by the transport
    pub fn with_query_time(mut self, elapsed: Duration) -> Self {
        self.query_time = Some(elapsed);
        self
    }

    /// Raw body text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// HTTP status, if recorded
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Round-trip time, if recorded
    pub fn query_time(&self) -> Option<Duration> {
        self.query_time
    }

    /// Decoded payload.
    ///
    /// An empty body decodes to an empty object. A body that is not JSON
    /// (proxies and load balancers answer with plain text) degrades to
    /// `{"message": <body>}` so lookups keep working.
    pub fn data(&self) -> &JsonValue {
        &self.decoded().value
    }

    /// Decoded payload, failing if the body is not JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body does not parse.
    pub fn try_data(&self) -> Result<&JsonValue> {
        let decoded = self.decoded();
        match &decoded.error {
            Some(msg) => Err(Error::Decode(msg.clone())),
            None => Ok(&decoded.value),
        }
    }

    fn decoded(&self) -> &Decoded {
        self.data.get_or_init(|| match decode(&self.body) {
            Ok(value) => Decoded { value, error: None },
            Err(e) => {
                tracing::debug!(
                    target: "elastik::response",
                    error = %e,
                    body_len = self.body.len(),
                    "Response body is not JSON; wrapping as message"
                );
                Decoded {
                    value: JsonValue::from(serde_json::json!({ "message": self.body })),
                    error: Some(e.to_string()),
                }
            }
        })
    }

    /// Error reported by the backend, if any.
    ///
    /// Older servers send a string; newer ones an object with a `reason`.
    /// Objects without a `reason` are rendered as JSON text.
    pub fn error(&self) -> Option<String> {
        let err = self.data().field("error")?;
        if err.is_null() {
            return None;
        }
        if let Some(s) = err.as_str() {
            return Some(s.to_string());
        }
        err.field("reason")
            .and_then(|r| r.coerce_string())
            .or_else(|| Some(err.to_json_string()))
    }

    /// Whether the backend reported an error
    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    /// True when no error is reported and the status, if known, is 2xx
    pub fn is_ok(&self) -> bool {
        !self.has_error() && self.status.map_or(true, |s| (200..300).contains(&s))
    }

    /// Engine time in milliseconds (`took`), 0 when absent
    pub fn engine_time(&self) -> u64 {
        self.data()
            .field("took")
            .and_then(JsonValue::coerce_u64)
            .unwrap_or(0)
    }

    /// Shard statistics (`_shards`), if present
    pub fn shards_statistics(&self) -> Option<&JsonValue> {
        self.data().field("_shards")
    }

    /// Look up an arbitrary path in the decoded payload
    pub fn lookup(&self, path: &JsonPath) -> Option<&JsonValue> {
        self.data().at(path)
    }

    /// Convert a backend error reply into an [`Error::Backend`].
    pub fn into_result(self) -> Result<Self> {
        match self.error() {
            Some(reason) => Err(Error::Backend {
                status: self.status,
                reason,
            }),
            None => Ok(self),
        }
    }
}

fn decode(body: &str) -> std::result::Result<JsonValue, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(JsonValue::object());
    }
    body.parse::<JsonValue>()
}
