//! Loosely-typed JSON access for decoded backend payloads
//!
//! This module defines the types every payload lookup goes through:
//! - JsonValue: Newtype wrapper around serde_json::Value
//! - JsonPath: Path into a JSON document (e.g., `hits.hits` or `hits.hits[0]._id`)
//! - PathSegment: Individual path component (Key or Index)
//! - get_at_path: Non-failing traversal
//!
//! Backend replies are never trusted to match a schema. Every accessor is an
//! existence check plus a lenient coercion that yields `None` instead of
//! failing, and callers pick their own default.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use thiserror::Error;

static EMPTY_OBJECT: Lazy<JsonValue> = Lazy::new(JsonValue::object);

// =============================================================================
// JsonValue
// =============================================================================

/// JSON value wrapper
///
/// Newtype around serde_json::Value providing:
/// - Direct access to underlying serde_json::Value via Deref
/// - Lenient numeric coercion (`"42"` reads as 42)
/// - Serialization/deserialization support
///
/// # Examples
///
/// ```
/// use elastik_core::JsonValue;
///
/// let n: JsonValue = serde_json::json!("42").into();
/// assert_eq!(n.coerce_i64(), Some(42));
///
/// let obj = JsonValue::object();
/// assert!(obj.is_object());
/// assert_eq!(obj.coerce_i64(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct JsonValue(serde_json::Value);

impl JsonValue {
    /// Create a null value
    pub fn null() -> Self {
        JsonValue(serde_json::Value::Null)
    }

    /// Create an empty object
    pub fn object() -> Self {
        JsonValue(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Shared empty object, used as the default for absent map-shaped fields
    pub fn empty_object() -> &'static JsonValue {
        &EMPTY_OBJECT
    }

    /// Wrap a serde_json::Value
    pub fn from_value(value: serde_json::Value) -> Self {
        JsonValue(value)
    }

    /// View a borrowed serde_json::Value as a JsonValue
    pub fn from_ref(value: &serde_json::Value) -> &JsonValue {
        // SAFETY: JsonValue is #[repr(transparent)] over serde_json::Value, so
        // both types share layout and alignment. The returned reference keeps
        // the lifetime of the input reference.
        unsafe { &*(value as *const serde_json::Value as *const JsonValue) }
    }

    /// Borrow the inner serde_json::Value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Serialize to a compact JSON string
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    /// Look up a top-level key of an object
    ///
    /// Returns `None` for non-objects and missing keys.
    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.0.as_object()?.get(key).map(JsonValue::from_ref)
    }

    /// Whether this value is an object containing `key`
    ///
    /// A key holding `null` does not count as present.
    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).map_or(false, |v| !v.is_null())
    }

    /// Look up a value at a path; see [`get_at_path`]
    pub fn at(&self, path: &JsonPath) -> Option<&JsonValue> {
        get_at_path(self, path)
    }

    /// Coerce to a signed integer
    ///
    /// - integers are returned as-is (u64 above `i64::MAX` saturates)
    /// - floats are truncated toward zero
    /// - strings are trimmed and parsed as an integer, then as a float
    /// - booleans read as 0 or 1
    /// - null, arrays and objects yield `None`
    pub fn coerce_i64(&self) -> Option<i64> {
        match &self.0 {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|_| i64::MAX))
                .or_else(|| n.as_f64().and_then(truncate_f64)),
            serde_json::Value::String(s) => parse_integer(s),
            serde_json::Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Coerce to an unsigned integer
    ///
    /// Same rules as [`coerce_i64`](Self::coerce_i64); negative readings yield `None`.
    pub fn coerce_u64(&self) -> Option<u64> {
        if let Some(n) = self.0.as_u64() {
            return Some(n);
        }
        self.coerce_i64().and_then(|n| u64::try_from(n).ok())
    }

    /// Coerce to a float
    ///
    /// Numbers and numeric strings only. Non-finite strings yield `None`.
    pub fn coerce_f64(&self) -> Option<f64> {
        match &self.0 {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Coerce to a boolean
    ///
    /// Accepts booleans, `"true"`/`"false"` strings and integers (non-zero is true).
    pub fn coerce_bool(&self) -> Option<bool> {
        match &self.0 {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            serde_json::Value::Number(n) => n.as_i64().map(|i| i != 0),
            _ => None,
        }
    }

    /// Render a scalar as a string
    ///
    /// Strings are returned verbatim, numbers and booleans in their JSON form.
    pub fn coerce_string(&self) -> Option<String> {
        match &self.0 {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn truncate_f64(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t >= i64::MAX as f64 {
        Some(i64::MAX)
    } else if t <= i64::MIN as f64 {
        Some(i64::MIN)
    } else {
        Some(t as i64)
    }
}

fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(truncate_f64))
}

impl FromStr for JsonValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(JsonValue)
    }
}

// Deref to access serde_json::Value methods directly
impl Deref for JsonValue {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Default is null
impl Default for JsonValue {
    fn default() -> Self {
        JsonValue::null()
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(v: serde_json::Value) -> Self {
        JsonValue(v)
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(v: JsonValue) -> Self {
        v.0
    }
}

impl PartialEq<serde_json::Value> for JsonValue {
    fn eq(&self, other: &serde_json::Value) -> bool {
        &self.0 == other
    }
}

// =============================================================================
// JsonPath and PathSegment
// =============================================================================

/// Error type for JSON path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// A segment in a JSON path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key: `.foo`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

/// A path into a JSON document
///
/// | Syntax | Meaning | Example |
/// |--------|---------|---------|
/// | `key` | Object property | `took` |
/// | `key1.key2` | Nested property | `hits.total` |
/// | `key[n]` | Property then index | `hits.hits[0]` |
/// | (empty) | Root | `` |
///
/// Keys may contain any character except `.`, `[` and `]`, so field names
/// such as `@timestamp` parse as a single key. Paths serialize as their
/// string form, which is how they appear in configuration files.
///
/// # Examples
///
/// ```
/// use elastik_core::JsonPath;
///
/// let total = JsonPath::root().key("hits").key("total");
/// let parsed: JsonPath = "hits.total".parse().unwrap();
/// assert_eq!(parsed, total);
/// assert_eq!(parsed.to_string(), "hits.total");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        JsonPath {
            segments: Vec::new(),
        }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Convert to a string representation
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                PathSegment::Key(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                PathSegment::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
            }
        }
        result
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Supported syntax:
    /// - `foo` or `.foo` - object key
    /// - `[0]` - array index
    /// - `foo.bar` - nested keys
    /// - `foo[0].bar` - mixed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        // Skip leading dot if present
        if chars.first() == Some(&'.') {
            i += 1;
            if i >= chars.len() {
                return Err(PathParseError::EmptyKey(i));
            }
        }

        while i < chars.len() {
            match chars[i] {
                '[' => {
                    let start = i;
                    i += 1;
                    let idx_start = i;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(PathParseError::UnclosedBracket(start));
                    }
                    let idx_str: String = chars[idx_start..i].iter().collect();
                    let idx = idx_str
                        .parse::<usize>()
                        .map_err(|_| PathParseError::InvalidIndex(idx_start, idx_str))?;
                    segments.push(PathSegment::Index(idx));
                    i += 1;
                }
                '.' => {
                    // Separator must be followed by a key or an index
                    i += 1;
                    if i >= chars.len() || chars[i] == '.' {
                        return Err(PathParseError::EmptyKey(i));
                    }
                }
                ']' => return Err(PathParseError::UnexpectedChar(']', i)),
                c if i > 0 && chars[i - 1] == ']' => {
                    // A key after an index needs a '.' separator
                    return Err(PathParseError::UnexpectedChar(c, i));
                }
                _ => {
                    let key_start = i;
                    while i < chars.len() && !matches!(chars[i], '.' | '[' | ']') {
                        i += 1;
                    }
                    let key: String = chars[key_start..i].iter().collect();
                    segments.push(PathSegment::Key(key));
                }
            }
        }

        Ok(JsonPath { segments })
    }
}

impl TryFrom<String> for JsonPath {
    type Error = PathParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<JsonPath> for String {
    fn from(path: JsonPath) -> Self {
        path.to_path_string()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

// =============================================================================
// Path Traversal
// =============================================================================

/// Get value at path within a JSON document
///
/// # Returns
///
/// * `Some(&JsonValue)` - Reference to the value at the path
/// * `None` - If the path doesn't exist or a segment meets the wrong container type
///
/// # Examples
///
/// ```
/// use elastik_core::{get_at_path, JsonPath, JsonValue};
///
/// let doc: JsonValue = serde_json::json!({"hits": {"total": 7}}).into();
/// let total = get_at_path(&doc, &"hits.total".parse().unwrap());
/// assert_eq!(total.and_then(|v| v.coerce_i64()), Some(7));
/// assert!(get_at_path(&doc, &"hits.hits".parse::<JsonPath>().unwrap()).is_none());
/// ```
pub fn get_at_path<'a>(value: &'a JsonValue, path: &JsonPath) -> Option<&'a JsonValue> {
    let mut current: &serde_json::Value = value.as_inner();

    for segment in path.segments() {
        current = match (segment, current) {
            (PathSegment::Key(key), serde_json::Value::Object(obj)) => obj.get(key)?,
            (PathSegment::Index(idx), serde_json::Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }

    Some(JsonValue::from_ref(current))
}
