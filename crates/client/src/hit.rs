//! A single matched document

use elastik_core::{JsonPath, JsonValue};

/// One record from a reply's hit list.
///
/// The raw record is kept as-is. Accessors read the well-known metadata keys
/// (`_id`, `_score`, `_source`, ...) and fall back to `None` or an empty object
/// when a key is missing or has an unexpected type.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    raw: JsonValue,
}

impl Hit {
    /// Wrap a raw hit record
    pub fn new(raw: impl Into<JsonValue>) -> Self {
        Hit { raw: raw.into() }
    }

    /// The raw record
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    /// Unwrap into the raw record
    pub fn into_raw(self) -> JsonValue {
        self.raw
    }

    /// Document id (`_id`). Numeric ids are rendered as strings.
    pub fn id(&self) -> Option<String> {
        self.raw.field("_id").and_then(JsonValue::coerce_string)
    }

    /// Index the document lives in (`_index`)
    pub fn index(&self) -> Option<&str> {
        self.raw.field("_index").and_then(|v| v.as_str())
    }

    /// Mapping type (`_type`), absent on typeless indices
    pub fn doc_type(&self) -> Option<&str> {
        self.raw.field("_type").and_then(|v| v.as_str())
    }

    /// Relevance score (`_score`); `None` when null, e.g. for sorted queries
    pub fn score(&self) -> Option<f64> {
        self.raw.field("_score").and_then(JsonValue::coerce_f64)
    }

    /// Document version (`_version`), present when the query asked for it
    pub fn version(&self) -> Option<u64> {
        self.raw.field("_version").and_then(JsonValue::coerce_u64)
    }

    /// Stored document (`_source`)
    pub fn source(&self) -> &JsonValue {
        self.object_field("_source")
    }

    /// Requested stored fields (`fields`)
    pub fn fields(&self) -> &JsonValue {
        self.object_field("fields")
    }

    /// Highlight fragments (`highlight`)
    pub fn highlights(&self) -> &JsonValue {
        self.object_field("highlight")
    }

    /// Scoring explanation (`_explanation`)
    pub fn explanation(&self) -> &JsonValue {
        self.object_field("_explanation")
    }

    /// Any top-level key of the raw record
    pub fn param(&self, name: &str) -> Option<&JsonValue> {
        self.raw.field(name)
    }

    /// Whether the raw record has a non-null `name`
    pub fn has_param(&self, name: &str) -> bool {
        self.raw.has_field(name)
    }

    /// A field of the stored document.
    ///
    /// `field` may be a dotted path (`user.name`). Text that does not parse
    /// as a path is looked up as a single literal key.
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        match field.parse::<JsonPath>() {
            Ok(path) if !path.is_root() => self.source().at(&path),
            _ => self.source().field(field),
        }
    }

    fn object_field(&self, key: &str) -> &JsonValue {
        self.raw
            .field(key)
            .filter(|v| v.is_object())
            .unwrap_or_else(|| JsonValue::empty_object())
    }
}

impl From<serde_json::Value> for Hit {
    fn from(v: serde_json::Value) -> Self {
        Hit::new(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Hit {
        Hit::from(json!({
            "_index": "products",
            "_type": "doc",
            "_id": "42",
            "_score": 1.25,
            "_version": 3,
            "_source": {"name": "lamp", "brand": {"name": "acme"}},
            "highlight": {"name": ["<em>lamp</em>"]},
            "sort": [17]
        }))
    }

    #[test]
    fn test_metadata_accessors() {
        let hit = sample();
        assert_eq!(hit.id().as_deref(), Some("42"));
        assert_eq!(hit.index(), Some("products"));
        assert_eq!(hit.doc_type(), Some("doc"));
        assert_eq!(hit.score(), Some(1.25));
        assert_eq!(hit.version(), Some(3));
    }

    #[test]
    fn test_source_field_lookup() {
        let hit = sample();
        assert_eq!(hit.get("name").and_then(|v| v.as_str()), Some("lamp"));
        assert_eq!(hit.get("brand.name").and_then(|v| v.as_str()), Some("acme"));
        assert!(hit.get("missing").is_none());
        assert!(hit.get("").is_none());
    }

    #[test]
    fn test_unparseable_field_is_literal_key() {
        let hit = Hit::from(json!({"_source": {"a..b": 1}}));
        assert_eq!(hit.get("a..b").and_then(|v| v.coerce_i64()), Some(1));
    }

    #[test]
    fn test_object_sections_default_to_empty() {
        let hit = sample();
        assert!(hit.highlights().is_object());
        assert_eq!(hit.fields(), JsonValue::empty_object());
        assert_eq!(hit.explanation(), JsonValue::empty_object());
    }

    #[test]
    fn test_params() {
        let hit = sample();
        assert!(hit.has_param("sort"));
        assert!(!hit.has_param("matched_queries"));
        assert_eq!(hit.param("sort"), Some(&JsonValue::from(json!([17]))));
    }

    #[test]
    fn test_sparse_record_defaults() {
        let hit = Hit::from(json!({"id": 1}));
        assert!(hit.id().is_none());
        assert!(hit.score().is_none());
        assert!(hit.version().is_none());
        assert_eq!(hit.source(), JsonValue::empty_object());
        assert_eq!(hit.param("id").and_then(|v| v.coerce_i64()), Some(1));
    }

    #[test]
    fn test_non_object_record() {
        let hit = Hit::new(JsonValue::from(json!("just a string")));
        assert!(hit.id().is_none());
        assert_eq!(hit.source(), JsonValue::empty_object());
        assert_eq!(hit.clone().into_raw(), JsonValue::from(json!("just a string")));
    }

    #[test]
    fn test_numeric_id_rendered_as_string() {
        let hit = Hit::from(json!({"_id": 7, "_score": null}));
        assert_eq!(hit.id().as_deref(), Some("7"));
        assert!(hit.score().is_none());
    }
}
