//! Response layout configuration via `elastik.toml`
//!
//! A layout names where each piece of metadata lives in a decoded reply.
//! The defaults match the Elasticsearch search API; deployments that sit
//! behind a proxy rewriting the envelope can point the paths elsewhere.

use elastik_core::{Error, JsonPath, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally used for a layout.
pub const CONFIG_FILE_NAME: &str = "elastik.toml";

fn path(s: &str) -> JsonPath {
    // Only called with the literal defaults below
    s.parse().unwrap_or_default()
}

/// Field paths into a decoded search reply.
///
/// # Example
///
/// ```toml
/// hits = "hits.hits"
/// total = "hits.total"
/// took = "took"
/// facets = "facets"
/// ```
///
/// Every key is optional; missing keys take the Elasticsearch default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct ResponseLayout {
    /// Array of hit records.
    pub hits: JsonPath,
    /// Total hit count. Either a scalar or an object with a `value` member.
    pub total: JsonPath,
    /// Highest score in the page.
    pub max_score: JsonPath,
    /// Engine time in milliseconds.
    pub took: JsonPath,
    /// Timeout flag.
    pub timed_out: JsonPath,
    /// Facet results (legacy API).
    pub facets: JsonPath,
    /// Aggregation results.
    pub aggregations: JsonPath,
    /// Suggester results.
    pub suggest: JsonPath,
}

/// Layout as written in the file, before path parsing.
#[derive(Debug, Default, Deserialize)]
struct RawLayout {
    #[serde(default)]
    hits: Option<String>,
    #[serde(default)]
    total: Option<String>,
    #[serde(default)]
    max_score: Option<String>,
    #[serde(default)]
    took: Option<String>,
    #[serde(default)]
    timed_out: Option<String>,
    #[serde(default)]
    facets: Option<String>,
    #[serde(default)]
    aggregations: Option<String>,
    #[serde(default)]
    suggest: Option<String>,
}

fn parse_field(key: &str, text: Option<String>, default: JsonPath) -> Result<JsonPath> {
    let Some(text) = text else {
        return Ok(default);
    };
    text.parse::<JsonPath>().map_err(|e| Error::InvalidPath {
        key: key.to_string(),
        path: text.clone(),
        reason: e.to_string(),
    })
}

impl TryFrom<RawLayout> for ResponseLayout {
    type Error = Error;

    fn try_from(raw: RawLayout) -> Result<Self> {
        let defaults = ResponseLayout::default();
        let layout = ResponseLayout {
            hits: parse_field("hits", raw.hits, defaults.hits)?,
            total: parse_field("total", raw.total, defaults.total)?,
            max_score: parse_field("max_score", raw.max_score, defaults.max_score)?,
            took: parse_field("took", raw.took, defaults.took)?,
            timed_out: parse_field("timed_out", raw.timed_out, defaults.timed_out)?,
            facets: parse_field("facets", raw.facets, defaults.facets)?,
            aggregations: parse_field("aggregations", raw.aggregations, defaults.aggregations)?,
            suggest: parse_field("suggest", raw.suggest, defaults.suggest)?,
        };
        layout.validate()?;
        Ok(layout)
    }
}

impl Default for ResponseLayout {
    fn default() -> Self {
        Self {
            hits: path("hits.hits"),
            total: path("hits.total"),
            max_score: path("hits.max_score"),
            took: path("took"),
            timed_out: path("timed_out"),
            facets: path("facets"),
            aggregations: path("aggregations"),
            suggest: path("suggest"),
        }
    }
}

impl ResponseLayout {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# elastik response layout
#
# Dotted paths into the decoded search reply. Array elements can be
# addressed with brackets, e.g. "responses[0].hits.hits".

# Hit records (array)
hits = "hits.hits"

# Total hit count; scalar or {"value": n, "relation": "eq"}
total = "hits.total"
max_score = "hits.max_score"

# Engine time in milliseconds
took = "took"
timed_out = "timed_out"

# Opaque passthrough sections
facets = "facets"
aggregations = "aggregations"
suggest = "suggest"
"#
    }

    /// Parse a layout from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid TOML, and
    /// [`Error::InvalidPath`] naming the key and path text if a path fails
    /// to parse or the layout fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawLayout = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse layout: {}", e)))?;
        ResponseLayout::try_from(raw)
    }

    /// Read and parse a layout from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this layout to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize layout: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject layouts that could never locate hits.
    ///
    /// The hit list cannot live at the root: the root is an object, not an array.
    pub fn validate(&self) -> Result<()> {
        if self.hits.is_root() {
            return Err(Error::InvalidPath {
                key: "hits".to_string(),
                path: self.hits.to_string(),
                reason: "hits path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
