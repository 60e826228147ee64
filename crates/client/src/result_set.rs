//! Lazy, iterable view over one search reply
//!
//! A [`ResultSet`] pairs a [`Response`] with the [`Query`] that produced it.
//! Hits are materialized from the decoded payload the first time they are
//! needed and memoized; metadata accessors (total hits, took, facets) read the
//! payload directly on every call.
//!
//! Two iteration styles are offered:
//! - the cursor protocol (`rewind` / `is_valid` / `current` / `advance` /
//!   `position`), which is forward-only and restartable
//! - native iteration over `&ResultSet`, which leaves the cursor alone
//!
//! # Invariants
//!
//! - The hit sequence is built at most once per result set.
//! - The cursor stays within `[0, count()]`; `count()` means exhausted.
//! - Nothing here fails. Missing or malformed fields read as empty/zero.

use crate::config::ResponseLayout;
use crate::hit::Hit;
use crate::query::Query;
use crate::response::Response;
use elastik_core::JsonValue;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Results of one executed search.
#[derive(Debug)]
pub struct ResultSet {
    response: Arc<Response>,
    query: Arc<Query>,
    layout: Arc<ResponseLayout>,
    results: OnceCell<Vec<Hit>>,
    position: usize,
}

impl ResultSet {
    /// Create a result set using the default Elasticsearch layout
    pub fn new(response: Arc<Response>, query: Arc<Query>) -> Self {
        Self::with_layout(response, query, Arc::new(ResponseLayout::default()))
    }

    /// Create a result set reading fields from a custom layout
    pub fn with_layout(
        response: Arc<Response>,
        query: Arc<Query>,
        layout: Arc<ResponseLayout>,
    ) -> Self {
        ResultSet {
            response,
            query,
            layout,
            results: OnceCell::new(),
            position: 0,
        }
    }

    // ========================================================================
    // Hits
    // ========================================================================

    /// All hits, in reply order.
    ///
    /// Built on first call from the array at the layout's hits path; anything
    /// else there (missing, null, an object) yields no hits.
    pub fn results(&self) -> &[Hit] {
        self.results.get_or_init(|| self.materialize())
    }

    fn materialize(&self) -> Vec<Hit> {
        let data = self.response.data();
        let hits: Vec<Hit> = match data.at(&self.layout.hits) {
            Some(value) => match value.as_array() {
                Some(records) => records.iter().cloned().map(Hit::new).collect(),
                None => {
                    if !value.is_null() {
                        tracing::warn!(
                            target: "elastik::results",
                            path = %self.layout.hits,
                            "Hit list is not an array; treating as empty"
                        );
                    }
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        tracing::debug!(
            target: "elastik::results",
            count = hits.len(),
            "Materialized hits"
        );
        hits
    }

    /// Number of hits in this page
    pub fn count(&self) -> usize {
        self.results().len()
    }

    /// Alias of [`count`](Self::count)
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Whether this page has no hits
    pub fn is_empty(&self) -> bool {
        self.results().is_empty()
    }

    /// Hit at `index`, independent of the cursor
    pub fn get(&self, index: usize) -> Option<&Hit> {
        self.results().get(index)
    }

    /// Iterate over all hits without moving the cursor
    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.results().iter()
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Total number of matching documents across all pages.
    ///
    /// Reads the layout's total path. Accepts a number, a numeric string, or
    /// the object form `{"value": n, "relation": "eq"}`. Anything else is 0.
    pub fn total_hits(&self) -> u64 {
        let Some(total) = self.response.data().at(&self.layout.total) else {
            return 0;
        };
        let count = match total.field("value") {
            Some(value) => value.coerce_u64(),
            None => total.coerce_u64(),
        };
        count.unwrap_or(0)
    }

    /// Engine time in milliseconds, 0 when absent
    pub fn total_time(&self) -> u64 {
        self.response
            .data()
            .at(&self.layout.took)
            .and_then(JsonValue::coerce_u64)
            .unwrap_or(0)
    }

    /// Highest score in this page; `None` when absent or null
    pub fn max_score(&self) -> Option<f64> {
        self.response
            .data()
            .at(&self.layout.max_score)
            .and_then(JsonValue::coerce_f64)
    }

    /// Whether the backend stopped early on its timeout
    pub fn has_timed_out(&self) -> bool {
        self.response
            .data()
            .at(&self.layout.timed_out)
            .and_then(JsonValue::coerce_bool)
            .unwrap_or(false)
    }

    /// Whether the reply carries facet results
    pub fn has_facets(&self) -> bool {
        self.passthrough(&self.layout.facets).is_some()
    }

    /// Facet results as sent, or an empty object
    pub fn facets(&self) -> &JsonValue {
        self.passthrough(&self.layout.facets)
            .unwrap_or_else(|| JsonValue::empty_object())
    }

    /// Whether the reply carries aggregation results
    pub fn has_aggregations(&self) -> bool {
        self.passthrough(&self.layout.aggregations).is_some()
    }

    /// Aggregation results as sent, or an empty object
    pub fn aggregations(&self) -> &JsonValue {
        self.passthrough(&self.layout.aggregations)
            .unwrap_or_else(|| JsonValue::empty_object())
    }

    /// A single named aggregation
    pub fn aggregation(&self, name: &str) -> Option<&JsonValue> {
        self.aggregations().field(name)
    }

    /// Whether the reply carries suggester results
    pub fn has_suggests(&self) -> bool {
        self.passthrough(&self.layout.suggest).is_some()
    }

    /// Suggester results as sent, or an empty object
    pub fn suggests(&self) -> &JsonValue {
        self.passthrough(&self.layout.suggest)
            .unwrap_or_else(|| JsonValue::empty_object())
    }

    // A present-but-null section counts as absent
    fn passthrough(&self, path: &elastik_core::JsonPath) -> Option<&JsonValue> {
        self.response.data().at(path).filter(|v| !v.is_null())
    }

    /// The reply these results were read from
    pub fn response(&self) -> &Arc<Response> {
        &self.response
    }

    /// The query that produced these results
    pub fn query(&self) -> &Arc<Query> {
        &self.query
    }

    /// The field layout in use
    pub fn layout(&self) -> &ResponseLayout {
        &self.layout
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Hit under the cursor, or `None` once exhausted
    pub fn current(&self) -> Option<&Hit> {
        self.results().get(self.position)
    }

    /// Move the cursor forward and return the hit now under it.
    ///
    /// The cursor stops at `count()`; advancing an exhausted set is a no-op.
    pub fn advance(&mut self) -> Option<&Hit> {
        let len = self.count();
        if self.position < len {
            self.position += 1;
        }
        self.current()
    }

    /// Cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether a hit exists under the cursor
    pub fn is_valid(&self) -> bool {
        self.current().is_some()
    }

    /// Reset the cursor to the first hit. Memoized hits are kept.
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
