//! Result set contract tests
//!
//! Exercises the public API end to end, starting from raw body text the way a
//! transport would hand it over.

use elastik_client::{Query, Response, ResponseLayout, ResultSet};
use elastik_core::JsonValue;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn from_body(body: &str) -> ResultSet {
    ResultSet::new(Arc::new(Response::new(body)), Arc::new(Query::new()))
}

fn with_hits(n: usize) -> ResultSet {
    let hits: Vec<serde_json::Value> = (0..n)
        .map(|i| json!({"_id": i.to_string(), "_source": {"n": i}}))
        .collect();
    let body = json!({"took": 1, "hits": {"total": n, "hits": hits}}).to_string();
    from_body(&body)
}

fn drain_ids(rs: &mut ResultSet) -> Vec<String> {
    let mut ids = Vec::new();
    rs.rewind();
    while rs.is_valid() {
        if let Some(id) = rs.current().and_then(|h| h.id()) {
            ids.push(id);
        }
        rs.advance();
    }
    ids
}

// ============================================================================
// Materialization
// ============================================================================

/// N records under hits.hits give N hits, in order, through every accessor
#[test]
fn test_count_matches_hit_list() {
    init_tracing();
    for n in [0usize, 1, 5, 50] {
        let mut rs = with_hits(n);
        assert_eq!(rs.count(), n);
        assert_eq!(rs.results().len(), n);

        let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        assert_eq!(drain_ids(&mut rs), expected);
        let via_iter: Vec<String> = rs.iter().filter_map(|h| h.id()).collect();
        assert_eq!(via_iter, expected);
    }
}

/// A full pass, a rewind, and a second pass yield the same hits
#[test]
fn test_iteration_is_restartable() {
    let mut rs = with_hits(3);
    let first = drain_ids(&mut rs);
    assert!(!rs.is_valid());
    assert_eq!(rs.position(), 3);

    rs.rewind();
    assert_eq!(rs.position(), 0);
    assert!(rs.is_valid());
    assert_eq!(drain_ids(&mut rs), first);
}

/// Second call returns the very same slice
#[test]
fn test_results_not_rederived() {
    let rs = with_hits(4);
    let first = rs.results();
    let second = rs.results();
    assert!(std::ptr::eq(first, second));
}

/// Each hit exposes the fields of its record
#[test]
fn test_hit_fields_survive_materialization() {
    let rs = with_hits(2);
    let hit = rs.get(1).expect("second hit");
    assert_eq!(hit.id().as_deref(), Some("1"));
    assert_eq!(hit.get("n").and_then(|v| v.coerce_u64()), Some(1));
}

// ============================================================================
// Degradation
// ============================================================================

/// Garbage bodies never fail, they just read as empty
#[test]
fn test_plain_text_body_reads_as_empty() {
    init_tracing();
    let mut rs = from_body("<html>502 Bad Gateway</html>");
    assert_eq!(rs.count(), 0);
    assert_eq!(rs.total_hits(), 0);
    assert_eq!(rs.total_time(), 0);
    assert!(!rs.has_facets());
    assert!(rs.current().is_none());
    assert!(rs.advance().is_none());
    assert!(rs.response().try_data().is_err());
}

#[test]
fn test_empty_body_reads_as_empty() {
    let rs = from_body("");
    assert_eq!(rs.count(), 0);
    assert_eq!(rs.facets(), JsonValue::empty_object());
}

#[test]
fn test_string_total_is_coerced() {
    let rs = from_body(r#"{"hits": {"total": "42", "hits": []}}"#);
    assert_eq!(rs.total_hits(), 42);
}

#[test]
fn test_missing_took_is_zero() {
    let rs = from_body(r#"{"hits": {"hits": []}}"#);
    assert_eq!(rs.total_time(), 0);
}

// ============================================================================
// Passthrough sections
// ============================================================================

#[test]
fn test_facets_reflect_raw_field() {
    let body = json!({
        "hits": {"hits": [], "total": 0},
        "facets": {"colors": {"_type": "terms", "missing": 0, "terms": []}}
    })
    .to_string();
    let rs = from_body(&body);
    assert!(rs.has_facets());
    assert_eq!(
        rs.facets().field("colors").and_then(|f| f.field("_type")).and_then(|t| t.as_str()),
        Some("terms")
    );
}

/// Error replies still produce a (empty) result set, and the error is reachable
#[test]
fn test_backend_error_visible_through_response() {
    let response = Response::new(r#"{"error": {"reason": "all shards failed"}, "status": 503}"#)
        .with_status(503);
    let rs = ResultSet::new(Arc::new(response), Arc::new(Query::new()));
    assert_eq!(rs.count(), 0);
    assert!(!rs.response().is_ok());
    assert_eq!(rs.response().error().as_deref(), Some("all shards failed"));
}

/// Layouts can be shared between result sets
#[test]
fn test_shared_layout() {
    let layout = Arc::new(ResponseLayout::default());
    let query = Arc::new(Query::from_value(json!({"query": {"match_all": {}}})));
    let a = ResultSet::with_layout(
        Arc::new(Response::from_value(json!({"hits": {"hits": [{}]}}))),
        Arc::clone(&query),
        Arc::clone(&layout),
    );
    let b = ResultSet::with_layout(
        Arc::new(Response::from_value(json!({"hits": {"hits": [{}, {}]}}))),
        Arc::clone(&query),
        Arc::clone(&layout),
    );
    assert_eq!(a.count(), 1);
    assert_eq!(b.count(), 2);
    assert!(Arc::ptr_eq(a.query(), b.query()));
}

/// Result sets can be shared across threads once built
#[test]
fn test_result_set_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResultSet>();

    let rs = Arc::new(with_hits(10));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rs = Arc::clone(&rs);
            std::thread::spawn(move || rs.count())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 10);
    }
}

// ============================================================================
// Cursor invariant
// ============================================================================

#[derive(Debug, Clone)]
enum CursorOp {
    Advance,
    Rewind,
    Current,
}

fn cursor_op() -> impl Strategy<Value = CursorOp> {
    prop_oneof![
        Just(CursorOp::Advance),
        Just(CursorOp::Rewind),
        Just(CursorOp::Current),
    ]
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(n in 0usize..8, ops in proptest::collection::vec(cursor_op(), 0..32)) {
        let mut rs = with_hits(n);
        for op in ops {
            match op {
                CursorOp::Advance => { rs.advance(); }
                CursorOp::Rewind => rs.rewind(),
                CursorOp::Current => { rs.current(); }
            }
            prop_assert!(rs.position() <= rs.count());
            prop_assert_eq!(rs.is_valid(), rs.position() < rs.count());
            prop_assert_eq!(rs.current().is_some(), rs.is_valid());
        }
    }
}
