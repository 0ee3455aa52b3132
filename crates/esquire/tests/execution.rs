//! End-to-end tests of terminal operations against an in-memory transport.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;

use esquire::query::SearchRequest;
use esquire::{
    Document, Error, GetRequest, Hit, Model, QueryConfig, ScrollRequest, Searcher, Transport,
    TransportError,
};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};

// ============================================================================
// Recording transport
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Search(SearchRequest),
    Get(GetRequest),
    Scroll(ScrollRequest),
    Clear(String),
}

/// Replays queued responses in order and records every call.
#[derive(Default)]
struct Recording {
    responses: RefCell<VecDeque<Result<Value, TransportError>>>,
    calls: RefCell<Vec<Call>>,
}

impl Recording {
    fn with(responses: Vec<Result<Value, TransportError>>) -> Self {
        Recording {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn next(&self) -> Result<Value, TransportError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Transport for Recording {
    fn search(&self, request: &SearchRequest) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push(Call::Search(request.clone()));
        self.next()
    }

    fn get(&self, request: &GetRequest) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push(Call::Get(request.clone()));
        self.next()
    }

    fn scroll(&self, request: &ScrollRequest) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push(Call::Scroll(request.clone()));
        self.next()
    }

    fn clear_scroll(&self, scroll_id: &str) -> Result<(), TransportError> {
        self.calls
            .borrow_mut()
            .push(Call::Clear(scroll_id.to_string()));
        self.next().map(|_| ())
    }
}

fn hits(sources: &[(&str, Value)]) -> Value {
    let hits: Vec<Value> = sources
        .iter()
        .map(|(id, source)| json!({"_index": "posts", "_id": id, "_score": 1.0, "_source": source}))
        .collect();
    json!({
        "took": 2,
        "timed_out": false,
        "hits": {"total": {"value": hits.len(), "relation": "eq"}, "max_score": 1.0, "hits": hits}
    })
}

#[derive(Debug, Deserialize, PartialEq)]
struct Post {
    title: String,
    #[serde(default)]
    views: u64,
}

// ============================================================================
// get
// ============================================================================

#[test]
fn get_sends_assembled_request() {
    let transport = Recording::with(vec![Ok(hits(&[("1", json!({"title": "a"}))]))]);
    let searcher = Searcher::new(&transport);

    let query = searcher
        .index("posts")
        .where_op("views", ">", 100)
        .order_desc("views")
        .take(5)
        .skip(10);
    searcher.get::<Hit>(&query).unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let Call::Search(request) = &calls[0] else {
        panic!("expected a search call, got {:?}", calls[0]);
    };
    assert_eq!(request.index.as_deref(), Some("posts"));
    assert_eq!(request.size, 5);
    assert_eq!(request.from, 10);
    assert_eq!(
        request.body,
        json!({
            "query": {"bool": {"filter": [{"range": {"views": {"gt": 100}}}]}},
            "sort": [{"views": "desc"}]
        })
    );
}

#[test]
fn get_hydrates_typed_documents_in_order() {
    let transport = Recording::with(vec![Ok(hits(&[
        ("3", json!({"title": "third", "views": 3})),
        ("1", json!({"title": "first", "views": 1})),
    ]))]);
    let searcher = Searcher::new(&transport);

    let results = searcher
        .get::<Document<Post>>(&searcher.index("posts"))
        .unwrap();

    assert_eq!(results.total, 2);
    assert_eq!(results.took, 2);
    let titles: Vec<_> = results.iter().map(|d| d.source.title.as_str()).collect();
    assert_eq!(titles, ["third", "first"]);
}

#[test]
fn get_reports_hydration_failures() {
    let transport = Recording::with(vec![Ok(hits(&[("9", json!({"views": 1}))]))]);
    let searcher = Searcher::new(&transport);

    let err = searcher
        .get::<Document<Post>>(&searcher.query())
        .unwrap_err();
    assert!(matches!(err, Error::Hydrate { ref id, .. } if id == "9"));
}

#[test]
fn get_propagates_transport_errors() {
    let transport = Recording::with(vec![Err(TransportError::status(500))]);
    let searcher = Searcher::new(&transport);

    let err = searcher.get::<Hit>(&searcher.query()).unwrap_err();
    match err {
        Error::Transport(inner) => assert_eq!(inner.status_code(), Some(500)),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn ignored_status_yields_empty_results() {
    let transport = Recording::with(vec![Err(TransportError::status(404))]);
    let searcher = Searcher::new(&transport);

    let query = searcher.index("missing").ignore([404]);
    let results = searcher.get::<Hit>(&query).unwrap();

    assert!(results.is_empty());
    assert_eq!(results.total, 0);
    let Call::Search(request) = &transport.calls()[0] else {
        panic!("expected a search call");
    };
    assert_eq!(request.ignore, vec![404u16]);
}

// ============================================================================
// id lookup
// ============================================================================

#[test]
fn id_equality_issues_document_lookup() {
    let transport = Recording::with(vec![Ok(json!({
        "_index": "posts", "_id": "42", "found": true, "_source": {"title": "answer"}
    }))]);
    let searcher = Searcher::new(&transport);

    let query = searcher
        .index("posts")
        .where_eq("_id", "42")
        .select(["title"]);
    let results = searcher.get::<Document<Post>>(&query).unwrap();

    assert_eq!(results.total, 1);
    assert_eq!(results.first().unwrap().source.title, "answer");
    assert_eq!(
        transport.calls(),
        vec![Call::Get(GetRequest {
            index: Some("posts".to_string()),
            doc_type: None,
            id: "42".to_string(),
            source: Some(json!({"includes": ["title"]})),
            ignore: Vec::new(),
        })]
    );
}

#[test]
fn missing_document_is_empty() {
    let transport = Recording::with(vec![Ok(json!({"_id": "7", "found": false}))]);
    let searcher = Searcher::new(&transport);

    let found = searcher
        .first::<Document>(&searcher.index("posts").id("7"))
        .unwrap();
    assert_eq!(found, None);
}

#[test]
fn custom_id_field_routes_to_lookup() {
    let config = QueryConfig {
        id_field: "uuid".to_string(),
        ..QueryConfig::default()
    };
    let transport = Recording::with(vec![Ok(json!({"_id": "u-1", "found": true, "_source": {}}))]);
    let searcher = Searcher::with_config(&transport, Arc::new(config));

    searcher
        .get::<Hit>(&searcher.query().where_eq("uuid", "u-1"))
        .unwrap();
    assert!(matches!(&transport.calls()[0], Call::Get(r) if r.id == "u-1"));
}

// ============================================================================
// first / count / response
// ============================================================================

#[test]
fn first_limits_to_one_hit() {
    let transport = Recording::with(vec![Ok(hits(&[("1", json!({"title": "only"}))]))]);
    let searcher = Searcher::new(&transport);

    let query = searcher.index("posts").take(50);
    let post = searcher.first::<Document<Post>>(&query).unwrap().unwrap();

    assert_eq!(post.source.title, "only");
    let Call::Search(request) = &transport.calls()[0] else {
        panic!("expected a search call");
    };
    assert_eq!(request.size, 1);
    assert_eq!(query.get_limit(), 50);
}

#[test]
fn first_on_empty_results_is_none() {
    let transport = Recording::with(vec![Ok(hits(&[]))]);
    let searcher = Searcher::new(&transport);

    assert_eq!(searcher.first::<Hit>(&searcher.query()).unwrap(), None);
}

#[test]
fn count_reads_total_from_zero_size_search() {
    let transport = Recording::with(vec![Ok(json!({"hits": {"total": 1234, "hits": []}}))]);
    let searcher = Searcher::new(&transport);

    let query = searcher.index("posts").where_eq("status", "draft").take(20);
    assert_eq!(searcher.count(&query).unwrap(), 1234);

    let Call::Search(request) = &transport.calls()[0] else {
        panic!("expected a search call");
    };
    assert_eq!(request.size, 0);
    assert_eq!(
        request.body,
        json!({"query": {"bool": {"filter": [{"term": {"status": "draft"}}]}}})
    );
}

#[test]
fn count_on_id_uses_document_lookup() {
    let transport = Recording::with(vec![
        Ok(json!({"_id": "42", "found": true, "_source": {}})),
        Ok(json!({"_id": "43", "found": false})),
    ]);
    let searcher = Searcher::new(&transport);

    assert_eq!(searcher.count(&searcher.index("posts").id("42")).unwrap(), 1);
    assert_eq!(searcher.count(&searcher.index("posts").id("43")).unwrap(), 0);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| matches!(call, Call::Get(_))));
}

#[test]
fn response_on_id_returns_raw_lookup() {
    let raw = json!({"_id": "42", "found": true, "_source": {"title": "x"}});
    let transport = Recording::with(vec![Ok(raw.clone())]);
    let searcher = Searcher::new(&transport);

    let query = searcher.query().where_eq("_id", "42");
    assert_eq!(searcher.response(&query).unwrap(), raw);
    assert!(matches!(&transport.calls()[0], Call::Get(r) if r.id == "42"));
}

#[test]
fn count_with_ignored_status_is_zero() {
    let transport = Recording::with(vec![Err(TransportError::status(404))]);
    let searcher = Searcher::new(&transport);

    assert_eq!(searcher.count(&searcher.query().ignore([404])).unwrap(), 0);
}

#[test]
fn response_returns_raw_document() {
    let raw = json!({"hits": {"total": 0, "hits": []}, "aggregations": {"tags": {}}});
    let transport = Recording::with(vec![Ok(raw.clone())]);
    let searcher = Searcher::new(&transport);

    assert_eq!(searcher.response(&searcher.query()).unwrap(), raw);
}

// ============================================================================
// scroll
// ============================================================================

#[test]
fn scroll_session_threads_ids() {
    let mut first_page = hits(&[("1", json!({"title": "a"}))]);
    first_page["_scroll_id"] = json!("cursor-1");
    let mut second_page = hits(&[("2", json!({"title": "b"}))]);
    second_page["_scroll_id"] = json!("cursor-2");
    let transport = Recording::with(vec![Ok(first_page), Ok(second_page), Ok(json!({}))]);
    let searcher = Searcher::new(&transport);

    let query = searcher.index("posts").scroll("1m");
    let page = searcher.get::<Hit>(&query).unwrap();
    let cursor = page.scroll_id.clone().unwrap();
    assert_eq!(cursor, "cursor-1");

    let next = searcher.scroll::<Hit>(&query, &cursor).unwrap();
    assert_eq!(next.first().unwrap().id, "2");
    assert_eq!(next.scroll_id.as_deref(), Some("cursor-2"));

    searcher.clear_scroll("cursor-2").unwrap();

    let calls = transport.calls();
    assert!(matches!(&calls[0], Call::Search(r) if r.scroll.as_deref() == Some("1m")));
    assert_eq!(
        calls[1],
        Call::Scroll(ScrollRequest {
            scroll_id: "cursor-1".to_string(),
            scroll: "1m".to_string(),
            ignore: Vec::new(),
        })
    );
    assert_eq!(calls[2], Call::Clear("cursor-2".to_string()));
}

#[test]
fn scroll_id_on_query_continues_session() {
    let transport = Recording::with(vec![Ok(hits(&[]))]);
    let searcher = Searcher::new(&transport);

    searcher
        .get::<Hit>(&searcher.query().scroll_id("cursor-9"))
        .unwrap();

    assert_eq!(
        transport.calls(),
        vec![Call::Scroll(ScrollRequest {
            scroll_id: "cursor-9".to_string(),
            scroll: "5m".to_string(),
            ignore: Vec::new(),
        })]
    );
}

#[test]
fn scroll_falls_back_to_configured_keep_alive() {
    let config = QueryConfig::from_yaml_str("default_scroll: 30s\n").unwrap();
    let transport = Recording::default();
    let searcher = Searcher::with_config(&transport, Arc::new(config));

    searcher.scroll::<Hit>(&searcher.query(), "c").unwrap();
    assert!(matches!(&transport.calls()[0], Call::Scroll(r) if r.scroll == "30s"));
}

// ============================================================================
// Custom models
// ============================================================================

#[derive(Debug, PartialEq)]
struct Scored {
    id: String,
    score: f64,
}

impl Model for Scored {
    fn from_hit(hit: Hit) -> esquire::Result<Self> {
        Ok(Scored {
            id: hit.id,
            score: hit.score.unwrap_or_default(),
        })
    }
}

#[test]
fn custom_model_sees_full_hit() {
    let transport = Recording::with(vec![Ok(json!({
        "hits": {"total": 1, "hits": [{"_id": "x", "_score": 3.5, "_source": {}}]}
    }))]);
    let searcher = Searcher::new(&transport);

    let results = searcher.get::<Scored>(&searcher.query()).unwrap();
    assert_eq!(
        results.hits,
        vec![Scored {
            id: "x".to_string(),
            score: 3.5
        }]
    );
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Hits are hydrated one-for-one, in response order.
    #[test]
    fn hydration_is_one_for_one(ids in prop::collection::vec("[a-z0-9]{1,8}", 0..20)) {
        let sources: Vec<(&str, Value)> = ids
            .iter()
            .map(|id| (id.as_str(), json!({"title": id})))
            .collect();
        let transport = Recording::with(vec![Ok(hits(&sources))]);
        let searcher = Searcher::new(&transport);

        let results = searcher.get::<Document<Post>>(&searcher.query()).unwrap();

        prop_assert_eq!(results.len(), ids.len());
        prop_assert_eq!(results.total, ids.len() as u64);
        for (doc, id) in results.iter().zip(&ids) {
            prop_assert_eq!(&doc.id, id);
            prop_assert_eq!(&doc.source.title, id);
        }
    }

    /// Only listed status codes are swallowed.
    #[test]
    fn only_listed_codes_are_ignored(code in 400u16..600, listed in prop::collection::vec(400u16..600, 0..4)) {
        let transport = Recording::with(vec![Err(TransportError::status(code))]);
        let searcher = Searcher::new(&transport);

        let result = searcher.get::<Hit>(&searcher.query().ignore(listed.clone()));
        prop_assert_eq!(result.is_ok(), listed.contains(&code));
    }
}
