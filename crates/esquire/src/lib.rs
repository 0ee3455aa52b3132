//! Esquire - run fluent search queries and hydrate the hits.
//!
//! Builders come from [`esquire_query`]; this crate executes them. A
//! [`Searcher`] owns a [`Transport`] and turns assembled requests into
//! [`SearchResults`] of any [`Model`].
//!
//! # Quick Start
//!
//! ```rust
//! use esquire::{Document, GetRequest, ScrollRequest, Searcher, Transport, TransportError};
//! use esquire::query::SearchRequest;
//! use serde::Deserialize;
//! use serde_json::{json, Value};
//!
//! struct Canned;
//!
//! impl Transport for Canned {
//!     fn search(&self, _request: &SearchRequest) -> Result<Value, TransportError> {
//!         Ok(json!({
//!             "took": 1,
//!             "hits": {
//!                 "total": {"value": 1, "relation": "eq"},
//!                 "hits": [{"_id": "1", "_source": {"title": "Hello"}}]
//!             }
//!         }))
//!     }
//!     fn get(&self, _request: &GetRequest) -> Result<Value, TransportError> {
//!         Ok(json!({"found": false}))
//!     }
//!     fn scroll(&self, _request: &ScrollRequest) -> Result<Value, TransportError> {
//!         Ok(json!({}))
//!     }
//!     fn clear_scroll(&self, _scroll_id: &str) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     title: String,
//! }
//!
//! let searcher = Searcher::new(Canned);
//! let query = searcher.index("posts").where_op("title", "like", "hello").take(5);
//!
//! let posts = searcher.get::<Document<Post>>(&query).unwrap();
//! assert_eq!(posts.total, 1);
//! assert_eq!(posts.first().unwrap().source.title, "Hello");
//! ```
//!
//! # Terminal Operations
//!
//! | Call | Transport | Result |
//! |------|-----------|--------|
//! | `get` | `search`, `get` when narrowed to an id, `scroll` when a scroll id is set | `SearchResults<M>` |
//! | `first` | as `get`, one hit | `Option<M>` |
//! | `count` | `count` | `u64` |
//! | `response` | `search` | raw `Value` |
//! | `scroll` | `scroll` | `SearchResults<M>` |
//! | `clear_scroll` | `clear_scroll` | `()` |
//!
//! Status codes listed with `Query::ignore` turn into empty results.

mod error;
mod model;
mod results;
mod searcher;
mod transport;

pub use esquire_query as query;

// Re-export public API
pub use error::{Error, Result, TransportError};
pub use esquire_query::{Dir, Field, Query, QueryConfig};
pub use model::{Document, Hit, Model};
pub use results::{total_hits, SearchResults};
pub use searcher::Searcher;
pub use transport::{GetRequest, ScrollRequest, Transport};
