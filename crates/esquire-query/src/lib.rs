//! Esquire query - fluent builder for search-engine request documents.
//!
//! Chained `where`/`order`/`select` calls accumulate clauses in a [`Query`],
//! which assembles them into a boolean-query request body. It supports:
//!
//! - Term, range, terms, match, exists and geo-distance predicates
//! - Grouped sub-queries passed in place of a field name
//! - Free-text search strings with phrases, field scoping, negation and boost
//! - Source projection, sorting, pagination, scroll and raw body overrides
//!
//! Nothing in this crate performs I/O. The `esquire` crate executes the
//! assembled request against a transport.
//!
//! # Quick Start
//!
//! ```rust
//! use esquire_query::{Query, Dir};
//! use serde_json::json;
//!
//! let query = Query::new()
//!     .index("tags")
//!     .where_in("tag", ["a", "b"])
//!     .where_not_in("tag", ["c"])
//!     .order_by("created_at", Dir::Desc)
//!     .take(20);
//!
//! assert_eq!(
//!     query.to_body(),
//!     json!({
//!         "query": {"bool": {
//!             "filter": [{"terms": {"tag": ["a", "b"]}}],
//!             "must_not": [{"terms": {"tag": ["c"]}}]
//!         }},
//!         "sort": [{"created_at": "desc"}]
//!     })
//! );
//! ```
//!
//! # Clause Routing
//!
//! | Call | Bucket | Clause |
//! |------|--------|--------|
//! | `where_eq` / `=` | filter | `term` |
//! | `>` `>=` `<` `<=` | filter | `range` |
//! | `like` | must | `match` |
//! | `exists` | must, or must_not when falsy | `exists` |
//! | `where_between` | filter | `range` (gte + lte) |
//! | `where_in` | filter | `terms` |
//! | `distance` | filter | `geo_distance` |
//! | `where_not_*` | must_not | as above |
//!
//! Equality on the id field (`_id` by default) narrows the query to one
//! document instead of adding a clause.

mod body;
pub mod clause;
mod config;
mod error;
mod op;
mod ordering;
mod query;
mod request;
pub mod search;
mod source;

// Re-export public API
pub use clause::{Bounds, Bucket, Condition};
pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use op::Op;
pub use ordering::{Dir, OrderBy};
pub use query::{Field, Group, Query};
pub use request::{SearchRequest, SearchType};
pub use search::{MatchOperator, SearchSettings};
pub use source::Source;
