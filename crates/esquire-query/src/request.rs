//! Request parameters handed to the transport.
//!
//! The body is only one part of a search call. Pagination, scroll state,
//! search type and ignored status codes travel next to it as request
//! parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Distributed search execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Score against shard-local term frequencies.
    #[default]
    QueryThenFetch,
    /// Gather global term frequencies before scoring.
    DfsQueryThenFetch,
}

impl SearchType {
    /// Returns the wire name of this search type.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::QueryThenFetch => "query_then_fetch",
            SearchType::DfsQueryThenFetch => "dfs_query_then_fetch",
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully assembled search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Single-document id, when the query was narrowed to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub body: Value,
    pub from: usize,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    /// Scroll keep-alive, e.g. `"5m"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    /// Status codes the caller treats as an empty result.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<u16>,
}
