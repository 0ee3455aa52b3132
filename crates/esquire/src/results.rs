//! Search result collections.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Hit, Model};

#[derive(Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Object { value: u64 },
}

impl Total {
    fn value(&self) -> u64 {
        match self {
            Total::Count(n) => *n,
            Total::Object { value } => *value,
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    took: u64,
    #[serde(default)]
    timed_out: bool,
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
    #[serde(default)]
    hits: RawHits,
}

#[derive(Deserialize, Default)]
struct RawHits {
    #[serde(default)]
    total: Option<Total>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// Reads `hits.total` from a raw response, as a number or `{"value": n}`.
///
/// Missing or malformed totals read as zero.
pub fn total_hits(response: &Value) -> u64 {
    response
        .get("hits")
        .and_then(|hits| hits.get("total"))
        .and_then(|total| Total::deserialize(total).ok())
        .map(|total| total.value())
        .unwrap_or(0)
}

/// A page of hydrated hits plus response metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<M> {
    /// Total number of matching documents, not just this page.
    pub total: u64,
    pub max_score: Option<f64>,
    /// Engine-side execution time in milliseconds.
    pub took: u64,
    pub timed_out: bool,
    /// Cursor for the next page of a scroll session.
    pub scroll_id: Option<String>,
    pub hits: Vec<M>,
}

impl<M> Default for SearchResults<M> {
    fn default() -> Self {
        SearchResults {
            total: 0,
            max_score: None,
            took: 0,
            timed_out: false,
            scroll_id: None,
            hits: Vec::new(),
        }
    }
}

impl<M> SearchResults<M> {
    /// Creates an empty result set.
    pub fn empty() -> Self {
        SearchResults::default()
    }

    /// Returns the number of hits on this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns `true` if this page holds no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Iterates over the hits on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.hits.iter()
    }

    /// Returns the first hit on this page.
    pub fn first(&self) -> Option<&M> {
        self.hits.first()
    }
}

impl<M: Model> SearchResults<M> {
    /// Hydrates a search or scroll response.
    pub fn from_response(response: Value) -> Result<Self> {
        let raw: RawResponse = serde_json::from_value(response)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        let hits = raw
            .hits
            .hits
            .into_iter()
            .map(M::from_hit)
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchResults {
            total: raw.hits.total.map(|t| t.value()).unwrap_or(hits.len() as u64),
            max_score: raw.hits.max_score,
            took: raw.took,
            timed_out: raw.timed_out,
            scroll_id: raw.scroll_id,
            hits,
        })
    }

    /// Hydrates a single-document lookup response.
    ///
    /// A response with `"found": false` yields an empty result set.
    pub fn from_document(response: Value) -> Result<Self> {
        if response.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(SearchResults::empty());
        }
        let hit: Hit = serde_json::from_value(response)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Ok(SearchResults {
            total: 1,
            hits: vec![M::from_hit(hit)?],
            ..SearchResults::default()
        })
    }
}

impl<M> IntoIterator for SearchResults<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a SearchResults<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
