//! Transport seam.
//!
//! The [`Transport`] trait is the only way queries reach a search engine.
//! Connection handling, retries and timeouts belong to the implementation.

use esquire_query::SearchRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;
use crate::results::total_hits;

/// Single-document lookup by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    pub id: String,
    /// `_source` projection from the assembled body, if any.
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<u16>,
}

/// Continuation of a scroll session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub scroll_id: String,
    /// Keep-alive for the next page, e.g. `"5m"`.
    pub scroll: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<u16>,
}

/// Executes requests against a search engine.
///
/// Every method returns the raw response document. Implementations should
/// report non-success statuses as [`TransportError::Status`] so ignored
/// codes can be told apart from real failures.
///
/// [`Searcher`](crate::Searcher) sends queries narrowed to an id through
/// [`Transport::get`], so `search` and `count` only see requests without one.
///
/// # Example
///
/// ```
/// use esquire::{GetRequest, ScrollRequest, Transport, TransportError};
/// use esquire_query::SearchRequest;
/// use serde_json::{json, Value};
///
/// struct Offline;
///
/// impl Transport for Offline {
///     fn search(&self, _request: &SearchRequest) -> Result<Value, TransportError> {
///         Ok(json!({"hits": {"total": 0, "hits": []}}))
///     }
///     fn get(&self, _request: &GetRequest) -> Result<Value, TransportError> {
///         Ok(json!({"found": false}))
///     }
///     fn scroll(&self, _request: &ScrollRequest) -> Result<Value, TransportError> {
///         Err(TransportError::status(404))
///     }
///     fn clear_scroll(&self, _scroll_id: &str) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Transport {
    /// Runs a search.
    fn search(&self, request: &SearchRequest) -> Result<Value, TransportError>;

    /// Fetches one document by id.
    fn get(&self, request: &GetRequest) -> Result<Value, TransportError>;

    /// Fetches the next page of a scroll session.
    fn scroll(&self, request: &ScrollRequest) -> Result<Value, TransportError>;

    /// Releases a scroll session.
    fn clear_scroll(&self, scroll_id: &str) -> Result<(), TransportError>;

    /// Counts matching documents.
    ///
    /// The default runs the search with an empty window and reads the hit
    /// total. Transports with a dedicated count endpoint should override it.
    fn count(&self, request: &SearchRequest) -> Result<u64, TransportError> {
        let mut request = request.clone();
        request.from = 0;
        request.size = 0;
        request.scroll = None;
        let response = self.search(&request)?;
        Ok(total_hits(&response))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn search(&self, request: &SearchRequest) -> Result<Value, TransportError> {
        (**self).search(request)
    }

    fn get(&self, request: &GetRequest) -> Result<Value, TransportError> {
        (**self).get(request)
    }

    fn scroll(&self, request: &ScrollRequest) -> Result<Value, TransportError> {
        (**self).scroll(request)
    }

    fn clear_scroll(&self, scroll_id: &str) -> Result<(), TransportError> {
        (**self).clear_scroll(scroll_id)
    }

    fn count(&self, request: &SearchRequest) -> Result<u64, TransportError> {
        (**self).count(request)
    }
}
