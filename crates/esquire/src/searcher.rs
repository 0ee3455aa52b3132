//! Terminal operations.
//!
//! A [`Searcher`] pairs a [`Transport`] with the configuration its builders
//! start from. Builders stay pure; every network round trip goes through
//! here.

use std::sync::Arc;

use esquire_query::{Query, QueryConfig};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::model::{Hit, Model};
use crate::results::SearchResults;
use crate::transport::{GetRequest, ScrollRequest, Transport};

/// Executes queries against a transport.
#[derive(Debug, Clone)]
pub struct Searcher<T> {
    transport: T,
    config: Arc<QueryConfig>,
}

impl<T: Transport> Searcher<T> {
    /// Creates a searcher using the shared default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, QueryConfig::shared())
    }

    /// Creates a searcher whose builders use `config`.
    pub fn with_config(transport: T, config: Arc<QueryConfig>) -> Self {
        Searcher { transport, config }
    }

    /// Returns the transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the configuration new builders start from.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Starts a fresh builder.
    pub fn query(&self) -> Query {
        Query::with_config(Arc::clone(&self.config))
    }

    /// Starts a fresh builder scoped to `name`.
    pub fn index(&self, name: impl Into<String>) -> Query {
        self.query().index(name)
    }

    /// Runs the search and returns the raw response.
    ///
    /// A query narrowed to an id returns the raw document lookup instead.
    /// An ignored status yields an empty object.
    pub fn response(&self, query: &Query) -> Result<Value> {
        if let Some(id) = query.get_id() {
            let request = lookup(query, id);
            debug!(index = request.index.as_deref().unwrap_or("_all"), id, "get");
            let response = ignoring(self.transport.get(&request), &request.ignore)?;
            return Ok(response.unwrap_or_else(|| Value::Object(Map::new())));
        }
        let request = query.request();
        debug!(
            index = request.index.as_deref().unwrap_or("_all"),
            from = request.from,
            size = request.size,
            "search"
        );
        let response = ignoring(self.transport.search(&request), &request.ignore)?;
        Ok(response.unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Runs the query and hydrates every hit into `M`.
    ///
    /// A query narrowed to an id issues a single-document lookup; a query
    /// carrying a scroll id continues that scroll session.
    pub fn get<M: Model>(&self, query: &Query) -> Result<SearchResults<M>> {
        if let Some(id) = query.get_id() {
            return self.find(query, id);
        }
        if let Some(scroll_id) = query.get_scroll_id() {
            return self.scroll(query, scroll_id);
        }

        let request = query.request();
        debug!(
            index = request.index.as_deref().unwrap_or("_all"),
            from = request.from,
            size = request.size,
            scroll = request.scroll.as_deref(),
            "search"
        );
        match ignoring(self.transport.search(&request), &request.ignore)? {
            Some(response) => SearchResults::from_response(response),
            None => Ok(SearchResults::empty()),
        }
    }

    /// Returns the first hit, if any.
    pub fn first<M: Model>(&self, query: &Query) -> Result<Option<M>> {
        let query = query.clone().take(1);
        Ok(self.get::<M>(&query)?.into_iter().next())
    }

    /// Counts the documents matching the query.
    ///
    /// A query narrowed to an id counts 0 or 1 through a document lookup.
    pub fn count(&self, query: &Query) -> Result<u64> {
        if let Some(id) = query.get_id() {
            return Ok(self.find::<Hit>(query, id)?.total);
        }
        let request = query.request();
        debug!(
            index = request.index.as_deref().unwrap_or("_all"),
            "count"
        );
        Ok(ignoring(self.transport.count(&request), &request.ignore)?.unwrap_or(0))
    }

    /// Fetches the next page of a scroll session.
    ///
    /// The keep-alive is the query's scroll setting, or the configured
    /// default when the query has none.
    pub fn scroll<M: Model>(&self, query: &Query, scroll_id: &str) -> Result<SearchResults<M>> {
        let request = ScrollRequest {
            scroll_id: scroll_id.to_string(),
            scroll: query
                .get_scroll()
                .unwrap_or(query.config().default_scroll.as_str())
                .to_string(),
            ignore: query.ignored().to_vec(),
        };
        debug!(scroll = %request.scroll, "scroll");
        match ignoring(self.transport.scroll(&request), &request.ignore)? {
            Some(response) => SearchResults::from_response(response),
            None => Ok(SearchResults::empty()),
        }
    }

    /// Releases a scroll session.
    pub fn clear_scroll(&self, scroll_id: &str) -> Result<()> {
        debug!("clear scroll");
        self.transport.clear_scroll(scroll_id)?;
        Ok(())
    }

    fn find<M: Model>(&self, query: &Query, id: &str) -> Result<SearchResults<M>> {
        let request = lookup(query, id);
        debug!(index = request.index.as_deref().unwrap_or("_all"), id, "get");
        match ignoring(self.transport.get(&request), &request.ignore)? {
            Some(response) => SearchResults::from_document(response),
            None => Ok(SearchResults::empty()),
        }
    }
}

fn lookup(query: &Query, id: &str) -> GetRequest {
    let body = query.to_body();
    GetRequest {
        index: query.get_index().map(str::to_string),
        doc_type: query.get_doc_type().map(str::to_string),
        id: id.to_string(),
        source: body.get("_source").cloned(),
        ignore: query.ignored().to_vec(),
    }
}

// Ok(None) when the transport failed with an ignored status code.
fn ignoring<V>(
    result: std::result::Result<V, TransportError>,
    ignore: &[u16],
) -> Result<Option<V>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match err.status_code() {
            Some(code) if ignore.contains(&code) => {
                warn!(code, "ignoring search engine status");
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
