//! Builder configuration.
//!
//! [`QueryConfig`] carries the defaults every new [`Query`](crate::Query)
//! starts from. One process-wide instance is created on first use and shared;
//! hosts that load their own settings inject them with
//! [`Query::with_config`](crate::Query::with_config).

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

static SHARED: Lazy<Arc<QueryConfig>> = Lazy::new(|| Arc::new(QueryConfig::default()));

/// Defaults consumed by the query builder.
///
/// Every field is optional when deserializing; missing fields take the
/// values of [`QueryConfig::default`].
///
/// ```
/// use esquire_query::QueryConfig;
///
/// let config = QueryConfig::from_yaml_str("default_limit: 25\n").unwrap();
/// assert_eq!(config.default_limit, 25);
/// assert_eq!(config.default_offset, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used until `take` is called.
    pub default_limit: usize,
    /// Page offset used until `skip` is called.
    pub default_offset: usize,
    /// Reserved field whose equality routes to the single-document id.
    pub id_field: String,
    /// Keep-alive used by `scroll_default`.
    pub default_scroll: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            default_limit: 10,
            default_offset: 0,
            id_field: "_id".to_string(),
            default_scroll: "5m".to_string(),
        }
    }
}

impl QueryConfig {
    /// Returns the process-wide default configuration.
    pub fn shared() -> Arc<QueryConfig> {
        Arc::clone(&SHARED)
    }

    /// Parses a configuration from YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
