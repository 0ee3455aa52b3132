//! Error types for the query crate.
//!
//! Building a query never fails. The only fallible surface is loading a
//! [`QueryConfig`](crate::QueryConfig) from text.

use thiserror::Error;

/// Errors that can occur when loading query configuration.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Configuration was not valid YAML for [`QueryConfig`](crate::QueryConfig).
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration was not valid JSON for [`QueryConfig`](crate::QueryConfig).
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for query crate operations.
pub type Result<T> = std::result::Result<T, QueryError>;
