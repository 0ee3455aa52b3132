//! Error types for query execution.

use serde_json::Value;
use thiserror::Error;

/// Failure reported by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The search engine answered with a non-success status.
    #[error("search engine responded with status {code}")]
    Status {
        code: u16,
        /// Response body, when the engine sent one.
        body: Option<Value>,
    },

    /// The search engine could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other transport-specific failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Creates a status error without a body.
    pub fn status(code: u16) -> Self {
        TransportError::Status { code, body: None }
    }

    /// Returns the status code, if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors that can occur when executing a query.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed and the status was not ignored.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A hit's `_source` did not deserialize into the requested model.
    #[error("failed to hydrate hit '{id}': {source}")]
    Hydrate {
        id: String,
        source: serde_json::Error,
    },

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for execution operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code() {
        assert_eq!(TransportError::status(404).status_code(), Some(404));
        assert_eq!(
            TransportError::Connection("refused".to_string()).status_code(),
            None
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            TransportError::status(503).to_string(),
            "search engine responded with status 503"
        );
        let err = Error::from(TransportError::Connection("refused".to_string()));
        assert_eq!(err.to_string(), "transport error: connection failed: refused");
    }

    #[test]
    fn other_wraps_boxed_errors() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = "tls handshake failed".into();
        let err = TransportError::from(boxed);
        assert_eq!(err.to_string(), "tls handshake failed");
    }
}
