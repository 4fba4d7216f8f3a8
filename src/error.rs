//! Error types for client operations.

use serde_json::Value;
use thiserror::Error;

/// Error classifications a create-index call may return that are safe to
/// ignore when creation is meant to be idempotent: the index already exists,
/// the request was rejected by validation, or creation is blocked.
const IGNORABLE_CREATE_ERRORS: [&str; 3] = [
    "resource_already_exists_exception",
    "action_request_validation_exception",
    "index_create_block_exception",
];

/// Client error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error response from the server, classified by the server's error type.
    #[error("Server error ({status}): {error_type}: {reason}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-side error classification (e.g. `resource_already_exists_exception`).
        error_type: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Document not found.
    #[error("Document not found: {index}/{id}")]
    DocumentNotFound {
        /// Index name.
        index: String,
        /// Document ID.
        id: String,
    },

    /// A bounded wait expired before the condition held.
    #[error("Operation timed out")]
    Timeout,

    /// Malformed or unexpected response payload.
    #[error("Unexpected response: {0}")]
    Response(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client error from the opensearch crate.
    #[error("Client error: {0}")]
    Client(#[from] opensearch::Error),
}

impl Error {
    /// Build an [`Error::Api`] from a non-success response body.
    pub(crate) fn api(status: u16, body: &Value) -> Self {
        Error::Api {
            status,
            error_type: body["error"]["type"].as_str().unwrap_or("unknown").to_string(),
            reason: body["error"]["reason"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string(),
        }
    }

    /// Whether this error is one of the create-index classifications that an
    /// idempotent create treats as non-fatal.
    pub fn is_ignorable_create_error(&self) -> bool {
        matches!(
            self,
            Error::Api { error_type, .. } if IGNORABLE_CREATE_ERRORS.contains(&error_type.as_str())
        )
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_error(error_type: &str) -> Error {
        Error::api(
            400,
            &json!({ "error": { "type": error_type, "reason": "test" }, "status": 400 }),
        )
    }

    #[test]
    fn test_ignorable_create_classifications() {
        assert!(api_error("resource_already_exists_exception").is_ignorable_create_error());
        assert!(api_error("action_request_validation_exception").is_ignorable_create_error());
        assert!(api_error("index_create_block_exception").is_ignorable_create_error());
    }

    #[test]
    fn test_other_classifications_not_ignorable() {
        assert!(!api_error("illegal_argument_exception").is_ignorable_create_error());
        assert!(!api_error("unknown").is_ignorable_create_error());
        assert!(!Error::Timeout.is_ignorable_create_error());
    }

    #[test]
    fn test_api_error_defaults_on_malformed_body() {
        let err = Error::api(500, &json!({}));
        match err {
            Error::Api { status, error_type, reason } => {
                assert_eq!(status, 500);
                assert_eq!(error_type, "unknown");
                assert_eq!(reason, "Unknown error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
