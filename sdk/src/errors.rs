//! Error types and handling
//!
//! This module provides the error types used throughout Haven.
//! All errors implement the `HavenErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Taxonomy
//!
//! - [`ValidationError`]: a caller payload is missing a required field. Surfaced
//!   as a 400 response and never treated as a service fault.
//! - [`GatewayError`]: the completion service could not be reached, or it answered
//!   with something other than a usable 2xx JSON body. Surfaced as a 500 response.
//! - [`EngineError`]: process-level failures (configuration, startup I/O) plus
//!   the two above lifted through `From`.
//!
//! An empty reply from the model is not an error anywhere in this taxonomy; the
//! gateway normalizes it to a placeholder string.

use thiserror::Error;

/// Trait for Haven error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information.
pub trait HavenErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint never contains the service credential or raw upstream bodies.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or corrected by the caller. Non-recoverable
    /// errors require operator intervention (usually a configuration fix).
    fn is_recoverable(&self) -> bool;
}

/// A write was rejected because the payload lacks a required field.
///
/// The `Display` strings are the exact client-facing messages of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid mood entry")]
    InvalidMoodEntry {
        /// Name of the first missing or empty field
        field: &'static str,
    },

    #[error("Invalid chat message")]
    InvalidChatMessage {
        /// Name of the first missing or empty field
        field: &'static str,
    },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidMoodEntry { field } | Self::InvalidChatMessage { field } => field,
        }
    }
}

/// Failure of a single call to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No response was received: connection refused, DNS failure, timeout, or the
    /// body stream broke before it could be read.
    #[error("Completion service unreachable: {0}")]
    Unreachable(String),

    /// A response was received but it was not a usable success: either a non-2xx
    /// status, or a 2xx whose body is not JSON.
    #[error("Completion service error (status {status}): {body}")]
    Upstream {
        /// HTTP status returned by the upstream service
        status: u16,
        /// Raw response body, preserved for diagnostics
        body: String,
    },
}

impl GatewayError {
    /// Upstream HTTP status, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unreachable(_) => None,
            Self::Upstream { status, .. } => Some(*status),
        }
    }

    /// Diagnostic detail for the client-facing `error` field.
    ///
    /// Upstream bodies that are JSON are returned structured; anything else is
    /// returned as a string. An empty upstream body falls back to the error message.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            Self::Unreachable(message) => serde_json::Value::String(message.clone()),
            Self::Upstream { body, .. } if body.trim().is_empty() => {
                serde_json::Value::String(self.to_string())
            }
            Self::Upstream { body, .. } => serde_json::from_str(body)
                .unwrap_or_else(|_| serde_json::Value::String(body.clone())),
        }
    }
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: invalid file, environment, or CLI values
/// - **Validation**: rejected store writes
/// - **Gateway**: completion service failures
/// - **Network**: listener binding and HTTP client construction
/// - **IO**: generic I/O failures
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HavenErrorExt for ValidationError {
    fn user_hint(&self) -> &str {
        match self {
            Self::InvalidMoodEntry { .. } => "Mood entries need a non-empty id and date",
            Self::InvalidChatMessage { .. } => "Chat messages need a non-empty text and sender",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

impl HavenErrorExt for GatewayError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Unreachable(_) => "The assistant is unreachable right now. Try again shortly",
            Self::Upstream { status: 401 | 403, .. } => {
                "The assistant rejected our credentials. Check the configured API key"
            }
            Self::Upstream { status: 429, .. } => "The assistant is busy. Try again shortly",
            Self::Upstream { .. } => "The assistant returned an error",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

impl HavenErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your haven.toml file and environment variables",
            Self::Validation(e) => e.user_hint(),
            Self::Gateway(e) => e.user_hint(),
            Self::Network(_) => "Network operation failed. Check the listen address and port",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Network(_) => false,
            Self::Validation(e) => e.is_recoverable(),
            Self::Gateway(e) => e.is_recoverable(),
            Self::Io(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_messages_match_http_contract() {
        let mood = ValidationError::InvalidMoodEntry { field: "id" };
        let chat = ValidationError::InvalidChatMessage { field: "sender" };

        assert_eq!(mood.to_string(), "Invalid mood entry");
        assert_eq!(chat.to_string(), "Invalid chat message");
        assert_eq!(mood.field(), "id");
        assert_eq!(chat.field(), "sender");
    }

    #[test]
    fn test_gateway_status() {
        assert_eq!(GatewayError::Unreachable("timeout".into()).status(), None);
        let err = GatewayError::Upstream {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_gateway_detail_prefers_structured_body() {
        let err = GatewayError::Upstream {
            status: 401,
            body: r#"{"status":401,"title":"Unauthorized"}"#.into(),
        };
        assert_eq!(err.detail(), json!({"status": 401, "title": "Unauthorized"}));

        let err = GatewayError::Upstream {
            status: 500,
            body: "<html>oops</html>".into(),
        };
        assert_eq!(err.detail(), json!("<html>oops</html>"));
    }

    #[test]
    fn test_gateway_detail_empty_body_uses_message() {
        let err = GatewayError::Upstream {
            status: 503,
            body: String::new(),
        };
        let detail = err.detail();
        assert!(detail.as_str().unwrap().contains("503"));

        let err = GatewayError::Unreachable("connection refused".into());
        assert_eq!(err.detail(), json!("connection refused"));
    }

    #[test]
    fn test_engine_error_from_lifts_taxonomy() {
        let err: EngineError = ValidationError::InvalidChatMessage { field: "text" }.into();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid chat message");

        let err: EngineError = GatewayError::Unreachable("down".into()).into();
        assert!(matches!(err, EngineError::Gateway(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_recoverability() {
        assert!(!EngineError::Config("bad port".into()).is_recoverable());
        assert!(!EngineError::Network("bind failed".into()).is_recoverable());
        assert!(ValidationError::InvalidMoodEntry { field: "date" }.is_recoverable());
    }

    #[test]
    fn test_auth_hint_is_specific() {
        let err = GatewayError::Upstream {
            status: 401,
            body: "{}".into(),
        };
        assert!(err.user_hint().contains("API key"));
    }
}
