//! Error types for the ContextQA client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic fallback used when a failure carries no readable message.
pub const GENERIC_FALLBACK: &str = "Something went wrong. Please try again.";

/// A shared error type for the entire ContextQA client.
///
/// Variants follow where a failure happened: locally before any request
/// (`Validation`), at the server (`Http`), or somewhere in between
/// (`Transport`). Storage and configuration problems get their own variants
/// because they never reach the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientError {
    /// A caller precondition was violated; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The request reached the server but the status was not 2xx.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("<no detail>"))]
    Http {
        status: u16,
        /// The `detail` field of the error body, when it decoded as a string.
        detail: Option<String>,
    },

    /// The request never completed or the reply could not be decoded.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Session store I/O failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Fixed fallback strings for one backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationFallback {
    /// Shown for a non-2xx status with no decodable detail.
    pub http: &'static str,
    /// Shown for a transport failure with an empty message.
    pub transport: &'static str,
}

impl OperationFallback {
    pub const UPLOAD: Self = Self {
        http: "Upload failed",
        transport: "Something went wrong while uploading.",
    };

    pub const CHAT: Self = Self {
        http: "Chat failed",
        transport: GENERIC_FALLBACK,
    };
}

impl ClientError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Http error from a status and an optional detail.
    pub fn http(status: u16, detail: Option<String>) -> Self {
        Self::Http { status, detail }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Converts the error into the text shown to the user.
    ///
    /// - `Http`: the server's detail, else `fallback.http`
    /// - `Transport`: the error's own message, else `fallback.transport`
    /// - everything else: the rendered error
    pub fn user_message(&self, fallback: OperationFallback) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Http { detail, .. } => detail
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(fallback.http)
                .to_string(),
            Self::Transport(message) => {
                let message = message.trim();
                if message.is_empty() {
                    fallback.transport.to_string()
                } else {
                    message.to_string()
                }
            }
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
