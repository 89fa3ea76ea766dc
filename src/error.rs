//! Error types for entity-export
//!
//! This module provides error handling for the library, including:
//! - Fetch failures (transport status, GraphQL `errors`, malformed payloads)
//! - Run-fatal failures (configuration, output I/O, CSV encoding)
//! - Machine-readable error codes for structured logging

use thiserror::Error;

/// Result type alias for entity-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for entity-export
///
/// Fetch-related variants end one account's fetch loop and are reported
/// alongside whatever records were gathered. The remaining variants abort
/// the whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_workers")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error (connection refused, timeout, TLS, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The endpoint answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// The GraphQL payload carried an `errors` array
    #[error("API returned errors: {}", messages.join("; "))]
    Api {
        /// The `message` field of every reported error
        messages: Vec<String>,
    },

    /// The payload had neither `errors` nor a results page
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A worker task panicked or was cancelled
    #[error("worker task failed: {0}")]
    TaskFailed(String),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Returns true for failures that end a single account's fetch loop
    /// without affecting other accounts
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Network(_)
                | Error::HttpStatus { .. }
                | Error::Api { .. }
                | Error::MalformedResponse(_)
                | Error::Serialization(_)
        )
    }

    /// Machine-readable error code, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Csv(_) => "csv_error",
            Error::HttpStatus { .. } => "http_status",
            Error::Api { .. } => "api_error",
            Error::MalformedResponse(_) => "malformed_response",
            Error::TaskFailed(_) => "task_failed",
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::TaskFailed(e.to_string())
    }
}
