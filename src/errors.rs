/*!
 * Error types for the doctran application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The backend rejected the request because of rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// A network-level failure (connection refused, reset, timeout)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered, but the payload cannot be used
    /// (malformed body, or a segment count that does not match the request)
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Credentials were rejected
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Any other error status returned by the API
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },
}

impl ProviderError {
    /// Whether the orchestrator may retry the request that produced this error.
    ///
    /// Rate limits and network failures are retryable; malformed responses
    /// recur on retry and authentication failures are fatal for the run.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded(_) | Self::ConnectionError(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::InvalidResponse(_) | Self::AuthenticationError(_) => false,
        }
    }

    /// Whether this error invalidates the whole pipeline run, not just one batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationError(_))
    }
}

/// Errors that can occur while reading or writing documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input cannot be parsed into a document tree
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// The input is not a format this tool understands
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Writing the output document failed
    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    /// Fetching URL-sourced content failed
    #[error("Failed to fetch document: {0}")]
    Fetch(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a translation backend
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document parsing or serialization
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error in the application configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The pipeline run was cancelled before completion
    #[error("Translation run was cancelled")]
    Cancelled,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
