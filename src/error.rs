//! Error types for the Ecclesia MCP Server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when interacting with the Ecclesia API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an unexpected error status code
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Missing or rejected bearer token
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Authenticated user lacks permission
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Backend rejected the payload (400/422)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Input rejected before reaching the backend
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic API error with context
    #[error("API error: {0}")]
    Other(String),
}

impl ApiError {
    /// Whether the error was caused by caller input rather than the backend.
    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            ApiError::Validation(_) | ApiError::InvalidRequest(_) | ApiError::NotFound(_)
        )
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Other(err.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors that can occur while persisting the session token.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the token file failed
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored token could not be decoded
    #[error("Corrupt session data: {0}")]
    Corrupt(String),

    /// Session lock was poisoned by a panicking writer
    #[error("Session lock poisoned")]
    Poisoned,
}

/// Convenience type alias for Results with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with SessionError
pub type SessionResult<T> = Result<T, SessionError>;
