//! Core error types for nutrilog-core.
//!
//! This module defines the error hierarchy using thiserror. Failures from the
//! AI service are kept separate from storage failures so the fallback policy
//! can recover the former without ever masking the latter.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nutrilog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External AI service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored blob could not be decoded
    #[error("Stored value under '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised by an AI capability.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// No API key was configured
    #[error("AI service is not configured (set {env_var})")]
    NotConfigured { env_var: String },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Non-success HTTP status or API-level error payload
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered with no text
    #[error("Empty response from AI service")]
    EmptyResponse,

    /// The service answered with text that did not match the requested schema
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Required text was blank
    #[error("'{0}' must not be empty")]
    EmptyText(String),
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseBusy
                    || inner.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ServiceError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ServiceError::Request(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_message_names_field() {
        let err = ValidationError::invalid("currentWeight", "must not be negative");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'currentWeight': must not be negative"
        );
    }

    #[test]
    fn core_error_wraps_service_error() {
        let err: CoreError = ServiceError::EmptyResponse.into();
        assert!(matches!(err, CoreError::Service(ServiceError::EmptyResponse)));
        assert_eq!(err.to_string(), "Service error: Empty response from AI service");
    }
}
