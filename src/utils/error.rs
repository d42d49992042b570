// src/utils/error.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type ShopResult<T> = Result<T, ShopError>;

/// Custom error details for additional context
pub type ErrorDetails = HashMap<String, serde_json::Value>;

/// Main error type for the commerce admin platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopError {
    pub message: String,
    pub details: Option<Box<ErrorDetails>>,
    pub status: Option<u16>,
    pub error_code: Option<String>,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[default]
    UnknownError,
    ValidationError,
    NotFoundError,
    DatabaseError,
    StorageError,
    StorageUnavailable,
    SerializationError,
    DeserializationError,
    AuthenticationError,
    AuthorizationError,
    InternalServerError,
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ShopError {}

impl ShopError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            status: None,
            error_code: None,
            kind,
        }
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(Box::new(details));
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    // Convenience constructors for common error types

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
            .with_status(400)
            .with_code("VALIDATION_ERROR")
    }

    /// Validation error that names the offending field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut details = ErrorDetails::new();
        details.insert(
            "field".to_string(),
            serde_json::Value::String(field.to_string()),
        );
        Self::validation_error(message).with_details(details)
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::NotFoundError, message)
            .with_status(404)
            .with_code("NOT_FOUND")
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DatabaseError, message)
            .with_status(500)
            .with_code("DATABASE_ERROR")
    }

    pub fn storage_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageError, message)
            .with_status(500)
            .with_code("STORAGE_ERROR")
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnavailable, message)
            .with_status(503)
            .with_code("STORAGE_UNAVAILABLE")
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeserializationError, message)
            .with_status(400)
            .with_code("PARSE_ERROR")
    }

    pub fn serialization_error<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::SerializationError, message)
            .with_status(500)
            .with_code("SERIALIZATION_ERROR")
    }

    pub fn authentication_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationError, message)
            .with_status(401)
            .with_code("AUTH_ERROR")
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthorizationError, message)
            .with_status(403)
            .with_code("ACCESS_DENIED")
    }

    pub fn internal_error<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
            .with_status(500)
            .with_code("INTERNAL_ERROR")
    }

    /// True when the underlying storage reported a missing table. Read paths
    /// treat this the same as "no rows found" instead of surfacing it.
    pub fn is_missing_table(&self) -> bool {
        self.message.contains("no such table")
    }
}

// Implement From conversions for common error types
impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::parse_error(format!("JSON parsing error: {}", err))
    }
}

impl From<worker::Error> for ShopError {
    fn from(err: worker::Error) -> Self {
        ShopError::internal_error(format!("Worker error: {:?}", err))
    }
}

impl From<String> for ShopError {
    fn from(err: String) -> Self {
        Self::validation_error(err)
    }
}

impl From<&str> for ShopError {
    fn from(err: &str) -> Self {
        Self::validation_error(err.to_string())
    }
}

// Implementation to convert ShopError into worker::Error
impl From<ShopError> for worker::Error {
    fn from(err: ShopError) -> Self {
        let message = if let Some(status_code) = err.status {
            format!(
                "[Status: {}] ShopError (Kind: {:?}): {}",
                status_code, err.kind, err.message
            )
        } else {
            format!("ShopError (Kind: {:?}): {}", err.kind, err.message)
        };

        worker::Error::RustError(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_detection() {
        let err = ShopError::database_error(
            "Failed to execute query: no such table: seller_metric_overrides",
        );
        assert!(err.is_missing_table());

        let err = ShopError::database_error("Failed to execute query: disk I/O error");
        assert!(!err.is_missing_table());
    }

    #[test]
    fn test_invalid_field_carries_field_name() {
        let err = ShopError::invalid_field("metricKey", "unknown metric key: bogus");
        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert_eq!(err.status, Some(400));
        let details = err.details.expect("details present");
        assert_eq!(
            details.get("field"),
            Some(&serde_json::Value::String("metricKey".to_string()))
        );
    }
}
