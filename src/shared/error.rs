//! Shared Error Types
//!
//! This module defines error types for the wire types in [`crate::shared`].
//! They describe malformed client input and are mapped to `400 Bad Request`
//! by the backend.
//!
//! # Usage
//!
//! ```rust
//! use socialhub::shared::error::SharedError;
//!
//! let error = SharedError::validation("text", "Comment text cannot be empty");
//! assert!(error.to_string().contains("text"));
//! ```
use thiserror::Error;

/// Errors raised while validating client-facing types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Message suitable for returning to the client
    pub fn client_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
        }
    }
}
