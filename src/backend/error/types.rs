/**
 * Backend Error Types
 *
 * This module defines the errors handlers return. Every variant maps to one
 * HTTP status so the browser client can tell a moderation rejection (show the
 * guidelines message) apart from a generic failure (offer a retry).
 *
 * # Error Categories
 *
 * - `Unauthorized` - no session, or the session is invalid/expired (401)
 * - `ModerationRejected` - the classifier flagged the content (400)
 * - `Validation` - malformed client input (400)
 * - `NotFound` - unknown post or user (404)
 * - `Upstream` - classifier, media store or database failure (500)
 * - `HandlerError` - anything else with an explicit status
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;
use crate::backend::store::StoreError;
use crate::backend::moderation::ClassifierError;
use crate::backend::media::MediaStoreError;

/// Message returned to clients whose content was rejected by moderation
pub const MODERATION_REJECTED_MESSAGE: &str = "Content violates community guidelines";

/// Backend-specific error types
///
/// Lower layers convert into this type with `?`; the HTTP mapping lives in
/// [`status_code`](Self::status_code) and [`message`](Self::message).
///
/// ```rust
/// use socialhub::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::PAYLOAD_TOO_LARGE, "File too large");
/// assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// The request carries no valid session
    #[error("Unauthorized")]
    Unauthorized,

    /// The classifier labelled the content as a violation
    #[error("{}", MODERATION_REJECTED_MESSAGE)]
    ModerationRejected,

    /// Malformed client input
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// An addressed resource does not exist
    #[error("{entity} not found")]
    NotFound {
        /// Kind of resource, e.g. "Post"
        entity: &'static str,
    },

    /// A collaborator (classifier, media store, database) failed
    #[error("{service} failure: {message}")]
    Upstream {
        /// Which collaborator failed
        service: &'static str,
        /// Best-effort message from the collaborator
        message: String,
    },
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new upstream failure
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Unauthorized` - 401 Unauthorized
    /// - `ModerationRejected` / `Validation` - 400 Bad Request
    /// - `NotFound` - 404 Not Found
    /// - `Upstream` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ModerationRejected => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message sent to the client
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::ModerationRejected => MODERATION_REJECTED_MESSAGE.to_string(),
            Self::Validation(err) => err.client_message(),
            Self::NotFound { entity } => format!("{} not found", entity),
            Self::Upstream { message, .. } => message.clone(),
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity } => Self::NotFound { entity },
            other => Self::upstream("store", other.to_string()),
        }
    }
}

impl From<ClassifierError> for BackendError {
    fn from(err: ClassifierError) -> Self {
        Self::upstream("classifier", err.client_message())
    }
}

impl From<MediaStoreError> for BackendError {
    fn from(err: MediaStoreError) -> Self {
        Self::upstream("media store", err.client_message())
    }
}
