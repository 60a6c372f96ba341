//! Moderation Module
//!
//! Screens submitted content through a remote classifier before anything is
//! uploaded or persisted. Moderation is fail-closed: a classifier that cannot
//! be reached, times out or answers with garbage fails the submission.
//!
//! # Wire Contract
//!
//! - text: `POST <AI_API_URL>` with JSON `{"text": "..."}`
//! - file: `POST <AI_API_URL>` with `multipart/form-data`, one `file` part
//!
//! The response is JSON with a string `predicted_label`; `confidence` is
//! read when numeric and the whole body is kept as metadata.

use async_trait::async_trait;
use thiserror::Error;

use crate::backend::media::Attachment;

/// HTTP classifier client
pub mod http;

pub use http::HttpClassifier;

/// What gets sent to the classifier
#[derive(Debug, Clone, Copy)]
pub enum ClassifierInput<'a> {
    Text(&'a str),
    File(&'a Attachment),
}

impl ClassifierInput<'_> {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::File(_) => "file",
        }
    }
}

/// Classifier verdict
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: Option<f64>,
    pub metadata: serde_json::Value,
}

impl Classification {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Exact, case-sensitive match against the violation category
    pub fn is_violation(&self, violation_label: &str) -> bool {
        self.label == violation_label
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Classifier returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed classifier response: {0}")]
    Malformed(String),
}

impl ClassifierError {
    /// Message surfaced to the client in a 500 response
    pub fn client_message(&self) -> String {
        match self {
            Self::Request(err) if err.is_timeout() => "Content analysis timed out".to_string(),
            Self::Request(_) => "Content analysis unavailable".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Malformed(_) => "Content analysis returned an invalid response".to_string(),
        }
    }
}

#[async_trait]
pub trait ContentClassifier: Send + Sync {
    async fn classify(&self, input: ClassifierInput<'_>) -> Result<Classification, ClassifierError>;
}
