//! Media Module
//!
//! Attachments submitted with posts and the durable media store they are
//! uploaded to once moderation approves them.
//!
//! - **`cloudinary`** - `CloudinaryStore`, the production [`MediaStore`]
//!
//! The post pipeline only depends on the [`MediaStore`] trait, so tests can
//! substitute a recording fake.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::shared::{MediaKind, SharedError};

/// Cloudinary upload API client
pub mod cloudinary;

pub use cloudinary::CloudinaryStore;

/// A file received with a post submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub kind: MediaKind,
}

impl Attachment {
    /// Build an attachment, deriving its kind from the declared content type
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> Result<Self, SharedError> {
        let content_type = content_type.into();
        let kind = MediaKind::from_content_type(&content_type)?;

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
            kind,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where an uploaded attachment ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Public HTTPS URL stored on the post
    pub url: String,
    /// Store-side identifier, needed to delete the asset
    pub public_id: String,
    /// Store-side resource class (`image`, `video`, `raw`)
    pub resource_type: String,
}

#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("Media store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Media store returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed media store response: {0}")]
    Malformed(String),
}

impl MediaStoreError {
    /// Message surfaced to the client in a 500 response
    pub fn client_message(&self) -> String {
        match self {
            Self::Request(err) if err.is_timeout() => "Media upload timed out".to_string(),
            Self::Request(_) => "Media upload failed".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Malformed(_) => "Media upload failed".to_string(),
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, attachment: &Attachment) -> Result<StoredMedia, MediaStoreError>;

    /// Remove a previously uploaded asset
    async fn delete(&self, media: &StoredMedia) -> Result<(), MediaStoreError>;
}
