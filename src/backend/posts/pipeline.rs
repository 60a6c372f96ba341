/**
 * Post Pipeline
 *
 * Moves one submission through moderation, upload and persistence:
 *
 * ```text
 * Received -> Classifying -> Uploading -> Persisting -> Published
 *                  |
 *                  +-> Rejected (notice dispatched, nothing stored)
 * ```
 *
 * Text is classified before the file. Nothing is uploaded until every part
 * is approved, and nothing is persisted unless the upload succeeded. If
 * persistence fails after an upload, the asset is deleted again on a
 * detached task.
 */

use std::sync::Arc;

use crate::backend::error::BackendError;
use crate::backend::media::{Attachment, MediaStore, StoredMedia};
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::moderation::{ClassifierInput, ContentClassifier};
use crate::backend::notify::{dispatch_violation_notice, Notifier};
use crate::backend::store::{NewPost, Store};
use crate::shared::{MediaKind, PostView, SharedError};

/// Validated content of a post submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text(String),
    File(Attachment),
    Both { text: String, file: Attachment },
}

impl Submission {
    /// Blank text counts as absent; a submission needs text or a file
    pub fn from_parts(text: Option<String>, file: Option<Attachment>) -> Result<Self, SharedError> {
        let text = text.filter(|t| !t.trim().is_empty());

        match (text, file) {
            (Some(text), Some(file)) => Ok(Self::Both { text, file }),
            (Some(text), None) => Ok(Self::Text(text)),
            (None, Some(file)) => Ok(Self::File(file)),
            (None, None) => Err(SharedError::validation(
                "text",
                "Post must have text or media",
            )),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Both { text, .. } => Some(text),
            Self::File(_) => None,
        }
    }

    pub fn file(&self) -> Option<&Attachment> {
        match self {
            Self::File(file) | Self::Both { file, .. } => Some(file),
            Self::Text(_) => None,
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        self.file().map(|f| f.kind).unwrap_or(MediaKind::Text)
    }
}

pub struct PostPipeline {
    store: Arc<dyn Store>,
    classifier: Arc<dyn ContentClassifier>,
    media: Arc<dyn MediaStore>,
    notifier: Arc<dyn Notifier>,
    violation_label: String,
}

impl PostPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        classifier: Arc<dyn ContentClassifier>,
        media: Arc<dyn MediaStore>,
        notifier: Arc<dyn Notifier>,
        violation_label: impl Into<String>,
    ) -> Self {
        Self {
            store,
            classifier,
            media,
            notifier,
            violation_label: violation_label.into(),
        }
    }

    /// Run `submission` through the pipeline on behalf of `author`
    pub async fn submit(
        &self,
        author: &AuthenticatedUser,
        submission: Submission,
    ) -> Result<PostView, BackendError> {
        let user_id = author.user_id;
        tracing::info!(%user_id, stage = "classifying", "Screening submission");

        if let Some(text) = submission.text() {
            self.screen(author, ClassifierInput::Text(text)).await?;
        }
        if let Some(file) = submission.file() {
            self.screen(author, ClassifierInput::File(file)).await?;
        }

        let stored = match submission.file() {
            Some(file) => {
                tracing::info!(%user_id, stage = "uploading", kind = %file.kind, "Uploading media");
                Some(self.media.upload(file).await.map_err(|e| {
                    tracing::error!(%user_id, error = %e, "Media upload failed");
                    BackendError::from(e)
                })?)
            }
            None => None,
        };

        tracing::info!(%user_id, stage = "persisting", "Persisting post");
        let new_post = NewPost {
            author_id: user_id,
            text: submission.text().map(str::to_string),
            media_url: stored.as_ref().map(|m| m.url.clone()),
            media_kind: submission.media_kind(),
        };

        let record = match self.store.create_post(new_post).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(%user_id, error = %e, "Failed to persist post");
                if let Some(media) = stored {
                    self.discard_upload(media);
                }
                return Err(e.into());
            }
        };

        let view = self.store.get_post(record.id).await?;
        tracing::info!(%user_id, post_id = %view.id, stage = "published", "Post published");

        Ok(view)
    }

    /// Classify one part; a violation dispatches a notice and rejects
    async fn screen(
        &self,
        author: &AuthenticatedUser,
        input: ClassifierInput<'_>,
    ) -> Result<(), BackendError> {
        let verdict = self.classifier.classify(input).await.map_err(|e| {
            tracing::error!(user_id = %author.user_id, input = input.kind(), error = %e, "Classifier failed");
            BackendError::from(e)
        })?;

        if verdict.is_violation(&self.violation_label) {
            tracing::warn!(
                user_id = %author.user_id,
                input = input.kind(),
                label = %verdict.label,
                stage = "rejected",
                "Submission rejected by moderation"
            );
            dispatch_violation_notice(self.notifier.clone(), author.email.clone());
            return Err(BackendError::ModerationRejected);
        }

        Ok(())
    }

    /// Best-effort delete of an upload whose post was never stored
    fn discard_upload(&self, media: StoredMedia) {
        let store = self.media.clone();
        tokio::spawn(async move {
            match store.delete(&media).await {
                Ok(()) => tracing::info!(public_id = %media.public_id, "Orphaned upload removed"),
                Err(e) => tracing::error!(
                    public_id = %media.public_id,
                    error = %e,
                    "Failed to remove orphaned upload"
                ),
            }
        });
    }
}
