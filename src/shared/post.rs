//! Post Wire Types
//!
//! This module defines the JSON shapes the API returns for posts, comments
//! and the user summaries embedded in them. Field names are camelCase on the
//! wire so the browser client can consume them unchanged.
//!
//! # Expanded Posts
//!
//! Every post returned by the API is *expanded*: the author reference and the
//! author of each comment are resolved to a [`UserSummary`]. Likes stay as
//! bare user ids because the client only needs membership checks.
//!
//! ```json
//! {
//!   "id": "3f2b...",
//!   "user": { "id": "9a1c...", "name": "Ada", "profilePic": "https://..." },
//!   "text": "hello world",
//!   "mediaType": "text",
//!   "likes": [],
//!   "comments": [],
//!   "createdAt": "2026-01-01T00:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Kind of content a post carries
///
/// Posts without an attachment are `Text`. For attachments the kind is the
/// primary type of the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Text,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }

    /// Derive the media kind of an attachment from its declared content type
    ///
    /// Only the primary type token is considered, so `image/png` and
    /// `image/webp` both map to [`MediaKind::Image`] and `text/plain` maps to
    /// [`MediaKind::Text`]. Any other primary type is rejected.
    pub fn from_content_type(content_type: &str) -> Result<Self, SharedError> {
        let parsed: mime::Mime = content_type.trim().parse().map_err(|_| {
            SharedError::validation("media", format!("Invalid content type '{}'", content_type))
        })?;

        let primary = parsed.type_();
        if primary == mime::IMAGE {
            Ok(Self::Image)
        } else if primary == mime::VIDEO {
            Ok(Self::Video)
        } else if primary == mime::AUDIO {
            Ok(Self::Audio)
        } else if primary == mime::TEXT {
            Ok(Self::Text)
        } else {
            Err(SharedError::validation(
                "media",
                format!("Unsupported media type '{}'", primary),
            ))
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "text" => Ok(Self::Text),
            other => Err(SharedError::validation(
                "mediaType",
                format!("Unknown media type '{}'", other),
            )),
        }
    }
}

/// Display-ready summary of a user embedded in posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub profile_pic: Option<String>,
}

/// A comment with its author resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub user: UserSummary,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// An expanded post, as returned by every post endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub media_url: Option<String>,
    pub media_type: MediaKind,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}

/// Body of `POST /posts/{id}/comment`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

impl CreateCommentRequest {
    /// Returns the trimmed comment text, rejecting blank comments
    pub fn validated_text(&self) -> Result<String, SharedError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(SharedError::validation("text", "Comment text cannot be empty"));
        }
        Ok(text.to_string())
    }
}
