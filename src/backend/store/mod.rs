//! Store Module
//!
//! Persistence for users, sessions and posts. Handlers and the post pipeline
//! only see the traits defined here; two backends implement them:
//!
//! - **`postgres`** - `PgStore`, the production backend (sqlx, PostgreSQL)
//! - **`memory`** - `MemoryStore`, used when `DATABASE_URL` is unset and in tests
//!
//! # Atomicity
//!
//! `toggle_like` and `add_comment` are read-modify-write operations on a
//! single post. Both backends run them atomically: PostgreSQL takes a row
//! lock on the post inside a transaction, the memory store holds its write
//! lock for the whole operation. Two concurrent toggles by different users
//! are therefore both reflected, and two concurrent toggles by the same user
//! cancel out instead of double-applying.
//!
//! # Expansion
//!
//! Every read of a post returns a [`PostView`]: author and comment authors
//! resolved to [`UserSummary`](crate::shared::UserSummary) values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::{IdentityProfile, User};
use crate::shared::{MediaKind, PostView};

/// PostgreSQL backend
pub mod postgres;

/// In-memory backend
pub mod memory;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed document does not exist
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Input or a stored value violates an invariant
    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn post_not_found() -> Self {
        Self::NotFound { entity: "Post" }
    }

    pub fn user_not_found() -> Self {
        Self::NotFound { entity: "User" }
    }
}

/// Fields of a post to be created; id and timestamp are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: Option<String>,
    pub media_url: Option<String>,
    pub media_kind: MediaKind,
}

/// A post as stored, without likes, comments or expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: Option<String>,
    pub media_url: Option<String>,
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create the user on first sign-in, refresh name/email/picture afterwards
    async fn upsert_identity(&self, profile: &IdentityProfile) -> Result<User, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, user_id: Uuid, ttl: Duration) -> Result<Session, StoreError>;

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Returns whether a session was removed
    async fn delete_session(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Remove every session that expired before `now`, returning how many
    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Fails with `NotFound` only when the author does not exist
    async fn create_post(&self, post: NewPost) -> Result<PostRecord, StoreError>;

    async fn get_post(&self, id: Uuid) -> Result<PostView, StoreError>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<PostView>, StoreError>;

    /// Flip `user_id`'s membership in the post's like set
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<PostView, StoreError>;

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<PostView, StoreError>;
}

/// Everything the server needs from a backend
pub trait Store: UserStore + SessionStore + PostStore {}

impl<T> Store for T where T: UserStore + SessionStore + PostStore {}

/// Checks the post invariant shared by both backends
pub(crate) fn validate_new_post(post: &NewPost) -> Result<(), StoreError> {
    let has_text = post.text.as_deref().is_some_and(|t| !t.trim().is_empty());
    if !has_text && post.media_url.is_none() {
        return Err(StoreError::Invalid(
            "a post needs non-empty text or a media URL".to_string(),
        ));
    }
    Ok(())
}

/// Creation and expiry instants for a session opened now
pub(crate) fn session_window(ttl: Duration) -> Result<(DateTime<Utc>, DateTime<Utc>), StoreError> {
    let now = Utc::now();
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| StoreError::Invalid(format!("session ttl {:?} out of range", ttl)))?;
    Ok((now, expires_at))
}
