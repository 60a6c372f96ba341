/**
 * In-Memory Store
 *
 * Used when no `DATABASE_URL` is configured and by the test suites. All
 * state sits behind one `RwLock`; every mutation runs under a single write
 * guard, which makes like toggles and comment appends atomic per post.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::{IdentityProfile, User};
use crate::backend::store::{
    session_window, validate_new_post, NewPost, PostRecord, PostStore, SessionStore, StoreError,
    UserStore,
};
use crate::shared::{CommentView, PostView, UserSummary};

#[derive(Debug, Clone)]
struct StoredComment {
    id: Uuid,
    author_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredPost {
    record: PostRecord,
    seq: u64,
    likes: Vec<Uuid>,
    comments: Vec<StoredComment>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    users_by_provider: HashMap<String, Uuid>,
    sessions: HashMap<Uuid, Session>,
    posts: HashMap<Uuid, StoredPost>,
    next_seq: u64,
}

impl MemoryState {
    fn summary(&self, user_id: Uuid) -> Result<UserSummary, StoreError> {
        self.users
            .get(&user_id)
            .map(User::summary)
            .ok_or_else(|| StoreError::Invalid(format!("dangling user reference {}", user_id)))
    }

    fn expand(&self, post: &StoredPost) -> Result<PostView, StoreError> {
        let comments = post
            .comments
            .iter()
            .map(|c| {
                Ok(CommentView {
                    id: c.id,
                    user: self.summary(c.author_id)?,
                    text: c.text.clone(),
                    created_at: c.created_at,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(PostView {
            id: post.record.id,
            user: self.summary(post.record.author_id)?,
            text: post.record.text.clone(),
            media_url: post.record.media_url.clone(),
            media_type: post.record.media_kind,
            likes: post.likes.clone(),
            comments,
            created_at: post.record.created_at,
        })
    }

    fn require_user(&self, user_id: Uuid) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::user_not_found())
        }
    }
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_identity(&self, profile: &IdentityProfile) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if let Some(id) = state.users_by_provider.get(&profile.provider_id).copied() {
            let user = state.users.get_mut(&id).ok_or_else(StoreError::user_not_found)?;
            user.name = profile.name.clone();
            user.email = profile.email.clone();
            user.profile_pic = profile.profile_pic.clone();
            return Ok(user.clone());
        }

        let user = User {
            id: Uuid::new_v4(),
            provider_id: profile.provider_id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            profile_pic: profile.profile_pic.clone(),
            created_at: Utc::now(),
        };
        state.users_by_provider.insert(user.provider_id.clone(), user.id);
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, user_id: Uuid, ttl: Duration) -> Result<Session, StoreError> {
        let (created_at, expires_at) = session_window(ttl)?;
        let mut state = self.state.write().await;
        state.require_user(user_id)?;

        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            created_at,
            expires_at,
        };
        state.sessions.insert(session.id, session.clone());

        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(self.state.read().await.sessions.get(&id).cloned())
    }

    async fn delete_session(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.write().await.sessions.remove(&id).is_some())
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, session| !session.is_expired(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, post: NewPost) -> Result<PostRecord, StoreError> {
        validate_new_post(&post)?;
        let mut state = self.state.write().await;
        state.require_user(post.author_id)?;

        let record = PostRecord {
            id: Uuid::new_v4(),
            author_id: post.author_id,
            text: post.text,
            media_url: post.media_url,
            media_kind: post.media_kind,
            created_at: Utc::now(),
        };

        state.next_seq += 1;
        let seq = state.next_seq;
        state.posts.insert(
            record.id,
            StoredPost {
                record: record.clone(),
                seq,
                likes: Vec::new(),
                comments: Vec::new(),
            },
        );

        Ok(record)
    }

    async fn get_post(&self, id: Uuid) -> Result<PostView, StoreError> {
        let state = self.state.read().await;
        let post = state.posts.get(&id).ok_or_else(StoreError::post_not_found)?;
        state.expand(post)
    }

    async fn list_posts(&self) -> Result<Vec<PostView>, StoreError> {
        let state = self.state.read().await;

        let mut posts: Vec<&StoredPost> = state.posts.values().collect();
        posts.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        posts.into_iter().map(|p| state.expand(p)).collect()
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<PostView, StoreError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) {
            return Err(StoreError::post_not_found());
        }
        state.require_user(user_id)?;

        let post = state.posts.get_mut(&post_id).ok_or_else(StoreError::post_not_found)?;
        if let Some(index) = post.likes.iter().position(|id| *id == user_id) {
            post.likes.remove(index);
        } else {
            post.likes.push(user_id);
        }

        let post = state.posts.get(&post_id).ok_or_else(StoreError::post_not_found)?;
        state.expand(post)
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<PostView, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::Invalid("comment text is empty".to_string()));
        }

        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) {
            return Err(StoreError::post_not_found());
        }
        state.require_user(author_id)?;

        let post = state.posts.get_mut(&post_id).ok_or_else(StoreError::post_not_found)?;
        post.comments.push(StoredComment {
            id: Uuid::new_v4(),
            author_id,
            text,
            created_at: Utc::now(),
        });

        let post = state.posts.get(&post_id).ok_or_else(StoreError::post_not_found)?;
        state.expand(post)
    }
}
