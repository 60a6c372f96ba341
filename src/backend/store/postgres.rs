/**
 * PostgreSQL Store
 *
 * Production backend. Posts are expanded with three queries per read
 * (posts joined to their authors, likes, comments joined to their authors)
 * regardless of how many posts are returned.
 *
 * Like toggles and comment appends lock the post row (`SELECT ... FOR
 * UPDATE`) inside a transaction, so concurrent mutations of one post are
 * serialized and the returned view always reflects the committed state.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::{IdentityProfile, User};
use crate::backend::store::{
    session_window, validate_new_post, NewPost, PostRecord, PostStore, SessionStore, StoreError,
    UserStore,
};
use crate::shared::{CommentView, MediaKind, PostView, UserSummary};

const POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.text, p.media_url, p.media_type, p.created_at,
           u.name AS author_name, u.profile_pic AS author_profile_pic
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    text: Option<String>,
    media_url: Option<String>,
    media_type: String,
    created_at: DateTime<Utc>,
    author_name: String,
    author_profile_pic: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LikeRow {
    post_id: Uuid,
    user_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_name: String,
    author_profile_pic: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct InsertedPost {
    id: Uuid,
    author_id: Uuid,
    text: Option<String>,
    media_url: Option<String>,
    media_type: String,
    created_at: DateTime<Utc>,
}

fn parse_media_kind(value: &str) -> Result<MediaKind, StoreError> {
    value
        .parse::<MediaKind>()
        .map_err(|e| StoreError::Invalid(e.to_string()))
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` with the server's pool settings
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Apply pending migrations from `migrations/`
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Resolve likes and comments for `rows`, preserving row order
    async fn expand(
        conn: &mut PgConnection,
        rows: Vec<PostRow>,
    ) -> Result<Vec<PostView>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let likes: Vec<LikeRow> = sqlx::query_as(
            "SELECT post_id, user_id FROM post_likes WHERE post_id = ANY($1) ORDER BY created_at, user_id",
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let comments: Vec<CommentRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.post_id, c.text, c.created_at,
                   c.author_id, u.name AS author_name, u.profile_pic AS author_profile_pic
            FROM post_comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ANY($1)
            ORDER BY c.position
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for like in likes {
            likes_by_post.entry(like.post_id).or_default().push(like.user_id);
        }

        let mut comments_by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
        for c in comments {
            comments_by_post.entry(c.post_id).or_default().push(CommentView {
                id: c.id,
                user: UserSummary {
                    id: c.author_id,
                    name: c.author_name,
                    profile_pic: c.author_profile_pic,
                },
                text: c.text,
                created_at: c.created_at,
            });
        }

        rows.into_iter()
            .map(|row| {
                Ok(PostView {
                    id: row.id,
                    user: UserSummary {
                        id: row.author_id,
                        name: row.author_name,
                        profile_pic: row.author_profile_pic,
                    },
                    text: row.text,
                    media_url: row.media_url,
                    media_type: parse_media_kind(&row.media_type)?,
                    likes: likes_by_post.remove(&row.id).unwrap_or_default(),
                    comments: comments_by_post.remove(&row.id).unwrap_or_default(),
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    async fn load_post(conn: &mut PgConnection, id: Uuid) -> Result<PostView, StoreError> {
        let row: Option<PostRow> = sqlx::query_as(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        let row = row.ok_or_else(StoreError::post_not_found)?;
        Self::expand(conn, vec![row])
            .await?
            .pop()
            .ok_or_else(StoreError::post_not_found)
    }

    /// Take the row lock that serializes mutations of one post
    async fn lock_post(conn: &mut PgConnection, id: Uuid) -> Result<(), StoreError> {
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        locked.map(|_| ()).ok_or_else(StoreError::post_not_found)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn upsert_identity(&self, profile: &IdentityProfile) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, provider_id, name, email, profile_pic)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (provider_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                profile_pic = EXCLUDED.profile_pic
            RETURNING id, provider_id, name, email, profile_pic, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&profile.provider_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.profile_pic)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, provider_id, name, email, profile_pic, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, user_id: Uuid, ttl: Duration) -> Result<Session, StoreError> {
        let (created_at, expires_at) = session_window(ttl)?;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::user_not_found()
            } else {
                e.into()
            }
        })?;

        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn delete_session(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_post(&self, post: NewPost) -> Result<PostRecord, StoreError> {
        validate_new_post(&post)?;

        let row = sqlx::query_as::<_, InsertedPost>(
            r#"
            INSERT INTO posts (id, author_id, text, media_url, media_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, text, media_url, media_type, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post.author_id)
        .bind(&post.text)
        .bind(&post.media_url)
        .bind(post.media_kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::user_not_found()
            } else {
                e.into()
            }
        })?;

        Ok(PostRecord {
            id: row.id,
            author_id: row.author_id,
            text: row.text,
            media_url: row.media_url,
            media_kind: parse_media_kind(&row.media_type)?,
            created_at: row.created_at,
        })
    }

    async fn get_post(&self, id: Uuid) -> Result<PostView, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::load_post(&mut conn, id).await
    }

    async fn list_posts(&self) -> Result<Vec<PostView>, StoreError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<PostRow> =
            sqlx::query_as(&format!("{POST_SELECT} ORDER BY p.created_at DESC, p.seq DESC"))
                .fetch_all(&mut *conn)
                .await?;

        Self::expand(&mut conn, rows).await
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<PostView, StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_post(&mut tx, post_id).await?;

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        StoreError::user_not_found()
                    } else {
                        e.into()
                    }
                })?;
        }

        let view = Self::load_post(&mut tx, post_id).await?;
        tx.commit().await?;

        tracing::debug!(%post_id, %user_id, liked = removed == 0, "Like toggled");
        Ok(view)
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

        let mut tx = self.pool.begin().await?;
        Self::lock_post(&mut tx, post_id).await?;

        sqlx::query("INSERT INTO post_comments (id, post_id, author_id, text) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(post_id)
            .bind(author_id)
            .bind(&text)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreError::user_not_found()
                } else {
                    e.into()
                }
            })?;

        let view = Self::load_post(&mut tx, post_id).await?;
        tx.commit().await?;

        Ok(view)
    }
}
