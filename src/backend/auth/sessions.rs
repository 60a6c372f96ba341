/**
 * Session Management and JWT Tokens
 *
 * A session is a server-side record (see `backend::store::SessionStore`)
 * plus a signed JWT naming it. The token alone is never trusted: every
 * request resolves the `sid` claim back to a live session row, so logging
 * out or purging a session revokes its token immediately.
 */

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::auth::users::{IdentityProfile, User};
use crate::backend::error::BackendError;
use crate::backend::server::config::SessionSettings;
use crate::backend::store::Store;

/// Server-side session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Session ID
    pub sid: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Signing and verification keys derived from the session secret
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens").finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `session`, expiring together with it
    pub fn create_token(&self, session: &Session) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: session.user_id.to_string(),
            sid: session.id.to_string(),
            exp: session.expires_at.timestamp().max(0) as u64,
            iat: session.created_at.timestamp().max(0) as u64,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub user: User,
    pub session: Session,
    pub token: String,
}

/// Identity-provider hand-off: upsert the user, open a session, sign a token
pub async fn establish_session(
    store: &Arc<dyn Store>,
    tokens: &SessionTokens,
    ttl: Duration,
    profile: &IdentityProfile,
) -> Result<EstablishedSession, BackendError> {
    let user = store.upsert_identity(profile).await?;
    let session = store.create_session(user.id, ttl).await?;
    let token = tokens
        .create_token(&session)
        .map_err(|e| BackendError::upstream("session", e.to_string()))?;

    tracing::info!(user_id = %user.id, session_id = %session.id, "Session established");

    Ok(EstablishedSession {
        user,
        session,
        token,
    })
}

/// Resolve a token to its live session and user
///
/// Any failure (bad signature, unknown or expired session, subject mismatch,
/// deleted user) is reported as `Unauthorized`.
pub async fn resolve_session(
    store: &Arc<dyn Store>,
    tokens: &SessionTokens,
    token: &str,
) -> Result<(Session, User), BackendError> {
    let claims = tokens.verify_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        BackendError::Unauthorized
    })?;

    let session_id = Uuid::parse_str(&claims.sid).map_err(|_| BackendError::Unauthorized)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| BackendError::Unauthorized)?;

    let session = store
        .get_session(session_id)
        .await?
        .ok_or(BackendError::Unauthorized)?;

    if session.is_expired(Utc::now()) || session.user_id != user_id {
        return Err(BackendError::Unauthorized);
    }

    let user = store
        .get_user(user_id)
        .await?
        .ok_or(BackendError::Unauthorized)?;

    Ok((session, user))
}

/// Pull the session token from `Authorization: Bearer` or the session cookie
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// HttpOnly session cookie living as long as the session
pub fn session_cookie(settings: &SessionSettings, token: String) -> Cookie<'static> {
    let max_age = time::Duration::try_from(settings.ttl).unwrap_or(time::Duration::ZERO);

    Cookie::build((settings.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

/// Same cookie with an empty value and `Max-Age=0`, telling the browser to drop it
pub fn cleared_session_cookie(settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}
