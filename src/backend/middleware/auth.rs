/**
 * Authentication Middleware
 *
 * Guards every mutating route and `GET /auth/check`. The session token is
 * read from the `Authorization: Bearer` header or the session cookie,
 * verified, and resolved to a live session and user. Requests that fail any
 * of these steps are answered with 401 before the handler runs.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::{extract_session_token, resolve_session};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Identity of the session owner, attached to request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
    pub name: String,
    pub profile_pic: Option<String>,
}

/// Authentication middleware
///
/// 1. Extracts the session token (Bearer header, then cookie)
/// 2. Verifies the token and resolves its session and user
/// 3. Attaches an [`AuthenticatedUser`] to the request extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = extract_session_token(request.headers(), &app_state.config.session.cookie_name)
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Missing session token");
            BackendError::Unauthorized
        })?;

    let (session, user) = resolve_session(&app_state.store, &app_state.tokens, &token).await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        session_id: session.id,
        email: user.email,
        name: user.name,
        profile_pic: user.profile_pic,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Unauthorized
            })?;

        Ok(AuthUser(user))
    }
}
