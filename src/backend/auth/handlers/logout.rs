/**
 * Logout Handler
 *
 * `GET /auth/logout` deletes the presented session, clears the session
 * cookie and redirects to the web client. It is public: a request without a
 * session, or with a stale one, is still redirected.
 */

use axum::{extract::State, http::HeaderMap, response::Redirect};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::backend::auth::sessions::{cleared_session_cookie, extract_session_token};
use crate::backend::server::state::AppState;

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Redirect) {
    let session_id = extract_session_token(&headers, &state.config.session.cookie_name)
        .and_then(|token| state.tokens.verify_token(&token).ok())
        .and_then(|claims| Uuid::parse_str(&claims.sid).ok());

    if let Some(session_id) = session_id {
        match state.store.delete_session(session_id).await {
            Ok(true) => tracing::info!(%session_id, "Session ended"),
            Ok(false) => tracing::debug!(%session_id, "Logout for unknown session"),
            Err(e) => tracing::error!(%session_id, error = %e, "Failed to delete session"),
        }
    }

    (
        jar.add(cleared_session_cookie(&state.config.session)),
        Redirect::to(&state.config.client_url),
    )
}
