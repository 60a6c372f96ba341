/**
 * Google Sign-in Handlers
 *
 * - `GET /auth/google` stores a random `state` in a short-lived cookie and
 *   redirects to Google's consent screen
 * - `GET /auth/google/callback` checks `state`, exchanges the code for a
 *   profile, establishes a session, sets the session cookie and redirects to
 *   the web client
 *
 * Any callback failure redirects to `<CLIENT_URL>/login` without a session.
 */

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::auth::sessions::{establish_session, session_cookie};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub const OAUTH_STATE_COOKIE: &str = "socialhub_oauth_state";
const OAUTH_STATE_PATH: &str = "/auth/google";
const OAUTH_STATE_TTL: time::Duration = time::Duration::minutes(10);

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn state_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, value))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), BackendError> {
    let csrf = Uuid::new_v4().to_string();
    let url = state
        .google
        .authorize_url(&csrf)
        .map_err(|e| BackendError::upstream("google", e.to_string()))?;

    Ok((
        jar.add(state_cookie(csrf, OAUTH_STATE_TTL)),
        Redirect::to(&url),
    ))
}

pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.add(state_cookie(String::new(), time::Duration::ZERO));
    let failure = Redirect::to(&format!("{}/login", state.config.client_url));

    if let Some(error) = params.error {
        tracing::warn!(%error, "Google sign-in denied");
        return (jar, failure);
    }

    let state_matches = matches!(
        (&expected, &params.state),
        (Some(expected), Some(got)) if !expected.is_empty() && expected == got
    );
    if !state_matches {
        tracing::warn!("Google callback with missing or mismatched state");
        return (jar, failure);
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("Google callback without code");
        return (jar, failure);
    };

    let profile = match state.google.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "Google code exchange failed");
            return (jar, failure);
        }
    };

    let established = match establish_session(
        &state.store,
        &state.tokens,
        state.config.session.ttl,
        &profile,
    )
    .await
    {
        Ok(established) => established,
        Err(e) => {
            tracing::error!(error = %e, "Failed to establish session");
            return (jar, failure);
        }
    };

    tracing::info!(user_id = %established.user.id, "Signed in with Google");
    (
        jar.add(session_cookie(&state.config.session, established.token)),
        Redirect::to(&state.config.client_url),
    )
}
