/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Authentication
 * - `GET /auth/google` - redirect to Google's consent screen
 * - `GET /auth/google/callback` - finish sign-in, set the session cookie
 * - `GET /auth/check` - current user (requires authentication)
 * - `GET /auth/logout` - end the session, redirect to the client
 *
 * ## Posts
 * - `GET /posts` - public feed
 * - `POST /posts/create` - create a post (requires authentication)
 * - `POST /posts/{id}/like` - toggle like (requires authentication)
 * - `POST /posts/{id}/comment` - add a comment (requires authentication)
 *
 * Protected routes are grouped in their own router and wrapped with the
 * auth middleware via `route_layer`, so unknown paths still fall through to
 * 404 instead of 401.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{check, google_callback, google_login, logout};
use crate::backend::middleware::auth_middleware;
use crate::backend::posts::{comment_post, create_post, like_post, list_posts};
use crate::backend::server::state::AppState;

/// Configure authentication routes
pub fn configure_auth_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/check", get(check))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    router
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/logout", get(logout))
        .merge(protected)
}

/// Configure post routes
pub fn configure_post_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/posts/create", post(create_post))
        .route("/posts/{id}/like", post(like_post))
        .route("/posts/{id}/comment", post(comment_post))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    router
        .route("/posts", get(list_posts))
        .merge(protected)
}
