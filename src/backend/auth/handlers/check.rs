/**
 * Session Check Handler
 *
 * `GET /auth/check` returns the user behind the presented session. The route
 * sits behind the auth middleware, so an absent or invalid session never
 * reaches this handler and is answered with 401.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::AuthUser;

pub async fn check(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
