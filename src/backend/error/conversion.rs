/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` so handlers and middleware can
 * return them directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "Post not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Json, Response},
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %message, "Request rejected");
        }

        let body = serde_json::json!({
            "message": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
