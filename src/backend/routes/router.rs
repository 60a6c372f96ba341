/**
 * Router Configuration
 *
 * Assembles all routes and the cross-cutting layers:
 *
 * - `TraceLayer` - request spans and latency logging
 * - `CorsLayer` - the web client's origin, with credentials for the cookie
 * - `TimeoutLayer` - overall request deadline; the handler future (and any
 *   outbound call it is awaiting) is dropped when it fires, and the client
 *   gets the usual JSON error body with 408
 * - `DefaultBodyLimit` - upload cap plus room for the other multipart fields
 */

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    BoxError, Router,
};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::{configure_auth_routes, configure_post_routes};
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Room for non-file multipart fields and boundaries
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.client_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::error!(client_url = %config.client_url, error = %e, "Invalid CLIENT_URL; CORS disabled");
            layer
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> BackendError {
    BackendError::NotFound { entity: "Route" }
}

/// Map errors from the timeout middleware into the JSON error body
async fn handle_middleware_error(err: BoxError) -> BackendError {
    if err.is::<Elapsed>() {
        BackendError::handler(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let router = Router::new().route("/health", get(health));
    let router = configure_auth_routes(router, &app_state);
    let router = configure_post_routes(router, &app_state);

    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
        ))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
