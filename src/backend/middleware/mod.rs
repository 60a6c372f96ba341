//! Middleware Module
//!
//! HTTP middleware applied before handlers run.
//!
//! - **`auth`** - session gate for protected routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use socialhub::backend::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/posts/create", post(create_post))
//!     .route_layer(from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
