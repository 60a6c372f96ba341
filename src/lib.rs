//! SocialHub - Main Library
//!
//! Backend of a small social feed: users sign in through an identity
//! provider, publish text and media posts, like and comment on them. Every
//! new post is screened by a remote content classifier before it is
//! uploaded or stored; rejected authors receive a violation notice by email.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types returned to the browser client
//!   - Expanded posts, comments, user summaries, media kinds
//!   - Validation errors
//!
//! - **`backend`** - Axum HTTP server
//!   - Session gate, post pipeline, feed and interaction handlers
//!   - PostgreSQL and in-memory stores
//!   - Classifier, media store and mail clients
//!
//! # Usage
//!
//! ```rust,no_run
//! use socialhub::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for client-facing validation failures
//! - `backend::error::BackendError` for everything a handler can return,
//!   with one HTTP status per variant

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
