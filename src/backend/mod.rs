//! Backend Module
//!
//! This module contains all server-side code for SocialHub. It provides an
//! Axum HTTP server exposing the feed, post creation and interaction
//! endpoints, with content moderation gating every new post.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Users, sessions and the auth endpoints
//! - **`middleware`** - The session gate that protects mutating routes
//! - **`store`** - Persistence traits with PostgreSQL and in-memory backends
//! - **`moderation`** - Client for the remote content classifier
//! - **`media`** - Client for the object store holding attachments
//! - **`notify`** - Violation notice emails
//! - **`posts`** - The post pipeline and the feed/interaction handlers
//! - **`error`** - Backend error types and their HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary entry point
//! ├── server/         - Config, state, initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Users, sessions, auth handlers
//! ├── middleware/     - Session gate
//! ├── store/          - PostgreSQL and memory stores
//! ├── moderation/     - Content classifier client
//! ├── media/          - Media store client
//! ├── notify/         - Violation notice mailer
//! ├── posts/          - Post pipeline and handlers
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! client -> session gate -> post pipeline -> classifier
//!                                         -> media store (approved + file)
//!                                         -> store -> expanded post
//!                                         -> mailer (rejected, detached)
//! ```
//!
//! # State Management
//!
//! Handlers share an [`AppState`](server::AppState) holding the immutable
//! configuration, the store and the post pipeline. Nothing else is shared
//! between requests; the store is the single arbiter of consistency.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication, users and sessions
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Persistence layer
pub mod store;

/// Content classifier client
pub mod moderation;

/// Media store client
pub mod media;

/// Violation notifications
pub mod notify;

/// Post pipeline and feed/interaction handlers
pub mod posts;

/// Re-export commonly used types
pub use server::{create_app, AppState, ServerConfig};
pub use error::BackendError;
pub use posts::pipeline::PostPipeline;
