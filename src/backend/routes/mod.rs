//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly and layers
//! └── api_routes.rs   - Auth and post routes
//! ```
//!
//! # Routes
//!
//! - `GET /health` - liveness check
//! - `GET /auth/check`, `GET /auth/logout`
//! - `GET /posts`, `POST /posts/create`
//! - `POST /posts/{id}/like`, `POST /posts/{id}/comment`

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
