//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Response types
//! ├── check.rs    - GET /auth/check
//! ├── google.rs   - GET /auth/google and its callback
//! └── logout.rs   - GET /auth/logout
//! ```

/// Response types
pub mod types;

/// Session check handler
pub mod check;

/// Google sign-in handlers
pub mod google;

/// Logout handler
pub mod logout;

pub use check::check;
pub use google::{google_callback, google_login};
pub use logout::logout;
pub use types::UserResponse;
