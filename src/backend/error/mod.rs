//! Backend Error Module
//!
//! Errors returned by handlers and middleware, and their HTTP mapping.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Lower layers (`StoreError`, `ClassifierError`, `MediaStoreError`,
//! `SharedError`) convert into [`BackendError`] with `?`, so handlers never
//! map errors by hand.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, MODERATION_REJECTED_MESSAGE};
