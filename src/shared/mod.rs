//! Shared Module
//!
//! Types shared between the server and its browser client: the JSON shapes of
//! posts, comments and user summaries, and the validation errors raised while
//! building them. Nothing in here touches the network or the database.

/// Post, comment and user summary wire types
pub mod post;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use post::{CommentView, CreateCommentRequest, MediaKind, PostView, UserSummary};
pub use error::SharedError;
