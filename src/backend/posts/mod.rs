//! Posts Module
//!
//! The post pipeline and the feed/interaction endpoints.
//!
//! - **`pipeline`** - moderation, upload and persistence of new posts
//! - **`handlers`** - HTTP handlers for `/posts`

/// Post submission pipeline
pub mod pipeline;

/// HTTP handlers
pub mod handlers;

pub use handlers::{comment_post, create_post, like_post, list_posts};
pub use pipeline::{PostPipeline, Submission};
