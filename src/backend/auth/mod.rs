//! Authentication Module
//!
//! Users, server-side sessions and the HTTP handlers around them.
//!
//! - **`users`** - user model and identity-provider profile
//! - **`sessions`** - session records, JWT signing, tokens and cookies
//! - **`oauth`** - Google OAuth 2.0 client
//! - **`handlers`** - Google sign-in, `GET /auth/check` and `GET /auth/logout`
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model
//! ├── sessions.rs     - Sessions and tokens
//! ├── oauth.rs        - Google OAuth client
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Session Flow
//!
//! 1. **Sign-in**: `GET /auth/google` sends the browser to Google; the
//!    callback turns the returned code into an [`IdentityProfile`] and
//!    [`establish_session`] upserts the user, stores a session and signs a
//!    token naming it, which is set as the session cookie
//! 2. **Requests**: the token travels as a Bearer header or the session
//!    cookie and is resolved by the auth middleware on every protected route
//! 3. **Logout**: the session row is deleted, which revokes the token

/// User data model
pub mod users;

/// Session records and tokens
pub mod sessions;

/// Google OAuth client
pub mod oauth;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{check, google_callback, google_login, logout, UserResponse};
pub use oauth::{GoogleOAuth, OAuthError};
pub use sessions::{establish_session, EstablishedSession, Session, SessionTokens};
pub use users::{IdentityProfile, User};
