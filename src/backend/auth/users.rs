/**
 * User Model
 *
 * Users are created the first time an identity-provider profile is presented
 * to the server and refreshed on every later sign-in. Persistence lives in
 * `backend::store`; this module only defines the shapes.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::UserSummary;

/// User struct representing a user in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Subject id assigned by the identity provider
    pub provider_id: String,
    /// Display name
    pub name: String,
    /// User email address, used for violation notices
    pub email: String,
    /// Profile picture URL
    pub profile_pic: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display-ready summary embedded in posts and comments
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            profile_pic: self.profile_pic.clone(),
        }
    }
}

/// A verified profile handed over by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub provider_id: String,
    pub name: String,
    pub email: String,
    pub profile_pic: Option<String>,
}
