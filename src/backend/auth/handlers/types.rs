/**
 * Authentication Handler Types
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::middleware::AuthenticatedUser;

/// Current user as returned by `GET /auth/check`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_pic: Option<String>,
}

impl From<&AuthenticatedUser> for UserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            profile_pic: user.profile_pic.clone(),
        }
    }
}
