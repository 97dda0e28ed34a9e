pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Global role of a user.
///
/// A superuser bypasses every club-level permission check.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Superuser,
    User,
}

impl Default for UserRole {
    #[inline]
    fn default() -> Self {
        UserRole::User
    }
}

/// Public view of a user, never carrying the password digest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_pic: String,
    pub registration_time: DateTime<Utc>,
}
