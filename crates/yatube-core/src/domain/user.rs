use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED};

/// User entity - an account that can author posts, comment and follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Create a new, unsaved user.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: UNSAVED,
            username: username.into(),
            password_hash: password_hash.into(),
            is_staff: false,
            date_joined: Utc::now(),
        }
    }

    /// Mark the user as staff (may run operator actions such as cache clear).
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}
