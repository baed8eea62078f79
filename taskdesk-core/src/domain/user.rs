//! User domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account, as persisted in the users collection
///
/// The password is stored exactly as supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Create a user with a freshly generated identifier
    pub fn new(username: impl Into<String>, password: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password: password.into(),
            is_admin,
        }
    }

    /// Exact, case-sensitive credential comparison
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public view of a user; never carries the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}
