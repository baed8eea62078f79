//! User repository - registration and credential lookup

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::RecordStore;

/// Typed facade over the users collection
///
/// Enforces that `username` is unique across the collection. All lookups are
/// linear scans in stored order and take the first match.
pub struct UserRepository<S> {
    store: Arc<S>,
}

impl<S: RecordStore<User>> UserRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a new user
    ///
    /// The duplicate check and the append run inside a single store update,
    /// so two concurrent registrations of one username cannot both succeed.
    pub fn register(&self, username: &str, password: &str, is_admin: bool) -> Result<User> {
        let user = self.store.update(|users| {
            if users.iter().any(|u| u.username == username) {
                return Err(Error::DuplicateUsername(username.to_string()));
            }
            let user = User::new(username, password, is_admin);
            users.push(user.clone());
            Ok(user)
        });

        match &user {
            Ok(u) => tracing::info!(user_id = %u.id, username, is_admin, "registered user"),
            Err(Error::DuplicateUsername(_)) => {
                tracing::warn!(username, "registration rejected: username taken")
            }
            Err(_) => {}
        }
        user
    }

    /// Find the first user whose username and password both match exactly
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let users = self.store.load()?;
        match users
            .into_iter()
            .find(|u| u.matches_credentials(username, password))
        {
            Some(user) => {
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(user)
            }
            None => {
                tracing::warn!(username, "login rejected");
                Err(Error::InvalidCredentials)
            }
        }
    }

    /// Find the first user with the given identifier
    pub fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.store.load()?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    /// Number of registered users
    pub fn count(&self) -> Result<usize> {
        Ok(self.store.load()?.len())
    }
}
