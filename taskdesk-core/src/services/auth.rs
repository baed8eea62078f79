//! Authorization gate - admin-or-not decision for a caller
//!
//! The caller identifier is trusted as given. Binding it to a verified
//! session is the job of whatever transport sits in front of the core.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::RecordStore;
use crate::services::UserRepository;

pub struct AuthorizationGate<S> {
    users: Arc<UserRepository<S>>,
}

impl<S: RecordStore<User>> AuthorizationGate<S> {
    pub fn new(users: Arc<UserRepository<S>>) -> Self {
        Self { users }
    }

    /// True only if `caller_id` resolves to a user flagged as admin
    pub fn is_caller_admin(&self, caller_id: &str) -> Result<bool> {
        Ok(self
            .users
            .find_by_id(caller_id)?
            .map(|u| u.is_admin)
            .unwrap_or(false))
    }

    /// Fail with `AccessDenied` unless the caller is an admin
    ///
    /// A missing identifier is an unknown caller.
    pub fn require_admin(&self, caller_id: Option<&str>) -> Result<()> {
        let allowed = match caller_id {
            Some(id) => self.is_caller_admin(id)?,
            None => false,
        };
        if allowed {
            Ok(())
        } else {
            tracing::warn!(caller_id = caller_id.unwrap_or("<none>"), "access denied");
            Err(Error::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn setup() -> (Arc<UserRepository<MemoryStore<User>>>, AuthorizationGate<MemoryStore<User>>) {
        let users = Arc::new(UserRepository::new(Arc::new(MemoryStore::new())));
        let gate = AuthorizationGate::new(Arc::clone(&users));
        (users, gate)
    }

    #[test]
    fn test_admin_caller() {
        let (users, gate) = setup();
        let admin = users.register("root", "pw", true).unwrap();

        assert!(gate.is_caller_admin(&admin.id).unwrap());
        assert!(gate.require_admin(Some(&admin.id)).is_ok());
    }

    #[test]
    fn test_non_admin_caller() {
        let (users, gate) = setup();
        let alice = users.register("alice", "pw", false).unwrap();

        assert!(!gate.is_caller_admin(&alice.id).unwrap());
        assert!(matches!(
            gate.require_admin(Some(&alice.id)),
            Err(Error::AccessDenied)
        ));
    }

    #[test]
    fn test_unknown_or_missing_caller() {
        let (users, gate) = setup();
        users.register("root", "pw", true).unwrap();

        assert!(!gate.is_caller_admin("no-such-id").unwrap());
        // Usernames are not identifiers
        assert!(!gate.is_caller_admin("root").unwrap());
        assert!(matches!(gate.require_admin(None), Err(Error::AccessDenied)));
    }
}
