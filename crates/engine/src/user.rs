//! Account holders.
//!
//! Users live in the shared `users/{userId}` document space. The store is
//! guaranteed to contain at least one administrator account after bootstrap
//! (see the sync crate); that account is never deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultEngine, util::normalize_required};

/// Reserved name of the bootstrap administrator account.
///
/// The bootstrap account also uses this as its document id, so concurrent
/// clients seeding it write the same path and last-write-wins converges to a
/// single account.
pub const BOOTSTRAP_ADMIN: &str = "admin";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Creates a new account, rejecting blank names and passwords.
    pub fn new(name: &str, password: &str, is_admin: bool) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: normalize_required(name, "user name")?,
            password: normalize_required(password, "password")?,
            is_admin,
        })
    }

    /// The distinguished administrator seeded on an empty store.
    ///
    /// Initial credential equals the reserved name; the admin is expected to
    /// change it. Credential encryption is out of scope.
    pub fn bootstrap_admin() -> Self {
        Self {
            id: BOOTSTRAP_ADMIN.to_string(),
            name: BOOTSTRAP_ADMIN.to_string(),
            password: BOOTSTRAP_ADMIN.to_string(),
            is_admin: true,
        }
    }

    pub fn is_bootstrap_admin(&self) -> bool {
        self.name == BOOTSTRAP_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_validates() {
        let user = User::new("  sara ", "secret", false).unwrap();
        assert_eq!(user.name, "sara");
        assert!(!user.is_admin);

        assert!(User::new("", "secret", false).is_err());
        assert!(User::new("sara", "   ", false).is_err());
    }

    #[test]
    fn bootstrap_admin_is_reserved() {
        let admin = User::bootstrap_admin();
        assert_eq!(admin.id, BOOTSTRAP_ADMIN);
        assert!(admin.is_admin);
        assert!(admin.is_bootstrap_admin());
    }
}
