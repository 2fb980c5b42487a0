//! Store connection, bootstrap, and authentication.

use engine::{BOOTSTRAP_ADMIN, User};
use store::{DocumentStore, Subscription};

use crate::{ResultSync, Session, SyncError, decode, paths};

/// A connection to the shared store, prior to any session.
///
/// [`connect`] must complete before [`login`] is usable: login and every
/// mutating action stay disabled until the store has delivered its initial
/// users snapshot.
///
/// [`connect`]: Client::connect
/// [`login`]: Client::login
pub struct Client<S: DocumentStore> {
    store: S,
    users_sub: Option<Subscription>,
    users: Vec<User>,
}

impl<S: DocumentStore> Client<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            users_sub: None,
            users: Vec::new(),
        }
    }

    /// Waits for the initial users snapshot and applies the bootstrap rule.
    ///
    /// Bootstrap: if no account named [`BOOTSTRAP_ADMIN`] exists (in
    /// particular, if the collection is empty), seed exactly that one
    /// account without disturbing others. Concurrent clients all write the
    /// same document path, so last write wins and exactly one such account
    /// remains reachable by the reserved name.
    pub async fn connect(&mut self) -> ResultSync<()> {
        let mut sub = self.store.subscribe(paths::USERS);
        let snapshot = sub.next().await?;
        self.users = decode::users(snapshot.as_ref())?;
        self.users_sub = Some(sub);

        if !self.users.iter().any(User::is_bootstrap_admin) {
            let admin = User::bootstrap_admin();
            tracing::info!("no administrator account found, seeding bootstrap admin");
            self.store
                .set(&paths::user(&admin.id), serde_json::to_value(&admin)?)
                .await?;
            // Optimistic: the listener echo will re-deliver it anyway.
            self.users.push(admin);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.users_sub.is_some()
    }

    /// Current view of the users collection.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Waits for the next users snapshot and replaces the local view.
    pub async fn users_changed(&mut self) -> ResultSync<()> {
        let sub = self.users_sub.as_mut().ok_or(SyncError::Unavailable)?;
        let snapshot = sub.next().await?;
        self.users = decode::users(snapshot.as_ref())?;
        Ok(())
    }

    /// Authenticates and opens a session owning its own subscriptions.
    ///
    /// The denial is generic on purpose: an unknown name and a wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, name: &str, password: &str) -> ResultSync<Session<S>> {
        if self.users_sub.is_none() {
            return Err(SyncError::Unavailable);
        }
        let user = self
            .users
            .iter()
            .find(|u| u.name == name && u.password == password)
            .cloned()
            .ok_or(SyncError::Authentication)?;
        tracing::debug!(user = %user.name, "login accepted");
        Session::open(self.store.clone(), user).await
    }
}
