//! An authenticated session: optimistic local state plus live listeners.

use chrono::{DateTime, NaiveDate, Utc};
use engine::{
    BOOTSTRAP_ADMIN, ChatMessage, Commitment, Expense, Ledger, LedgerSummary, Money, Recipient,
    Theme, User,
};
use serde_json::{Map, Value};
use store::{DocumentStore, Subscription};

use crate::{ResultSync, SyncError, decode, paths};

/// Which document a delivered snapshot refreshed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Users,
    Messages,
    Ledger,
}

/// Explicit session context: created at successful authentication, destroyed
/// at logout, never shared across sessions.
///
/// The session follows the two-phase mutation rule everywhere: every user
/// action updates the local copy immediately and issues the corresponding
/// remote write; the listener echo later replaces local state with the
/// authoritative snapshot, field by field, via [`next_change`]. Dropping the
/// session tears down all three subscriptions, so no update can leak into a
/// stale view or cross into another user's session.
///
/// [`next_change`]: Session::next_change
pub struct Session<S: DocumentStore> {
    store: S,
    user: User,
    ledger: Ledger,
    users: Vec<User>,
    messages: Vec<ChatMessage>,
    users_sub: Subscription,
    messages_sub: Subscription,
    ledger_sub: Subscription,
}

impl<S: DocumentStore> Session<S> {
    pub(crate) async fn open(store: S, user: User) -> ResultSync<Self> {
        let mut users_sub = store.subscribe(paths::USERS);
        let mut messages_sub = store.subscribe(paths::MESSAGES);
        let mut ledger_sub = store.subscribe(&paths::ledger(&user.id));

        let users = decode::users(users_sub.next().await?.as_ref())?;
        let messages = decode::messages(messages_sub.next().await?.as_ref())?;
        let ledger = decode::ledger(ledger_sub.next().await?.as_ref())?;

        Ok(Self {
            store,
            user,
            ledger,
            users,
            messages,
            users_sub,
            messages_sub,
            ledger_sub,
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Derived values for the presentation layer; recomputed on every call.
    #[must_use]
    pub fn summary(&self, today: NaiveDate) -> LedgerSummary {
        engine::summarize(&self.ledger, today)
    }

    /// The viewer's selected conversation, in server order.
    #[must_use]
    pub fn visible_messages(&self, selected: &Recipient) -> Vec<&ChatMessage> {
        engine::visible_messages(&self.messages, &self.user.id, selected)
    }

    /// Waits for the next snapshot on any of the session's paths and
    /// replaces the corresponding local state unconditionally. The remote
    /// snapshot is the single source of truth; local optimistic values are
    /// always eventually overwritten by it.
    pub async fn next_change(&mut self) -> ResultSync<Change> {
        let (change, snapshot) = tokio::select! {
            snap = self.users_sub.next() => (Change::Users, snap?),
            snap = self.messages_sub.next() => (Change::Messages, snap?),
            snap = self.ledger_sub.next() => (Change::Ledger, snap?),
        };
        match change {
            Change::Users => self.users = decode::users(snapshot.as_ref())?,
            Change::Messages => self.messages = decode::messages(snapshot.as_ref())?,
            Change::Ledger => self.ledger = decode::ledger(snapshot.as_ref())?,
        }
        Ok(change)
    }

    /// Ends the session, tearing down all subscriptions.
    pub fn logout(self) {
        tracing::debug!(user = %self.user.name, "session closed");
    }

    async fn commit_ledger(&self) -> ResultSync<()> {
        self.store
            .set(
                &paths::ledger(&self.user.id),
                serde_json::to_value(&self.ledger)?,
            )
            .await?;
        Ok(())
    }

    // --- ledger operations -------------------------------------------------

    pub async fn set_salary(&mut self, salary: Money) -> ResultSync<()> {
        self.ledger.set_salary(salary)?;
        self.commit_ledger().await
    }

    pub async fn set_theme(&mut self, theme: Theme) -> ResultSync<()> {
        self.ledger.set_theme(theme);
        self.commit_ledger().await
    }

    /// Records a new expense, returning its id.
    pub async fn add_expense(
        &mut self,
        name: &str,
        category: &str,
        value: Money,
        due_date: NaiveDate,
    ) -> ResultSync<String> {
        let expense = Expense::new(name, category, value, due_date, &self.user.id)?;
        let id = expense.id.clone();
        self.ledger.add_expense(expense);
        self.commit_ledger().await?;
        Ok(id)
    }

    /// Toggles an expense's paid flag. Missing id is a soft no-op.
    pub async fn toggle_expense_paid(&mut self, id: &str) -> ResultSync<bool> {
        if !self.ledger.toggle_expense_paid(id) {
            return Ok(false);
        }
        self.commit_ledger().await?;
        Ok(true)
    }

    pub async fn delete_expense(&mut self, id: &str) -> ResultSync<bool> {
        if !self.ledger.delete_expense(id) {
            return Ok(false);
        }
        self.commit_ledger().await?;
        Ok(true)
    }

    /// Creates a new commitment, returning its id.
    pub async fn add_commitment(
        &mut self,
        kind: &str,
        total: Money,
        installments_count: u32,
        duration: &str,
        due_date: NaiveDate,
    ) -> ResultSync<String> {
        let commitment = Commitment::new(
            kind,
            total,
            installments_count,
            duration,
            due_date,
            &self.user.id,
        )?;
        let id = commitment.id.clone();
        self.ledger.add_commitment(commitment);
        self.commit_ledger().await?;
        Ok(id)
    }

    /// Pays one installment. `false` means the commitment is missing or
    /// already completed; nothing was written.
    pub async fn pay_installment(&mut self, id: &str) -> ResultSync<bool> {
        if !self.ledger.pay_installment(id) {
            return Ok(false);
        }
        self.commit_ledger().await?;
        Ok(true)
    }

    pub async fn delete_commitment(&mut self, id: &str) -> ResultSync<bool> {
        if !self.ledger.delete_commitment(id) {
            return Ok(false);
        }
        self.commit_ledger().await?;
        Ok(true)
    }

    /// Archives the current month into history and clears the active list.
    ///
    /// Both effects land in one ledger-document write, so other sessions
    /// observe either the old state or the fully archived one, never a
    /// half-applied transition. Returns the new record's id.
    pub async fn archive_month(&mut self, now: DateTime<Utc>) -> ResultSync<String> {
        let id = self.ledger.archive_month(&self.user.id, now).id.clone();
        self.commit_ledger().await?;
        Ok(id)
    }

    /// Replaces the whole ledger document, e.g. when seeding the remote
    /// store from the local fallback blob on first run.
    pub async fn restore_ledger(&mut self, ledger: Ledger) -> ResultSync<()> {
        self.ledger = ledger;
        self.commit_ledger().await
    }

    // --- messaging ---------------------------------------------------------

    /// Sends a broadcast or direct message, returning the store key.
    pub async fn send_message(
        &mut self,
        recipient: Recipient,
        text: &str,
        now: DateTime<Utc>,
    ) -> ResultSync<String> {
        let mut message =
            ChatMessage::new(&self.user.id, &self.user.name, recipient, text, now)?;
        let key = self.store.generate_key(paths::MESSAGES);
        message.id = key.key;
        message.order = key.order;

        self.messages.push(message.clone());
        self.store
            .set(&paths::message(&message.id), serde_json::to_value(&message)?)
            .await?;
        Ok(message.id)
    }

    /// Deletes a message. Only the sender may delete; a foreign message or
    /// an id already gone is a soft no-op.
    pub async fn delete_message(&mut self, id: &str) -> ResultSync<bool> {
        match self.messages.iter().find(|m| m.id == id) {
            None => Ok(false),
            Some(message) if !message.deletable_by(&self.user.id) => {
                tracing::warn!(id, "refusing to delete another sender's message");
                Ok(false)
            }
            Some(_) => {
                self.messages.retain(|m| m.id != id);
                self.store.remove(&paths::message(id)).await?;
                Ok(true)
            }
        }
    }

    // --- account management ------------------------------------------------

    /// Changes the current user's credential; the only user mutation there
    /// is. Written as a partial update so concurrent admin edits to other
    /// fields survive. Returns `false` without writing when the account has
    /// already been deleted by an administrator.
    pub async fn change_password(&mut self, new_password: &str) -> ResultSync<bool> {
        let trimmed = new_password.trim();
        if trimmed.is_empty() {
            return Err(engine::EngineError::Validation(
                "password must not be empty".to_string(),
            )
            .into());
        }
        if !self.users.iter().any(|u| u.id == self.user.id) {
            tracing::warn!("account no longer exists, dropping password change");
            return Ok(false);
        }
        self.user.password = trimmed.to_string();
        let mut fields = Map::new();
        fields.insert("password".to_string(), Value::String(trimmed.to_string()));
        self.store
            .update(&paths::user(&self.user.id), fields)
            .await?;
        Ok(true)
    }

    /// Creates another account; administrators only.
    pub async fn create_user(
        &mut self,
        name: &str,
        password: &str,
        is_admin: bool,
    ) -> ResultSync<User> {
        if !self.user.is_admin {
            return Err(SyncError::Forbidden(
                "only administrators may create accounts".to_string(),
            ));
        }
        let user = User::new(name, password, is_admin)?;
        self.users.push(user.clone());
        self.store
            .set(&paths::user(&user.id), serde_json::to_value(&user)?)
            .await?;
        Ok(user)
    }

    /// Deletes an account; administrators only. The bootstrap admin is never
    /// deleted, and a missing id is a soft no-op.
    pub async fn delete_user(&mut self, id: &str) -> ResultSync<bool> {
        if !self.user.is_admin {
            return Err(SyncError::Forbidden(
                "only administrators may delete accounts".to_string(),
            ));
        }
        match self.users.iter().find(|u| u.id == id) {
            None => Ok(false),
            Some(user) if user.name == BOOTSTRAP_ADMIN => {
                tracing::warn!("refusing to delete the bootstrap admin account");
                Ok(false)
            }
            Some(_) => {
                self.users.retain(|u| u.id != id);
                self.store.remove(&paths::user(id)).await?;
                Ok(true)
            }
        }
    }
}
