//! Abstract key-value document store.
//!
//! The sync layer talks to a remote realtime database only through the
//! [`DocumentStore`] contract below: continuously-live subscriptions plus
//! set/update/push/remove writes with last-write-wins semantics. The concrete
//! backing technology stays out of the core; [`MemoryStore`] is the
//! in-process implementation used by tests and the single-process app.

pub use memory::MemoryStore;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::watch;

mod memory;

pub type ResultStore<T> = Result<T, StoreError>;

/// Store custom errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("not an object at \"{0}\"")]
    NotAnObject(String),
    #[error("store closed")]
    Closed,
}

/// Store-generated key for a pushed value.
///
/// `order` increases strictly with every allocation, store-wide, and the
/// `key` string sorts in the same order; it doubles as the server-assigned
/// ordering key of the stored entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushKey {
    pub key: String,
    pub order: u64,
}

/// A continuously-live listener on one path.
///
/// [`next`] yields the current snapshot immediately on first call and then
/// once per subsequent remote change, for the lifetime of the subscription.
/// Rapid successive writes may coalesce; the snapshot delivered is always the
/// latest, which is exactly the superseding value the consistency model
/// calls for. There is no ordering guarantee between subscriptions on
/// different paths. Dropping the subscription tears the listener down.
///
/// [`next`]: Subscription::next
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<Option<Value>>,
}

impl Subscription {
    pub(crate) fn new(mut rx: watch::Receiver<Option<Value>>) -> Self {
        // Force the first `next` to fire with the snapshot taken at
        // subscribe time.
        rx.mark_changed();
        Self { rx }
    }

    /// Waits for the next snapshot. `None` means no value exists at the path.
    pub async fn next(&mut self) -> ResultStore<Option<Value>> {
        self.rx.changed().await.map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// The most recently delivered snapshot, without waiting.
    #[must_use]
    pub fn current(&self) -> Option<Value> {
        self.rx.borrow().clone()
    }
}

/// The four-operation document store contract.
///
/// Writes are last-write-wins: no version check, no compare-and-swap. All
/// write operations are asynchronous with respect to the caller; completion
/// or any unrelated remote change resumes listeners via their subscription.
#[allow(async_fn_in_trait)]
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Registers a live listener at `path`.
    fn subscribe(&self, path: &str) -> Subscription;

    /// Allocates a unique, strictly increasing key under a collection path
    /// without writing anything yet.
    fn generate_key(&self, path: &str) -> PushKey;

    /// Writes a full value at an exact path, replacing whatever was there.
    async fn set(&self, path: &str, value: Value) -> ResultStore<()>;

    /// Merges `fields` into the object at `path`, creating it if absent.
    async fn update(&self, path: &str, fields: Map<String, Value>) -> ResultStore<()>;

    /// Appends `value` under a store-generated key within the collection at
    /// `path`; returns the assigned key.
    async fn push(&self, path: &str, value: Value) -> ResultStore<PushKey>;

    /// Deletes the value at `path`. Removing a missing path is a no-op.
    async fn remove(&self, path: &str) -> ResultStore<()>;
}
