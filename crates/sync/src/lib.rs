//! Remote sync mediator.
//!
//! Keeps each client's in-memory copy of the users, messages, and ledger
//! documents eventually consistent with the shared document store, under the
//! consistency contract the tracker relies on: optimistic local mutation,
//! listener-driven refresh, last write wins.

pub use client::Client;
pub use error::{ResultSync, SyncError};
pub use local::{LocalState, default_state_path};
pub use session::{Change, Session};

mod client;
mod decode;
mod error;
mod local;
pub mod paths;
mod session;
