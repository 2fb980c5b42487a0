//! Remote document layout.
//!
//! - `users/{userId}`: account records, shared multi-writer space.
//! - `messages/{messageId}`: chat messages under store-generated keys.
//! - `data/{userId}`: one user's whole ledger document.

pub const USERS: &str = "users";
pub const MESSAGES: &str = "messages";

#[must_use]
pub fn user(user_id: &str) -> String {
    format!("{USERS}/{user_id}")
}

#[must_use]
pub fn message(key: &str) -> String {
    format!("{MESSAGES}/{key}")
}

#[must_use]
pub fn ledger(user_id: &str) -> String {
    format!("data/{user_id}")
}
