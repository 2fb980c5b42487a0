//! Snapshot decoding.
//!
//! Remote snapshots arrive as raw JSON values; these helpers turn them into
//! typed collections. An absent snapshot (`None`) decodes to the empty state
//! of the path, never an error: a fresh store simply has no documents yet.

use std::collections::HashMap;

use engine::{ChatMessage, Ledger, User};
use serde_json::Value;

use crate::ResultSync;

/// Decodes each entry of a collection snapshot independently.
///
/// A single malformed document (a half-written racing update, a tampered
/// value) is skipped with a warning; it must never take the whole
/// collection, and with it every listener, down.
fn entries<T: serde::de::DeserializeOwned>(
    snapshot: Option<&Value>,
    path: &str,
) -> ResultSync<Vec<(String, T)>> {
    let Some(value) = snapshot else {
        return Ok(Vec::new());
    };
    let map: HashMap<String, Value> = serde_json::from_value(value.clone())?;
    let mut decoded = Vec::with_capacity(map.len());
    for (key, entry) in map {
        match serde_json::from_value(entry) {
            Ok(item) => decoded.push((key, item)),
            Err(err) => tracing::warn!(path, %key, %err, "skipping malformed document"),
        }
    }
    Ok(decoded)
}

pub(crate) fn users(snapshot: Option<&Value>) -> ResultSync<Vec<User>> {
    let mut users: Vec<User> = entries(snapshot, crate::paths::USERS)?
        .into_iter()
        .map(|(_, user)| user)
        .collect();
    users.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(users)
}

pub(crate) fn messages(snapshot: Option<&Value>) -> ResultSync<Vec<ChatMessage>> {
    let mut messages: Vec<ChatMessage> = entries(snapshot, crate::paths::MESSAGES)?
        .into_iter()
        .map(|(key, mut message): (String, ChatMessage)| {
            // The store key is authoritative for identity.
            message.id = key;
            message
        })
        .collect();
    messages.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    Ok(messages)
}

pub(crate) fn ledger(snapshot: Option<&Value>) -> ResultSync<Ledger> {
    match snapshot {
        None => Ok(Ledger::default()),
        Some(value) => Ok(serde_json::from_value(value.clone())?),
    }
}
