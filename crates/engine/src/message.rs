//! Chat messages and the broadcast/direct partitioner.
//!
//! Messages live in a shared multi-writer collection; the store assigns each
//! one a strictly increasing `order` key at push time. The partitioner below
//! is the only read path the presentation layer uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ResultEngine, util::normalize_required};

/// Sentinel recipient value meaning "every user".
pub const BROADCAST: &str = "all";

/// Message target: the broadcast sentinel or a specific user id.
///
/// Serialized as the plain string the store holds (`"all"` or the id), so
/// the wire shape matches the document layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recipient {
    Broadcast,
    User(String),
}

impl Recipient {
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Recipient::Broadcast)
    }
}

impl From<String> for Recipient {
    fn from(value: String) -> Self {
        if value == BROADCAST {
            Recipient::Broadcast
        } else {
            Recipient::User(value)
        }
    }
}

impl From<Recipient> for String {
    fn from(value: Recipient) -> Self {
        match value {
            Recipient::Broadcast => BROADCAST.to_string(),
            Recipient::User(id) => id,
        }
    }
}

/// An immutable chat message.
///
/// `id` and `order` are assigned by the store when the message is pushed;
/// until then they hold placeholder values and the message must not be
/// considered persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient: Recipient,
    pub text: String,
    pub sent_at: String,
    #[serde(default)]
    pub order: u64,
}

impl ChatMessage {
    /// Creates a message body, rejecting blank text.
    pub fn new(
        sender_id: &str,
        sender_name: &str,
        recipient: Recipient,
        text: &str,
        sent_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: String::new(),
            sender_id: normalize_required(sender_id, "sender id")?,
            sender_name: sender_name.trim().to_string(),
            recipient,
            text: normalize_required(text, "message text")?,
            sent_at: sent_at.format("%Y-%m-%d %H:%M").to_string(),
            order: 0,
        })
    }

    /// Only the sender may delete a message.
    #[must_use]
    pub fn deletable_by(&self, viewer_id: &str) -> bool {
        self.sender_id == viewer_id
    }
}

/// Filters the global message stream into the viewer's selected conversation.
///
/// With [`Recipient::Broadcast`] selected, only broadcast messages are
/// returned. Otherwise the result is the symmetric two-party thread between
/// the viewer and the selected user. Both views are sorted by the
/// store-assigned `order`, ascending, with the unique store key breaking
/// ties.
#[must_use]
pub fn visible_messages<'a>(
    all: &'a [ChatMessage],
    viewer_id: &str,
    selected: &Recipient,
) -> Vec<&'a ChatMessage> {
    let mut visible: Vec<&ChatMessage> = match selected {
        Recipient::Broadcast => all.iter().filter(|m| m.recipient.is_broadcast()).collect(),
        Recipient::User(peer) => all
            .iter()
            .filter(|m| {
                (m.sender_id == viewer_id && m.recipient == Recipient::User(peer.clone()))
                    || (m.sender_id == *peer
                        && m.recipient == Recipient::User(viewer_id.to_string()))
            })
            .collect(),
    };
    visible.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    visible
}
