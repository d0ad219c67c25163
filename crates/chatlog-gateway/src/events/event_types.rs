//! Dispatch event types
//!
//! Names of the dispatch events the ledger consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch event types
///
/// These are the event names sent in the `t` field of dispatch frames.
/// Anything else the platform sends is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    /// New message
    MessageCreate,
    /// Message edited; carries a partial message
    MessageUpdate,
    /// Message deleted; carries only ids
    MessageDelete,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageUpdate => "MESSAGE_UPDATE",
            Self::MessageDelete => "MESSAGE_DELETE",
        }
    }

    /// Parse an event type from a string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "MESSAGE_CREATE" => Some(Self::MessageCreate),
            "MESSAGE_UPDATE" => Some(Self::MessageUpdate),
            "MESSAGE_DELETE" => Some(Self::MessageDelete),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
