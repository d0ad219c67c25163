//! Dispatch frame and event payload definitions

use chatlog_core::Snowflake;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dispatch opcode; frames with any other opcode carry no event
pub const OP_DISPATCH: u8 = 0;

/// One gateway frame
///
/// Every line of the ingest stream is one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchFrame {
    /// Operation code
    pub op: u8,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl DispatchFrame {
    /// Create a Dispatch frame (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OP_DISPATCH,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }
}

/// MESSAGE_UPDATE event payload
///
/// Only the ids are relied on; the rest of the partial message is reread
/// from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

/// MESSAGE_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}
