//! Decoding dispatch frames into ledger events

use chatlog_core::error::PlatformError;
use chatlog_core::Snowflake;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::event_types::GatewayEventType;
use super::payloads::{DispatchFrame, MessageDeleteEvent, MessageUpdateEvent, OP_DISPATCH};
use crate::platform::models::MessagePayload;

/// A dispatch the ledger acts on
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A message was posted in a community
    MessageCreated(Box<MessagePayload>),
    /// A message in a community was edited; content must be refetched
    MessageUpdated {
        community_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    /// A message was deleted, in a community or not
    MessageDeleted {
        community_id: Option<Snowflake>,
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    /// Anything else; the reason is kept for debug logs
    Ignored(&'static str),
}

fn payload<T: DeserializeOwned>(
    event: GatewayEventType,
    data: Option<Value>,
) -> Result<T, PlatformError> {
    let data = data.ok_or_else(|| PlatformError::Decode(format!("{event} without payload")))?;
    serde_json::from_value(data).map_err(|e| PlatformError::Decode(format!("{event}: {e}")))
}

/// Decode one line of the ingest stream.
///
/// # Errors
/// Returns [`PlatformError::Decode`] for malformed JSON or a payload that
/// does not match its event type.
pub fn decode_frame(line: &str) -> Result<InboundEvent, PlatformError> {
    let frame: DispatchFrame =
        serde_json::from_str(line).map_err(|e| PlatformError::Decode(e.to_string()))?;
    decode(frame)
}

/// Decode a parsed frame
///
/// # Errors
/// See [`decode_frame`].
pub fn decode(frame: DispatchFrame) -> Result<InboundEvent, PlatformError> {
    if frame.op != OP_DISPATCH {
        return Ok(InboundEvent::Ignored("not a dispatch"));
    }
    let Some(event) = frame.t.as_deref().and_then(GatewayEventType::from_str) else {
        return Ok(InboundEvent::Ignored("unhandled event type"));
    };

    match event {
        GatewayEventType::MessageCreate => {
            let message: MessagePayload = payload(event, frame.d)?;
            if message.guild_id.is_none() {
                return Ok(InboundEvent::Ignored("direct message"));
            }
            Ok(InboundEvent::MessageCreated(Box::new(message)))
        }
        GatewayEventType::MessageUpdate => {
            let update: MessageUpdateEvent = payload(event, frame.d)?;
            Ok(match update.guild_id {
                Some(community_id) => InboundEvent::MessageUpdated {
                    community_id,
                    channel_id: update.channel_id,
                    message_id: update.id,
                },
                None => InboundEvent::Ignored("direct message"),
            })
        }
        GatewayEventType::MessageDelete => {
            let delete: MessageDeleteEvent = payload(event, frame.d)?;
            Ok(InboundEvent::MessageDeleted {
                community_id: delete.guild_id,
                channel_id: delete.channel_id,
                message_id: delete.id,
            })
        }
    }
}
