//! Gateway events
//!
//! Dispatch frames as read from the ingest stream, and their decoding into
//! the events the ledger acts on.

mod decode;
mod event_types;
mod payloads;

pub use decode::{decode, decode_frame, InboundEvent};
pub use event_types::GatewayEventType;
pub use payloads::{DispatchFrame, MessageDeleteEvent, MessageUpdateEvent, OP_DISPATCH};
