//! Chat platform adapter
//!
//! Payload models, the REST client implementing the platform ports, and
//! resolution of dispatched messages into observed messages.

mod client;
pub mod models;
mod resolve;

pub use client::PlatformClient;
pub use resolve::{observe, to_user, MessageOrigin, MessageResolver};
