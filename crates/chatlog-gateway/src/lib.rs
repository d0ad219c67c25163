//! # chatlog-gateway
//!
//! Boundary of the chat ledger: decodes dispatch frames, talks to the chat
//! platform over REST, stores attachment copies, and wires it all up for the
//! `chatlog` binary.

pub mod app;
pub mod attachments;
pub mod events;
pub mod handler;
pub mod ingest;
pub mod platform;

pub use app::{create_ledger, Ledger};
pub use handler::EventHandler;
pub use ingest::{run_ingest, IngestReport, MAX_IN_FLIGHT_EVENTS};
