//! Integration test utilities for the chat ledger
//!
//! This crate provides an in-memory store, a scripted platform and fixtures
//! for running the ledger services end to end without a database or network.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
pub use platform::FakePlatform;
pub use store::{InMemoryStore, Ledger};
