//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chatlog-core.
//! Every repository trait is implemented on [`PgUnitOfWork`], so all writes of
//! one event share a transaction.

mod entity;
mod error;
mod message;
mod name_change;
mod store;

pub use store::{PgStore, PgUnitOfWork};
