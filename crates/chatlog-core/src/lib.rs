//! # chatlog-core
//!
//! Domain layer for the chat ledger: the five mirrored entity kinds, the
//! append-only message and rename ledgers, and the ports (store and platform)
//! the reconciliation services are written against.
//! This crate has zero dependencies on infrastructure (database, HTTP client, etc.).

pub mod content;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChangeKind, Channel, Community, Entity, EntityKind, Message, MessageDeletion, MessageEdit,
    NameChange, ObservedMessage, Thread, User,
};
pub use error::{DomainError, PlatformError};
pub use traits::{
    AttachmentStore, AttachmentTarget, AuditAction, AuditEntry, AuditTrail, EntityRepository,
    MessageHistory, MessageRepository, NameChangeRepository, Notifier, PlatformResult,
    RepoResult, Store, UnitOfWork, WriteOutcome,
};
pub use value_objects::{ContentFingerprint, Snowflake, SnowflakeParseError};
