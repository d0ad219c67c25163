//! Ports - the store and platform interfaces the services depend on

mod platform;
mod repositories;

pub use platform::{
    AttachmentStore, AttachmentTarget, AuditAction, AuditEntry, AuditTrail, MessageHistory,
    Notifier, PlatformResult,
};
pub use repositories::{
    EntityRepository, MessageRepository, NameChangeRepository, RepoResult, Store, UnitOfWork,
    WriteOutcome,
};
