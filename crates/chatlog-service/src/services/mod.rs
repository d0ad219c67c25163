//! Ledger services
//!
//! This module contains the reconcilers, the message lifecycle tracker, the
//! backfill driver and the content fix pass, all written against the ports
//! in `chatlog-core`.

pub mod backfill;
pub mod background;
pub mod context;
pub mod error;
pub mod existence;
pub mod lifecycle;
pub mod notice;
pub mod rename;
pub mod repair;

// Re-export all services for convenience
pub use backfill::{BackfillReport, BackfillService};
pub use background::BackgroundTasks;
pub use context::{
    BackfillSettings, DeletionNotice, LedgerSettings, ServiceContext, ServiceContextBuilder,
};
pub use error::{ServiceError, ServiceResult};
pub use existence::ensure_exists;
pub use lifecycle::{CreateOutcome, DeleteOutcome, EditOutcome, LifecycleService};
pub use notice::{render_deletion_notice, NoticeSubject};
pub use rename::RenameService;
pub use repair::{RepairReport, RepairService};
