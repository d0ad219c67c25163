//! # chatlog-service
//!
//! Application layer: entity reconciliation, the message lifecycle ledger,
//! historical backfill and the content fix pass.

pub mod services;

pub use services::{
    BackfillReport, BackfillService, CreateOutcome, DeleteOutcome, EditOutcome, LedgerSettings,
    LifecycleService, RenameService, RepairReport, RepairService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
