//! Test helpers for the ledger tests
//!
//! Wires the ledger services to the in-memory store and the scripted
//! platform, with backfill pacing switched off.

use std::sync::Arc;
use std::time::Duration;

use chatlog_core::entities::{Entity, EntityKind};
use chatlog_core::traits::AuditEntry;
use chatlog_core::{Snowflake, User};
use chatlog_service::services::{BackfillSettings, DeletionNotice};
use chatlog_service::{
    BackfillService, LedgerSettings, LifecycleService, RepairService, ServiceContext,
    ServiceContextBuilder,
};
use chrono::{DateTime, Offset, Utc};

use crate::platform::FakePlatform;
use crate::store::InMemoryStore;

/// Channel deletion notices are posted to
pub const NOTICE_CHANNEL: Snowflake = Snowflake::new(999);

/// Services over an in-memory store and a scripted platform
pub struct TestLedger {
    pub store: InMemoryStore,
    pub platform: Arc<FakePlatform>,
    pub ctx: ServiceContext,
}

impl TestLedger {
    /// Default settings, notices off
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    /// Notices on for deletions in `community_id`
    pub fn with_notices(community_id: Snowflake) -> Self {
        let mut settings = test_settings();
        settings.deletion_notice = Some(DeletionNotice {
            community_id,
            channel_id: NOTICE_CHANNEL,
            utc_offset: Utc.fix(),
        });
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: LedgerSettings) -> Self {
        let store = InMemoryStore::new();
        let platform = Arc::new(FakePlatform::new());
        let ctx = ServiceContextBuilder::new()
            .store(Arc::new(store.clone()))
            .audit(platform.clone())
            .history(platform.clone())
            .notifier(platform.clone())
            .attachments(platform.clone())
            .settings(settings)
            .build()
            .unwrap_or_else(|e| panic!("test context: {e}"));
        Self {
            store,
            platform,
            ctx,
        }
    }

    pub fn lifecycle(&self) -> LifecycleService<'_> {
        LifecycleService::new(&self.ctx)
    }

    pub fn backfill(&self) -> BackfillService<'_> {
        BackfillService::new(&self.ctx)
    }

    pub fn repair(&self) -> RepairService<'_> {
        RepairService::new(&self.ctx)
    }

    /// Wait for detached notices and attachment copies
    pub async fn settle(&self) {
        self.ctx.background().drain().await;
    }

    /// Persisted row of a community, channel, thread or user
    pub fn row(&self, kind: EntityKind, id: Snowflake) -> Option<Entity> {
        self.store.entity(kind, id)
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings used by every test: a fixed machine name and no page delay
pub fn test_settings() -> LedgerSettings {
    LedgerSettings {
        machine: "test-host".to_string(),
        backfill: BackfillSettings {
            page_size: 100,
            page_delay: Duration::ZERO,
        },
        ..LedgerSettings::default()
    }
}

/// An audit entry recording a rename by `actor`
pub fn rename_entry(actor: &User, at: DateTime<Utc>) -> AuditEntry {
    AuditEntry {
        actor: Some(actor.clone()),
        created_at: at,
        changed_keys: vec!["name".to_string()],
    }
}
