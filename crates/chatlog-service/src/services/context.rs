//! Service context - dependency container for services
//!
//! Holds the store, the platform ports, the background executor and the
//! ledger settings. Cloning is cheap; every port sits behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use chatlog_common::AppConfig;
use chatlog_core::traits::{AttachmentStore, AuditTrail, MessageHistory, Notifier, Store};
use chatlog_core::Snowflake;
use chrono::{FixedOffset, Offset, Utc};

use super::background::BackgroundTasks;
use super::error::{ServiceError, ServiceResult};

/// Where deletion notices go and how their timestamps are rendered
#[derive(Debug, Clone)]
pub struct DeletionNotice {
    /// Only deletions in this community produce a notice
    pub community_id: Snowflake,
    /// Channel the notice is posted to
    pub channel_id: Snowflake,
    pub utc_offset: FixedOffset,
}

/// Backfill pacing
#[derive(Debug, Clone)]
pub struct BackfillSettings {
    pub page_size: u8,
    pub page_delay: Duration,
}

/// Behavior switches for the ledger services
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    /// Origin hostname written to every ledger row
    pub machine: String,
    /// Audit entries scanned per rename
    pub audit_lookback: u8,
    /// Skip edits whose content fingerprint is already recorded
    pub edit_dedup: bool,
    pub backfill: BackfillSettings,
    pub deletion_notice: Option<DeletionNotice>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            machine: "localhost".to_string(),
            audit_lookback: 5,
            edit_dedup: true,
            backfill: BackfillSettings {
                page_size: 100,
                page_delay: Duration::from_millis(2000),
            },
            deletion_notice: None,
        }
    }
}

impl LedgerSettings {
    /// Build settings from the application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let deletion_notice = match (config.notify.community_id, config.notify.channel_id) {
            (Some(community_id), Some(channel_id)) => Some(DeletionNotice {
                community_id,
                channel_id,
                utc_offset: FixedOffset::east_opt(config.notify.utc_offset_minutes * 60)
                    .unwrap_or_else(|| Utc.fix()),
            }),
            _ => None,
        };

        Self {
            machine: config.ledger.origin_host.clone(),
            audit_lookback: config.ledger.audit_lookback,
            edit_dedup: config.ledger.edit_dedup,
            backfill: BackfillSettings {
                page_size: config.backfill.page_size,
                page_delay: config.backfill.page_delay(),
            },
            deletion_notice,
        }
    }
}

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services.
/// It provides access to:
/// - The ledger store (one unit of work per operation)
/// - The platform audit trail, message history and notification sink
/// - The attachment store
/// - The background executor for fire-and-forget work
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn Store>,
    audit: Arc<dyn AuditTrail>,
    history: Arc<dyn MessageHistory>,
    notifier: Arc<dyn Notifier>,
    attachments: Arc<dyn AttachmentStore>,
    background: BackgroundTasks,
    settings: LedgerSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        store: Arc<dyn Store>,
        audit: Arc<dyn AuditTrail>,
        history: Arc<dyn MessageHistory>,
        notifier: Arc<dyn Notifier>,
        attachments: Arc<dyn AttachmentStore>,
        settings: LedgerSettings,
    ) -> Self {
        Self {
            store,
            audit,
            history,
            notifier,
            attachments,
            background: BackgroundTasks::new(),
            settings,
        }
    }

    /// Get the ledger store
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Get the audit trail
    pub fn audit(&self) -> &dyn AuditTrail {
        self.audit.as_ref()
    }

    /// Get the message history
    pub fn history(&self) -> &dyn MessageHistory {
        self.history.as_ref()
    }

    /// Get the notifier; shared so detached tasks can own a handle
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    /// Get the attachment store; shared so detached tasks can own a handle
    pub fn attachments(&self) -> Arc<dyn AttachmentStore> {
        self.attachments.clone()
    }

    /// Get the background executor
    pub fn background(&self) -> &BackgroundTasks {
        &self.background
    }

    /// Get the ledger settings
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("ports", &"...")
            .field("background", &self.background)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn Store>>,
    audit: Option<Arc<dyn AuditTrail>>,
    history: Option<Arc<dyn MessageHistory>>,
    notifier: Option<Arc<dyn Notifier>>,
    attachments: Option<Arc<dyn AttachmentStore>>,
    settings: Option<LedgerSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn audit(mut self, audit: Arc<dyn AuditTrail>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn history(mut self, history: Arc<dyn MessageHistory>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn attachments(mut self, attachments: Arc<dyn AttachmentStore>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn settings(mut self, settings: LedgerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store.ok_or_else(|| ServiceError::validation("store is required"))?,
            self.audit.ok_or_else(|| ServiceError::validation("audit is required"))?,
            self.history.ok_or_else(|| ServiceError::validation("history is required"))?,
            self.notifier.ok_or_else(|| ServiceError::validation("notifier is required"))?,
            self.attachments.ok_or_else(|| ServiceError::validation("attachments is required"))?,
            self.settings.unwrap_or_default(),
        ))
    }
}
