//! Application wiring
//!
//! Connects the PostgreSQL store and the platform client and builds the
//! service context the subcommands run against.

use std::sync::Arc;

use chatlog_common::{AppConfig, AppError, AppResult};
use chatlog_db::{create_pool, PgStore, PoolConfig};
use chatlog_service::{LedgerSettings, ServiceContext, ServiceContextBuilder};
use tracing::info;

use crate::attachments::FsAttachmentStore;
use crate::handler::EventHandler;
use crate::platform::PlatformClient;

/// Everything a subcommand needs
pub struct Ledger {
    pub ctx: Arc<ServiceContext>,
    pub client: Arc<PlatformClient>,
    pub store: Arc<PgStore>,
}

impl Ledger {
    /// Event handler resolving dispatched messages through the REST client
    pub fn handler(&self) -> EventHandler {
        EventHandler::new(self.ctx.clone(), self.client.clone())
    }
}

/// Connect to PostgreSQL
pub async fn connect_store(config: &AppConfig) -> AppResult<PgStore> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");
    Ok(PgStore::new(pool))
}

/// Apply pending schema migrations
pub async fn migrate(store: &PgStore) -> AppResult<()> {
    store
        .migrate()
        .await
        .map_err(|e| AppError::Migration(e.to_string()))?;
    info!("Migrations applied");
    Ok(())
}

/// Initialize all dependencies and create the ledger
pub async fn create_ledger(config: &AppConfig) -> AppResult<Ledger> {
    let store = Arc::new(connect_store(config).await?);
    let client = Arc::new(PlatformClient::new(&config.platform)?);
    let attachments = Arc::new(FsAttachmentStore::new(
        &config.storage.attachments_dir,
        reqwest::Client::new(),
    ));

    let settings = LedgerSettings::from_config(config);
    info!(
        machine = %settings.machine,
        notices = settings.deletion_notice.is_some(),
        edit_dedup = settings.edit_dedup,
        "Ledger configured"
    );

    let ctx = ServiceContextBuilder::new()
        .store(store.clone())
        .audit(client.clone())
        .history(client.clone())
        .notifier(client.clone())
        .attachments(attachments)
        .settings(settings)
        .build()?;

    Ok(Ledger {
        ctx: Arc::new(ctx),
        client,
        store,
    })
}
