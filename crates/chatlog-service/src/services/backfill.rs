//! Historical backfill
//!
//! Pages every readable text channel backwards from its newest message and
//! records whatever the ledger is missing. Channels run concurrently; pages
//! within a channel are sequential and separated by a fixed delay.

use chatlog_core::entities::Channel;
use chatlog_core::Snowflake;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::lifecycle::{CreateOutcome, LifecycleService};

/// Totals of one backfill run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub channels: usize,
    pub inserted: usize,
    pub failed_channels: usize,
}

/// Backfill service
pub struct BackfillService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BackfillService<'a> {
    /// Create a new BackfillService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Backfill every text channel the platform lets us read
    pub async fn backfill_all(&self) -> ServiceResult<BackfillReport> {
        info!("Starting to add old messages");
        let channels = self.ctx.history().text_channels().await?;
        let report = self.backfill_channels(&channels).await;
        info!(
            channels = report.channels,
            inserted = report.inserted,
            failed = report.failed_channels,
            "Finished adding old messages"
        );
        Ok(report)
    }

    /// Backfill the given channels concurrently.
    ///
    /// A failing channel is logged and counted; the others carry on.
    pub async fn backfill_channels(&self, channels: &[Channel]) -> BackfillReport {
        let results = join_all(channels.iter().map(|channel| self.backfill_channel(channel))).await;

        let mut report = BackfillReport {
            channels: channels.len(),
            ..BackfillReport::default()
        };
        for (channel, result) in channels.iter().zip(results) {
            match result {
                Ok(inserted) => report.inserted += inserted,
                Err(e) => {
                    error!(channel_id = %channel.id, channel = %channel.name, error = %e, "Backfill aborted for channel");
                    report.failed_channels += 1;
                }
            }
        }
        report
    }

    /// Backfill one channel; returns the number of messages inserted
    #[instrument(skip(self, channel), fields(channel_id = %channel.id, channel = %channel.name))]
    pub async fn backfill_channel(&self, channel: &Channel) -> ServiceResult<usize> {
        let settings = &self.ctx.settings().backfill;
        let lifecycle = LifecycleService::new(self.ctx);

        let mut known = {
            let mut uow = self.ctx.store().begin().await?;
            let ids = uow.message_ids_in_channel(channel.id).await?;
            uow.commit().await?;
            ids
        };
        info!(known = known.len(), "Adding old messages");

        let mut before: Option<Snowflake> = None;
        let mut inserted = 0;

        loop {
            let page = match self
                .ctx
                .history()
                .fetch_page(channel, before, settings.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) if e.is_forbidden() || e.is_not_found() => {
                    info!(error = %e, "Channel history not viewable; stopping");
                    break;
                }
                Err(e) => return Err(ServiceError::from(e)),
            };
            let Some(oldest) = page.last() else {
                break;
            };
            before = Some(oldest.id);

            let mut uow = self.ctx.store().begin().await?;
            for observed in &page {
                if known.contains(&observed.id) {
                    continue;
                }
                match lifecycle.record_created(uow.as_mut(), observed, true).await {
                    Ok(CreateOutcome::Inserted) => inserted += 1,
                    Ok(_) => {}
                    Err(e) if e.is_missing_entity() => {
                        warn!(message_id = %observed.id, error = %e, "Skipping historical message");
                    }
                    Err(e) => return Err(e),
                }
                known.insert(observed.id);
            }
            uow.commit().await?;

            tokio::time::sleep(settings.page_delay).await;
        }

        info!(inserted, "Added new messages");
        Ok(inserted)
    }
}
