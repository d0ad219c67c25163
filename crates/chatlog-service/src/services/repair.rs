//! Content fix pass
//!
//! Rows recorded before raw text was captured get their raw and display text
//! filled in from the live message. A row is left alone when its latest edit
//! already carries the live content, since the base row must keep the text
//! as first posted.

use chatlog_core::entities::Message;
use chatlog_core::Snowflake;
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Totals of one content fix pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Rows whose content was filled in
    pub filled: usize,
    /// Rows whose live content is already recorded as an edit
    pub skipped: usize,
    /// Rows whose message is gone or unreadable
    pub missing: usize,
}

impl std::ops::AddAssign for RepairReport {
    fn add_assign(&mut self, rhs: Self) {
        self.filled += rhs.filled;
        self.skipped += rhs.skipped;
        self.missing += rhs.missing;
    }
}

/// Content repair service
pub struct RepairService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RepairService<'a> {
    /// Create a new RepairService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Repair every readable text channel, one after another
    pub async fn repair_all(&self) -> ServiceResult<RepairReport> {
        let mut total = RepairReport::default();
        for channel in self.ctx.history().text_channels().await? {
            total += self.repair_channel(channel.id).await?;
        }
        Ok(total)
    }

    /// Repair the rows of one channel (including its threads)
    #[instrument(skip(self))]
    pub async fn repair_channel(&self, channel_id: Snowflake) -> ServiceResult<RepairReport> {
        let candidates = {
            let mut uow = self.ctx.store().begin().await?;
            let rows = uow.messages_missing_raw(channel_id).await?;
            uow.commit().await?;
            rows
        };

        let mut report = RepairReport::default();
        for message in &candidates {
            self.repair_message(message, &mut report).await?;
        }

        info!(
            candidates = candidates.len(),
            filled = report.filled,
            skipped = report.skipped,
            missing = report.missing,
            "Content fix finished"
        );
        Ok(report)
    }

    async fn repair_message(
        &self,
        message: &Message,
        report: &mut RepairReport,
    ) -> ServiceResult<()> {
        let live = match self
            .ctx
            .history()
            .fetch_message(message.posted_in(), message.id)
            .await
        {
            Ok(Some(live)) => live,
            Ok(None) => {
                report.missing += 1;
                return Ok(());
            }
            Err(e) if e.is_forbidden() || e.is_not_found() => {
                report.missing += 1;
                return Ok(());
            }
            Err(e) => return Err(ServiceError::from(e)),
        };

        let mut uow = self.ctx.store().begin().await?;
        if let Some(latest) = uow.latest_edit(message.id).await? {
            if latest.fingerprint() == live.fingerprint() {
                debug!(message_id = %message.id, "Live content already recorded as an edit");
                report.skipped += 1;
                return Ok(());
            }
        }

        let changed = uow
            .fill_content(message.id, &live.display_text, &live.raw_text)
            .await?;
        uow.commit().await?;
        if changed > 0 {
            report.filled += 1;
        }
        Ok(())
    }
}
