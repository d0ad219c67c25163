//! Dispatch handling
//!
//! Routes decoded events to the lifecycle service. Each event is handled on
//! its own; a failure is returned to the caller and affects nothing else.

use std::sync::Arc;

use chatlog_service::{LifecycleService, ServiceContext, ServiceResult};
use tracing::{debug, instrument};

use crate::events::InboundEvent;
use crate::platform::MessageResolver;

/// Applies inbound events to the ledger
#[derive(Clone)]
pub struct EventHandler {
    ctx: Arc<ServiceContext>,
    resolver: Arc<dyn MessageResolver>,
}

impl EventHandler {
    pub fn new(ctx: Arc<ServiceContext>, resolver: Arc<dyn MessageResolver>) -> Self {
        Self { ctx, resolver }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Handle one event
    #[instrument(skip_all)]
    pub async fn handle(&self, event: InboundEvent) -> ServiceResult<()> {
        let lifecycle = LifecycleService::new(&self.ctx);

        match event {
            InboundEvent::MessageCreated(payload) => {
                let observed = self.resolver.resolve(&payload).await?;
                let outcome = lifecycle.on_create(&observed, false).await?;
                debug!(message_id = %observed.id, ?outcome, "Handled MESSAGE_CREATE");
            }
            InboundEvent::MessageUpdated {
                channel_id,
                message_id,
                ..
            } => {
                // The update only carries changed fields; reread the message
                let Some(observed) = self
                    .ctx
                    .history()
                    .fetch_message(channel_id, message_id)
                    .await?
                else {
                    debug!(%message_id, "Edited message is gone");
                    return Ok(());
                };
                let outcome = lifecycle.on_edit(&observed).await?;
                debug!(%message_id, ?outcome, "Handled MESSAGE_UPDATE");
            }
            InboundEvent::MessageDeleted {
                community_id,
                channel_id,
                message_id,
            } => {
                let outcome = lifecycle
                    .on_delete(community_id, channel_id, message_id)
                    .await?;
                debug!(%message_id, ?outcome, "Handled MESSAGE_DELETE");
            }
            InboundEvent::Ignored(reason) => debug!(reason, "Ignored frame"),
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandler")
            .field("ctx", &self.ctx)
            .finish()
    }
}
