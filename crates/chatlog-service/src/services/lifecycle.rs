//! Message lifecycle tracking
//!
//! Drives a message through `unknown -> created -> [edited]* -> [deleted]`.
//! Each entry point runs in one unit of work: the surrounding entities are
//! reconciled first, then the ledger row is written, then the unit commits.
//! Side effects (attachment copies, deletion notices) are scheduled only
//! after the commit and never fail the operation.

use chatlog_core::entities::{Entity, MessageDeletion, ObservedMessage};
use chatlog_core::traits::{AttachmentTarget, UnitOfWork, WriteOutcome};
use chatlog_core::Snowflake;
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::existence::ensure_exists;
use super::notice::{render_deletion_notice, NoticeSubject};
use super::rename::RenameService;

/// Result of recording a message creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The message row was written
    Inserted,
    /// The message was already recorded
    Duplicate,
    /// A community, channel, thread or author is opted out; no content row
    Disabled,
}

/// Result of recording a message update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// An edit row was appended
    Recorded,
    /// This exact edit (message and edit time) was already recorded
    Duplicate,
    /// The content matches what is already recorded
    Unchanged,
    /// The update carried no edit timestamp (embed unfurl, pin, ...)
    NotEdited,
    /// A community, channel, thread or author is opted out
    Disabled,
}

/// Result of recording a message deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The deletion was recorded by this call
    Recorded,
    /// The deletion was already recorded
    Duplicate,
}

/// Message lifecycle service
pub struct LifecycleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LifecycleService<'a> {
    /// Create a new LifecycleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a newly created message.
    ///
    /// `historical` marks messages found by backfill or implicit creation;
    /// their attachments are not copied.
    #[instrument(skip(self, observed), fields(message_id = %observed.id))]
    pub async fn on_create(
        &self,
        observed: &ObservedMessage,
        historical: bool,
    ) -> ServiceResult<CreateOutcome> {
        let mut uow = self.ctx.store().begin().await?;
        let outcome = self.record_created(uow.as_mut(), observed, historical).await?;
        uow.commit().await?;

        if outcome == CreateOutcome::Inserted && !historical {
            self.schedule_attachments(observed);
        }
        Ok(outcome)
    }

    /// Record an edit of a message.
    ///
    /// A message not yet in the ledger is recorded first, as historical.
    #[instrument(skip(self, observed), fields(message_id = %observed.id))]
    pub async fn on_edit(&self, observed: &ObservedMessage) -> ServiceResult<EditOutcome> {
        let mut uow = self.ctx.store().begin().await?;
        let outcome = self.record_edit(uow.as_mut(), observed).await?;
        uow.commit().await?;
        Ok(outcome)
    }

    /// Record a deletion and, for qualifying messages, post a notice.
    ///
    /// A repeated deletion is swallowed and produces no second notice.
    #[instrument(skip(self))]
    pub async fn on_delete(
        &self,
        community_id: Option<Snowflake>,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<DeleteOutcome> {
        info!("Deleted message");

        let mut uow = self.ctx.store().begin().await?;
        let deletion = MessageDeletion::now(message_id, &self.ctx.settings().machine);
        let outcome = uow.insert_deletion(&deletion).await?;
        uow.commit().await?;

        if outcome == WriteOutcome::Duplicate {
            debug!("Deletion already recorded");
            return Ok(DeleteOutcome::Duplicate);
        }

        if let Err(e) = self.notify_deletion(message_id).await {
            warn!(error = %e, "Could not prepare deletion notice");
        }
        Ok(DeleteOutcome::Recorded)
    }

    /// Reconcile the message's entities and write its creation row inside
    /// an open unit of work
    pub(crate) async fn record_created(
        &self,
        uow: &mut dyn UnitOfWork,
        observed: &ObservedMessage,
        historical: bool,
    ) -> ServiceResult<CreateOutcome> {
        debug!(historical, "New message");

        if self.reconcile_origins(uow, observed).await? {
            return Ok(CreateOutcome::Disabled);
        }

        let message = observed.to_message(&self.ctx.settings().machine)?;
        match uow.insert_message(&message).await? {
            WriteOutcome::Inserted => Ok(CreateOutcome::Inserted),
            WriteOutcome::Duplicate => Ok(CreateOutcome::Duplicate),
        }
    }

    async fn record_edit(
        &self,
        uow: &mut dyn UnitOfWork,
        observed: &ObservedMessage,
    ) -> ServiceResult<EditOutcome> {
        if self.reconcile_origins(uow, observed).await? {
            return Ok(EditOutcome::Disabled);
        }

        let base = uow.find_message(observed.id).await?;
        let base_preexisted = base.is_some();
        if !base_preexisted {
            let message = observed.to_message(&self.ctx.settings().machine)?;
            uow.insert_message(&message).await?;
            info!("Edited message was not recorded; created it as historical");
        }

        let Some(edit) = observed.to_edit(&self.ctx.settings().machine) else {
            return Ok(EditOutcome::NotEdited);
        };

        if self.ctx.settings().edit_dedup {
            let fingerprint = edit.fingerprint();
            let recorded = match uow.latest_edit(observed.id).await? {
                Some(latest) => Some(latest.fingerprint()),
                // An implicitly created base row holds this very content
                None if base_preexisted => base.and_then(|m| m.fingerprint()),
                None => None,
            };
            if recorded == Some(fingerprint) {
                debug!(%fingerprint, "Edit content already recorded");
                return Ok(EditOutcome::Unchanged);
            }
        }

        match uow.insert_edit(&edit).await? {
            WriteOutcome::Inserted => {
                info!(edited_at = %edit.edited_at, "Edited message");
                Ok(EditOutcome::Recorded)
            }
            WriteOutcome::Duplicate => Ok(EditOutcome::Duplicate),
        }
    }

    /// Existence- and rename-reconcile community, channel, thread and author,
    /// in that order. Returns `true` if any of them is disabled.
    async fn reconcile_origins(
        &self,
        uow: &mut dyn UnitOfWork,
        observed: &ObservedMessage,
    ) -> ServiceResult<bool> {
        let origins = observed.origin_entities()?;
        let renames = RenameService::new(self.ctx);

        for entity in &origins {
            if !ensure_exists(uow, entity).await? {
                renames.reconcile_attributes(uow, entity).await?;
            }
        }

        // The opt-out flags live only in the store
        for entity in &origins {
            let persisted = uow.find_entity(entity.kind(), entity.id()).await?;
            if persisted.as_ref().is_some_and(Entity::is_disabled) {
                info!(kind = %entity.kind(), id = %entity.id(), "Origin is disabled; content not recorded");
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn schedule_attachments(&self, observed: &ObservedMessage) {
        let (Some(community), Some(posted_in)) = (&observed.community, observed.posted_in()) else {
            return;
        };

        for (position, url) in observed.attachments.iter().enumerate() {
            let target = AttachmentTarget {
                community_id: community.id,
                channel_id: posted_in,
                message_id: observed.id,
                position,
                url: url.clone(),
            };
            let store = self.ctx.attachments();
            self.ctx
                .background()
                .spawn_detached("attachment", async move { store.store(&target).await });
        }
    }

    /// Resolve what the notice needs and post it in the background
    async fn notify_deletion(&self, message_id: Snowflake) -> ServiceResult<()> {
        let Some(notice) = self.ctx.settings().deletion_notice.clone() else {
            return Ok(());
        };

        let mut uow = self.ctx.store().begin().await?;
        let Some(message) = uow.find_message(message_id).await? else {
            debug!("Deleted message was never recorded");
            return Ok(());
        };
        if message.community_id != notice.community_id {
            return Ok(());
        }

        let Some(author) = uow.find_user(message.author_id).await? else {
            return Ok(());
        };
        if author.is_bot() {
            return Ok(());
        }
        let Some(community) = uow.find_community(message.community_id).await? else {
            return Ok(());
        };
        let Some(channel) = uow.find_channel(message.channel_id).await? else {
            return Ok(());
        };
        let thread = match message.thread_id {
            Some(thread_id) => uow.find_thread(thread_id).await?,
            None => None,
        };
        drop(uow);

        let content = render_deletion_notice(
            &NoticeSubject {
                message,
                author,
                community,
                channel,
                thread,
            },
            notice.utc_offset,
        );

        let notifier = self.ctx.notifier();
        self.ctx.background().spawn_detached("deletion-notice", async move {
            notifier.send_text(notice.channel_id, &content).await
        });
        Ok(())
    }
}
