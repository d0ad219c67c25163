//! Rename reconciliation
//!
//! Compares the tracked attributes of a persisted entity with what the
//! platform shows now. Each divergent attribute is updated in place and gets
//! one `NameChange` row, attributed through the community audit trail when
//! the kind has an audit event.

use chatlog_core::entities::{Entity, NameChange};
use chatlog_core::traits::UnitOfWork;
use chatlog_core::Snowflake;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::existence::ensure_exists;

/// Responsible actor and the time the audit trail gives for the change
type Attribution = Option<(Snowflake, DateTime<Utc>)>;

/// Rename reconciler
pub struct RenameService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RenameService<'a> {
    /// Create a new RenameService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Bring the persisted attributes of `observed` up to date.
    ///
    /// Returns the change-log rows appended; empty when the entity is not
    /// persisted or nothing differs.
    #[instrument(skip(self, uow, observed), fields(kind = %observed.kind(), id = %observed.id()))]
    pub async fn reconcile_attributes(
        &self,
        uow: &mut dyn UnitOfWork,
        observed: &Entity,
    ) -> ServiceResult<Vec<NameChange>> {
        let kind = observed.kind();
        let Some(persisted) = uow.find_entity(kind, observed.id()).await? else {
            return Ok(Vec::new());
        };

        let mut attribution: Option<Attribution> = None;
        let mut changes = Vec::new();

        for &attribute in kind.tracked_attributes() {
            let old_value = persisted.attribute(attribute);
            let new_value = observed.attribute(attribute);
            if old_value == new_value {
                continue;
            }

            let updated = uow
                .update_attribute(kind, observed.id(), attribute, new_value)
                .await?;
            if updated == 0 {
                info!(%attribute, "Rename already applied");
                continue;
            }

            // One audit lookup per entity, however many attributes changed
            let found = match attribution {
                Some(found) => found,
                None => {
                    let found = self.find_attribution(uow, observed).await?;
                    attribution = Some(found);
                    found
                }
            };

            let mut change = NameChange::unattributed(
                observed.id(),
                attribute,
                old_value.map(str::to_string),
                new_value.map(str::to_string),
            );
            if let Some((actor_id, changed_at)) = found {
                change = change.attributed_to(actor_id, changed_at);
            }

            uow.append_name_change(&change).await?;
            info!(
                %attribute,
                old = ?change.old_value,
                new = ?change.new_value,
                actor = ?change.actor_id,
                "{} renamed",
                kind
            );
            changes.push(change);
        }

        Ok(changes)
    }

    /// Find who made the rename.
    ///
    /// Scans the most recent audit entries of the kind's update event and
    /// takes the first one whose change set includes `name`. The actor is
    /// existence-reconciled before being returned. Audit failures degrade to
    /// no attribution.
    async fn find_attribution(
        &self,
        uow: &mut dyn UnitOfWork,
        observed: &Entity,
    ) -> ServiceResult<Attribution> {
        let (Some(action), Some(community_id)) =
            (observed.kind().audit_action(), observed.community_id())
        else {
            return Ok(None);
        };

        let entries = match self
            .ctx
            .audit()
            .recent_entries(community_id, action, self.ctx.settings().audit_lookback)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, community_id = %community_id, "Audit lookup failed; rename left unattributed");
                return Ok(None);
            }
        };

        let Some(entry) = entries.into_iter().find(|entry| entry.changes("name")) else {
            return Ok(None);
        };
        let Some(actor) = entry.actor else {
            return Ok(None);
        };

        let actor_id = actor.id;
        ensure_exists(uow, &Entity::User(actor)).await?;
        Ok(Some((actor_id, entry.created_at)))
    }
}
