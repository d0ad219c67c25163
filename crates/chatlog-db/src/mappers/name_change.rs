//! Name change entity <-> model mapper

use chatlog_core::entities::{ChangeKind, NameChange};
use chatlog_core::error::DomainError;
use chatlog_core::value_objects::Snowflake;

use crate::models::NameChangeModel;

/// Convert NameChangeModel to NameChange entity; unknown kind tags are corrupt rows
impl TryFrom<NameChangeModel> for NameChange {
    type Error = DomainError;

    fn try_from(model: NameChangeModel) -> Result<Self, Self::Error> {
        let kind = ChangeKind::from_str(&model.kind).ok_or_else(|| DomainError::CorruptRow {
            table: "name-changes",
            reason: format!("unknown kind {:?} in row {}", model.kind, model.id),
        })?;

        Ok(NameChange {
            subject_id: Snowflake::new(model.subject_id),
            kind,
            old_value: model.old_value,
            new_value: model.new_value,
            actor_id: model.actor_id.map(Snowflake::new),
            changed_at: model.changed_at,
        })
    }
}
