//! PostgreSQL implementation of NameChangeRepository

use async_trait::async_trait;
use tracing::instrument;

use chatlog_core::entities::NameChange;
use chatlog_core::traits::{NameChangeRepository, RepoResult};
use chatlog_core::value_objects::Snowflake;

use crate::models::NameChangeModel;

use super::error::map_db_error;
use super::store::PgUnitOfWork;

#[async_trait]
impl NameChangeRepository for PgUnitOfWork {
    #[instrument(skip(self, change), fields(subject_id = %change.subject_id, kind = %change.kind))]
    async fn append_name_change(&mut self, change: &NameChange) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO "name-changes"
                (subject_id, kind, old_value, new_value, actor_id, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(change.subject_id.into_inner())
        .bind(change.kind.as_str())
        .bind(change.old_value.as_deref())
        .bind(change.new_value.as_deref())
        .bind(change.actor_id.map(Snowflake::into_inner))
        .bind(change.changed_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn name_changes_for(&mut self, subject_id: Snowflake) -> RepoResult<Vec<NameChange>> {
        let results = sqlx::query_as::<_, NameChangeModel>(
            r#"
            SELECT id, subject_id, kind, old_value, new_value, actor_id, changed_at, recorded_at
            FROM "name-changes"
            WHERE subject_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(subject_id.into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(NameChange::try_from).collect()
    }
}
