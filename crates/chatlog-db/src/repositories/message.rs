//! PostgreSQL implementation of MessageRepository

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::instrument;

use chatlog_core::entities::{Message, MessageDeletion, MessageEdit};
use chatlog_core::traits::{MessageRepository, RepoResult, WriteOutcome};
use chatlog_core::value_objects::Snowflake;

use crate::mappers::MessageInsert;
use crate::models::{MessageEditModel, MessageModel};

use super::error::{insert_outcome, map_db_error};
use super::store::PgUnitOfWork;

#[async_trait]
impl MessageRepository for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn find_message(&mut self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT msgid, displaytext, rawtext, community_id, channel_id, thread_id,
                   author_id, type, attachments, machine, "timestamp"
            FROM "message-createds"
            WHERE msgid = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn message_ids_in_channel(
        &mut self,
        channel_id: Snowflake,
    ) -> RepoResult<HashSet<Snowflake>> {
        let ids: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT msgid
            FROM "message-createds"
            WHERE channel_id = $1
            "#,
        )
        .bind(channel_id.into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn insert_message(&mut self, message: &Message) -> RepoResult<WriteOutcome> {
        let insert = MessageInsert::new(message);
        let result = sqlx::query(
            r#"
            INSERT INTO "message-createds"
                (msgid, displaytext, rawtext, community_id, channel_id, thread_id,
                 author_id, type, attachments, machine, "timestamp")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (msgid) DO NOTHING
            "#,
        )
        .bind(insert.msgid)
        .bind(insert.displaytext)
        .bind(insert.rawtext)
        .bind(insert.community_id)
        .bind(insert.channel_id)
        .bind(insert.thread_id)
        .bind(insert.author_id)
        .bind(insert.kind)
        .bind(insert.attachments)
        .bind(insert.machine)
        .bind(message.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(insert_outcome(&result))
    }

    #[instrument(skip(self))]
    async fn latest_edit(&mut self, message_id: Snowflake) -> RepoResult<Option<MessageEdit>> {
        let result = sqlx::query_as::<_, MessageEditModel>(
            r#"
            SELECT id, msgid, displaytext, rawtext, attachments, machine, "timestamp"
            FROM "message-editeds"
            WHERE msgid = $1
            ORDER BY "timestamp" DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(MessageEdit::from))
    }

    #[instrument(skip(self, edit), fields(message_id = %edit.message_id))]
    async fn insert_edit(&mut self, edit: &MessageEdit) -> RepoResult<WriteOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO "message-editeds"
                (msgid, displaytext, rawtext, attachments, machine, "timestamp")
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (msgid, "timestamp") DO NOTHING
            "#,
        )
        .bind(edit.message_id.into_inner())
        .bind(&edit.display_text)
        .bind(&edit.raw_text)
        .bind(edit.attachments.as_deref())
        .bind(&edit.machine)
        .bind(edit.edited_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(insert_outcome(&result))
    }

    #[instrument(skip(self, deletion), fields(message_id = %deletion.message_id))]
    async fn insert_deletion(&mut self, deletion: &MessageDeletion) -> RepoResult<WriteOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO "message-deleteds" (msgid, machine, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (msgid) DO NOTHING
            "#,
        )
        .bind(deletion.message_id.into_inner())
        .bind(&deletion.machine)
        .bind(deletion.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(insert_outcome(&result))
    }

    #[instrument(skip(self))]
    async fn messages_missing_raw(&mut self, channel_id: Snowflake) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT msgid, displaytext, rawtext, community_id, channel_id, thread_id,
                   author_id, type, attachments, machine, "timestamp"
            FROM "message-createds"
            WHERE channel_id = $1 AND rawtext IS NULL
            ORDER BY msgid ASC
            "#,
        )
        .bind(channel_id.into_inner())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, display_text, raw_text))]
    async fn fill_content(
        &mut self,
        id: Snowflake,
        display_text: &str,
        raw_text: &str,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE "message-createds"
            SET displaytext = $2, rawtext = $3
            WHERE msgid = $1 AND rawtext IS NULL
            "#,
        )
        .bind(id.into_inner())
        .bind(display_text)
        .bind(raw_text)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
