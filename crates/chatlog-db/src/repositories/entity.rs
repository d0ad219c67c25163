//! PostgreSQL implementation of EntityRepository

use async_trait::async_trait;
use tracing::instrument;

use chatlog_core::entities::{ChangeKind, Channel, Community, Entity, EntityKind, Thread, User};
use chatlog_core::traits::{EntityRepository, RepoResult, WriteOutcome};
use chatlog_core::value_objects::Snowflake;

use crate::mappers::UserInsert;
use crate::models::{ChannelModel, CommunityModel, ThreadModel, UserModel};

use super::error::{insert_outcome, map_db_error};
use super::store::PgUnitOfWork;

/// Conditional single-column update for a tracked attribute.
///
/// Table and column names come from the static descriptor tables, never
/// from input.
fn update_attribute_sql(kind: EntityKind, attribute: ChangeKind) -> String {
    let table = kind.table();
    let key = kind.key_column();
    let column = attribute.column();
    format!(
        "UPDATE {table} SET {column} = $2 WHERE {key} = $1 AND {column} IS DISTINCT FROM $2"
    )
}

#[async_trait]
impl EntityRepository for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn find_entity(&mut self, kind: EntityKind, id: Snowflake) -> RepoResult<Option<Entity>> {
        let id = id.into_inner();
        let entity = match kind {
            EntityKind::Community => sqlx::query_as::<_, CommunityModel>(
                r"
                SELECT community_id, name, disabled, created_at
                FROM communities
                WHERE community_id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .map(|m| Entity::Community(Community::from(m))),

            EntityKind::Channel => sqlx::query_as::<_, ChannelModel>(
                r"
                SELECT channel_id, community_id, name, disabled, created_at
                FROM channels
                WHERE channel_id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .map(|m| Entity::Channel(Channel::from(m))),

            EntityKind::Thread => sqlx::query_as::<_, ThreadModel>(
                r"
                SELECT thread_id, community_id, channel_id, name, disabled, created_at
                FROM threads
                WHERE thread_id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .map(|m| Entity::Thread(Thread::from(m))),

            EntityKind::User => sqlx::query_as::<_, UserModel>(
                r#"
                SELECT user_id, username, discriminator, bot, "system", disabled, created_at
                FROM users
                WHERE user_id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .map(|m| Entity::User(User::from(m))),
        };

        Ok(entity)
    }

    #[instrument(skip(self, entity), fields(kind = %entity.kind(), id = %entity.id()))]
    async fn insert_entity(&mut self, entity: &Entity) -> RepoResult<WriteOutcome> {
        let result = match entity {
            Entity::Community(community) => sqlx::query(
                r"
                INSERT INTO communities (community_id, name, created_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (community_id) DO NOTHING
                ",
            )
            .bind(community.id.into_inner())
            .bind(&community.name)
            .execute(&mut *self.tx)
            .await,

            Entity::Channel(channel) => sqlx::query(
                r"
                INSERT INTO channels (channel_id, community_id, name, created_at)
                VALUES ($1, $2, $3, NOW())
                ON CONFLICT (channel_id) DO NOTHING
                ",
            )
            .bind(channel.id.into_inner())
            .bind(channel.community_id.into_inner())
            .bind(&channel.name)
            .execute(&mut *self.tx)
            .await,

            Entity::Thread(thread) => sqlx::query(
                r"
                INSERT INTO threads (thread_id, community_id, channel_id, name, created_at)
                VALUES ($1, $2, $3, $4, NOW())
                ON CONFLICT (thread_id) DO NOTHING
                ",
            )
            .bind(thread.id.into_inner())
            .bind(thread.community_id.into_inner())
            .bind(thread.channel_id.into_inner())
            .bind(&thread.name)
            .execute(&mut *self.tx)
            .await,

            Entity::User(user) => {
                let insert = UserInsert::new(user);
                sqlx::query(
                    r#"
                    INSERT INTO users (user_id, username, discriminator, bot, "system", created_at)
                    VALUES ($1, $2, $3, $4, $5, NOW())
                    ON CONFLICT (user_id) DO NOTHING
                    "#,
                )
                .bind(insert.user_id)
                .bind(insert.username)
                .bind(insert.discriminator)
                .bind(insert.bot)
                .bind(insert.system)
                .execute(&mut *self.tx)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(insert_outcome(&result))
    }

    #[instrument(skip(self))]
    async fn update_attribute(
        &mut self,
        kind: EntityKind,
        id: Snowflake,
        attribute: ChangeKind,
        value: Option<&str>,
    ) -> RepoResult<u64> {
        let sql = update_attribute_sql(kind, attribute);
        let result = sqlx::query(&sql)
            .bind(id.into_inner())
            .bind(value)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
