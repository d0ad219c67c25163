//! Repository traits (ports) - define the interface for ledger storage
//!
//! All writes of one logical operation (one inbound event, one backfill page)
//! go through a single [`UnitOfWork`] and become visible on `commit`.
//! Every method re-reads or writes the store; nothing is cached between calls.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::entities::{
    ChangeKind, Channel, Community, Entity, EntityKind, Message, MessageDeletion, MessageEdit,
    NameChange, Thread, User,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Result of an insert that may lose a race on a unique key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The row was written by this call
    Inserted,
    /// A row with the same key already existed; nothing was written
    Duplicate,
}

impl WriteOutcome {
    /// Check if this call wrote the row
    #[inline]
    pub fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

// ============================================================================
// Entity Repository
// ============================================================================

#[async_trait]
pub trait EntityRepository: Send {
    /// Find the persisted record of an entity
    async fn find_entity(&mut self, kind: EntityKind, id: Snowflake) -> RepoResult<Option<Entity>>;

    /// Insert an entity with its observed attributes; the creation timestamp
    /// is assigned by the store
    async fn insert_entity(&mut self, entity: &Entity) -> RepoResult<WriteOutcome>;

    /// Set one tracked attribute, only if it differs from `value`.
    ///
    /// Returns the number of rows changed; zero means the row already holds
    /// `value` (or does not exist).
    async fn update_attribute(
        &mut self,
        kind: EntityKind,
        id: Snowflake,
        attribute: ChangeKind,
        value: Option<&str>,
    ) -> RepoResult<u64>;

    /// Find community by ID
    async fn find_community(&mut self, id: Snowflake) -> RepoResult<Option<Community>> {
        Ok(match self.find_entity(EntityKind::Community, id).await? {
            Some(Entity::Community(community)) => Some(community),
            _ => None,
        })
    }

    /// Find channel by ID
    async fn find_channel(&mut self, id: Snowflake) -> RepoResult<Option<Channel>> {
        Ok(match self.find_entity(EntityKind::Channel, id).await? {
            Some(Entity::Channel(channel)) => Some(channel),
            _ => None,
        })
    }

    /// Find thread by ID
    async fn find_thread(&mut self, id: Snowflake) -> RepoResult<Option<Thread>> {
        Ok(match self.find_entity(EntityKind::Thread, id).await? {
            Some(Entity::Thread(thread)) => Some(thread),
            _ => None,
        })
    }

    /// Find user by ID
    async fn find_user(&mut self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(match self.find_entity(EntityKind::User, id).await? {
            Some(Entity::User(user)) => Some(user),
            _ => None,
        })
    }
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send {
    /// Find message by ID
    async fn find_message(&mut self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// IDs of every message recorded for a channel
    async fn message_ids_in_channel(&mut self, channel_id: Snowflake)
        -> RepoResult<HashSet<Snowflake>>;

    /// Record a message; a second insert of the same ID is a no-op
    async fn insert_message(&mut self, message: &Message) -> RepoResult<WriteOutcome>;

    /// Most recent edit of a message
    async fn latest_edit(&mut self, message_id: Snowflake) -> RepoResult<Option<MessageEdit>>;

    /// Append an edit; the same (message, edit time) twice is a no-op
    async fn insert_edit(&mut self, edit: &MessageEdit) -> RepoResult<WriteOutcome>;

    /// Record a deletion; a second deletion of the same ID is a no-op
    async fn insert_deletion(&mut self, deletion: &MessageDeletion) -> RepoResult<WriteOutcome>;

    /// Messages in a channel recorded without raw text
    async fn messages_missing_raw(&mut self, channel_id: Snowflake) -> RepoResult<Vec<Message>>;

    /// Fill in raw and display text of a message that has no raw text yet.
    ///
    /// Returns the number of rows changed.
    async fn fill_content(
        &mut self,
        id: Snowflake,
        display_text: &str,
        raw_text: &str,
    ) -> RepoResult<u64>;
}

// ============================================================================
// Name Change Repository
// ============================================================================

#[async_trait]
pub trait NameChangeRepository: Send {
    /// Append a change-log row
    async fn append_name_change(&mut self, change: &NameChange) -> RepoResult<()>;

    /// Change-log rows for a subject, oldest first
    async fn name_changes_for(&mut self, subject_id: Snowflake) -> RepoResult<Vec<NameChange>>;
}

// ============================================================================
// Unit of Work
// ============================================================================

/// One transaction against the ledger
#[async_trait]
pub trait UnitOfWork: EntityRepository + MessageRepository + NameChangeRepository {
    /// Make every write of this unit visible
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

/// Source of units of work
#[async_trait]
pub trait Store: Send + Sync {
    /// Acquire a connection and open a transaction
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>>;
}
