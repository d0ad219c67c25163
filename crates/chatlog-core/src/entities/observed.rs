//! Observed message - the normalized live view handed to the lifecycle tracker
//!
//! Built at the boundary from a gateway event or a history page. The
//! surrounding entities are carried as observed right now, so reconciling them
//! brings the store up to date before the message row is written.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{ContentFingerprint, Snowflake};

use super::message::join_attachments;
use super::{Channel, Community, Entity, Message, MessageEdit, Thread, User};

/// A message as currently seen on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedMessage {
    pub id: Snowflake,
    pub community: Option<Community>,
    /// For thread messages, the thread's parent channel
    pub channel: Option<Channel>,
    pub thread: Option<Thread>,
    pub author: Option<User>,
    pub raw_text: String,
    pub display_text: String,
    pub kind: i32,
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl ObservedMessage {
    /// Channel or thread the message was posted in
    pub fn posted_in(&self) -> Option<Snowflake> {
        self.thread
            .as_ref()
            .map(|t| t.id)
            .or_else(|| self.channel.as_ref().map(|c| c.id))
    }

    /// Fingerprint of the live content
    pub fn fingerprint(&self) -> ContentFingerprint {
        ContentFingerprint::compute(&self.raw_text, self.attachments.iter().map(String::as_str))
    }

    fn missing(&self, entity: &'static str) -> DomainError {
        DomainError::MissingEntity {
            entity,
            message_id: self.id,
        }
    }

    /// Entities the message depends on, in reconciliation order:
    /// community, channel, thread (if any), author.
    ///
    /// # Errors
    /// `MissingEntity` when the community, channel or author is absent, and
    /// `ThreadParentMismatch` when the thread does not hang off the channel.
    pub fn origin_entities(&self) -> Result<Vec<Entity>, DomainError> {
        let community = self.community.clone().ok_or_else(|| self.missing("community"))?;
        let channel = self.channel.clone().ok_or_else(|| self.missing("channel"))?;
        let author = self.author.clone().ok_or_else(|| self.missing("author"))?;

        let mut entities = vec![Entity::Community(community), Entity::Channel(channel.clone())];
        if let Some(thread) = &self.thread {
            if thread.channel_id != channel.id {
                return Err(DomainError::ThreadParentMismatch {
                    thread_id: thread.id,
                    expected: channel.id,
                    found: thread.channel_id,
                });
            }
            entities.push(Entity::Thread(thread.clone()));
        }
        entities.push(Entity::User(author));
        Ok(entities)
    }

    /// Ledger row for this message
    ///
    /// # Errors
    /// `MissingEntity` when the community, channel or author is absent.
    pub fn to_message(&self, machine: &str) -> Result<Message, DomainError> {
        let community = self.community.as_ref().ok_or_else(|| self.missing("community"))?;
        let channel = self.channel.as_ref().ok_or_else(|| self.missing("channel"))?;
        let author = self.author.as_ref().ok_or_else(|| self.missing("author"))?;

        Ok(Message {
            id: self.id,
            display_text: self.display_text.clone(),
            raw_text: Some(self.raw_text.clone()),
            community_id: community.id,
            channel_id: channel.id,
            thread_id: self.thread.as_ref().map(|t| t.id),
            author_id: author.id,
            kind: self.kind,
            attachments: join_attachments(&self.attachments),
            machine: machine.to_string(),
            created_at: self.created_at,
        })
    }

    /// Edit-history row, if the platform marked the message as edited
    pub fn to_edit(&self, machine: &str) -> Option<MessageEdit> {
        self.edited_at.map(|edited_at| MessageEdit {
            message_id: self.id,
            display_text: self.display_text.clone(),
            raw_text: self.raw_text.clone(),
            attachments: join_attachments(&self.attachments),
            machine: machine.to_string(),
            edited_at,
        })
    }
}
