//! Platform ports - the live chat platform as seen by the services
//!
//! Implemented over the platform's REST API in the gateway crate and by fakes
//! in tests. None of these calls touch the store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Channel, ObservedMessage, User};
use crate::error::PlatformError;
use crate::value_objects::Snowflake;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Audit log event types the rename reconciler searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AuditAction {
    CommunityUpdate = 1,
    ChannelUpdate = 11,
    ThreadUpdate = 111,
}

impl AuditAction {
    /// Numeric `action_type` filter value
    #[inline]
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// One audit log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Who performed the action, if the platform disclosed it
    pub actor: Option<User>,
    pub created_at: DateTime<Utc>,
    /// Keys of the fields the action changed
    pub changed_keys: Vec<String>,
}

impl AuditEntry {
    /// Check if the entry changed the given field
    pub fn changes(&self, key: &str) -> bool {
        self.changed_keys.iter().any(|k| k == key)
    }
}

#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Most recent entries of one action type, newest first
    async fn recent_entries(
        &self,
        community_id: Snowflake,
        action: AuditAction,
        limit: u8,
    ) -> PlatformResult<Vec<AuditEntry>>;
}

#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// Text channels the acting identity can read, across all communities
    async fn text_channels(&self) -> PlatformResult<Vec<Channel>>;

    /// One page of a channel's history, newest first, strictly older than
    /// `before` when given
    async fn fetch_page(
        &self,
        channel: &Channel,
        before: Option<Snowflake>,
        limit: u8,
    ) -> PlatformResult<Vec<ObservedMessage>>;

    /// Fetch a single message in full; `None` if it no longer exists
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Option<ObservedMessage>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a plain text message to a channel
    async fn send_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()>;
}

/// Where an attachment of a recorded message should be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentTarget {
    pub community_id: Snowflake,
    /// Channel or thread the message was posted in
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    /// Index among the message's attachments
    pub position: usize,
    pub url: String,
}

impl AttachmentTarget {
    /// File name taken from the URL path, without query string
    pub fn file_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("attachment")
    }

    /// File name prefixed with the position, unique within the message
    pub fn stored_name(&self) -> String {
        format!("{}_{}", self.position, self.file_name())
    }
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Copy one attachment into storage
    async fn store(&self, target: &AttachmentTarget) -> PlatformResult<()>;
}
