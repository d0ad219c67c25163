//! Platform payload definitions
//!
//! Wire shapes of the REST responses and dispatch bodies the ledger reads.
//! Only the fields the ledger uses are declared; everything else in the
//! platform's JSON is ignored.

use chatlog_core::Snowflake;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel types the ledger distinguishes
pub mod channel_type {
    pub const GUILD_TEXT: i32 = 0;
    pub const GUILD_NEWS: i32 = 5;
    pub const NEWS_THREAD: i32 = 10;
    pub const PUBLIC_THREAD: i32 = 11;
    pub const PRIVATE_THREAD: i32 = 12;

    /// Check if messages posted here belong to a thread
    #[must_use]
    pub const fn is_thread(kind: i32) -> bool {
        matches!(kind, NEWS_THREAD | PUBLIC_THREAD | PRIVATE_THREAD)
    }
}

/// User object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub system: bool,
}

/// Attachment object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub id: Snowflake,
    pub url: String,
}

/// Message object, as returned by the REST API and carried by
/// `MESSAGE_CREATE`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// Absent for direct messages and in REST responses
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub kind: i32,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
    #[serde(default)]
    pub mentions: Vec<UserPayload>,
}

/// Channel or thread object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: i32,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    /// For threads, the channel the thread hangs off
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
}

impl ChannelPayload {
    /// Name, or empty for unnamed channels
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn is_thread(&self) -> bool {
        channel_type::is_thread(self.kind)
    }
}

/// Guild object (partial guilds from `/users/@me/guilds` have the same
/// fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildPayload {
    pub id: Snowflake,
    pub name: String,
}

/// One changed field in an audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditChangePayload {
    pub key: String,
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntryPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub user_id: Option<Snowflake>,
    pub action_type: u16,
    #[serde(default)]
    pub changes: Vec<AuditChangePayload>,
}

/// Audit log response; actors are listed once in `users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogPayload {
    #[serde(default)]
    pub audit_log_entries: Vec<AuditLogEntryPayload>,
    #[serde(default)]
    pub users: Vec<UserPayload>,
}

/// Body of `POST /channels/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub content: &'a str,
    pub allowed_mentions: AllowedMentions,
}

/// Mention policy of outgoing messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}
