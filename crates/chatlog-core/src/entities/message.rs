//! Message ledger rows - creation, edits and deletions

use chrono::{DateTime, Utc};

use crate::value_objects::{ContentFingerprint, Snowflake};

/// Split a stored comma-joined attachment list
fn split_attachments(attachments: Option<&str>) -> Vec<&str> {
    attachments
        .map(|s| s.split(',').filter(|url| !url.is_empty()).collect())
        .unwrap_or_default()
}

/// Join attachment URLs for storage; an empty list is stored as NULL
pub(crate) fn join_attachments(urls: &[String]) -> Option<String> {
    if urls.is_empty() {
        None
    } else {
        Some(urls.join(","))
    }
}

/// A message as first recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    /// Mention- and emoji-normalized text
    pub display_text: String,
    /// Unmodified source text; `None` for rows recorded before raw capture
    pub raw_text: Option<String>,
    pub community_id: Snowflake,
    /// For thread messages, the thread's parent channel
    pub channel_id: Snowflake,
    pub thread_id: Option<Snowflake>,
    pub author_id: Snowflake,
    /// Platform message-type code
    pub kind: i32,
    /// Comma-joined attachment URLs
    pub attachments: Option<String>,
    /// Hostname of the process that recorded the row
    pub machine: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Attachment URLs in stored order
    pub fn attachment_urls(&self) -> Vec<&str> {
        split_attachments(self.attachments.as_deref())
    }

    /// Number of stored attachments
    pub fn attachment_count(&self) -> usize {
        self.attachment_urls().len()
    }

    /// Channel or thread the message was posted in
    #[inline]
    pub fn posted_in(&self) -> Snowflake {
        self.thread_id.unwrap_or(self.channel_id)
    }

    /// Fingerprint of the stored content; legacy rows without raw text
    /// have none
    pub fn fingerprint(&self) -> Option<ContentFingerprint> {
        self.raw_text
            .as_deref()
            .map(|raw| ContentFingerprint::compute(raw, self.attachment_urls()))
    }
}

/// One entry of a message's edit history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEdit {
    pub message_id: Snowflake,
    pub display_text: String,
    pub raw_text: String,
    pub attachments: Option<String>,
    pub machine: String,
    pub edited_at: DateTime<Utc>,
}

impl MessageEdit {
    /// Attachment URLs in stored order
    pub fn attachment_urls(&self) -> Vec<&str> {
        split_attachments(self.attachments.as_deref())
    }

    /// Fingerprint of the edited content
    pub fn fingerprint(&self) -> ContentFingerprint {
        ContentFingerprint::compute(&self.raw_text, self.attachment_urls())
    }
}

/// Deletion ledger entry; one per message id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDeletion {
    pub message_id: Snowflake,
    pub machine: String,
    pub created_at: DateTime<Utc>,
}

impl MessageDeletion {
    /// Record a deletion observed now
    pub fn now(message_id: Snowflake, machine: impl Into<String>) -> Self {
        Self {
            message_id,
            machine: machine.into(),
            created_at: Utc::now(),
        }
    }
}
