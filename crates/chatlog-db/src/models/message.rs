//! Message ledger database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the "message-createds" table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub msgid: i64,
    pub displaytext: String,
    pub rawtext: Option<String>,
    pub community_id: i64,
    pub channel_id: i64,
    pub thread_id: Option<i64>,
    pub author_id: i64,
    #[sqlx(rename = "type")]
    pub kind: i32,
    pub attachments: Option<String>,
    pub machine: String,
    pub timestamp: DateTime<Utc>,
}

/// Database model for the "message-editeds" table
#[derive(Debug, Clone, FromRow)]
pub struct MessageEditModel {
    pub id: i64,
    pub msgid: i64,
    pub displaytext: String,
    pub rawtext: String,
    pub attachments: Option<String>,
    pub machine: String,
    pub timestamp: DateTime<Utc>,
}
