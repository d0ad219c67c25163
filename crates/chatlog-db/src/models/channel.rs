//! Channel database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub channel_id: i64,
    pub community_id: i64,
    pub name: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}
