//! Thread database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for threads table
#[derive(Debug, Clone, FromRow)]
pub struct ThreadModel {
    pub thread_id: i64,
    pub community_id: i64,
    /// Parent channel
    pub channel_id: i64,
    pub name: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}
