//! Community database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for communities table
#[derive(Debug, Clone, FromRow)]
pub struct CommunityModel {
    pub community_id: i64,
    pub name: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}
