//! Name change log database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the "name-changes" table
#[derive(Debug, Clone, FromRow)]
pub struct NameChangeModel {
    pub id: i64,
    pub subject_id: i64,
    pub kind: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor_id: Option<i64>,
    pub changed_at: Option<DateTime<Utc>>,
    pub recorded_at: DateTime<Utc>,
}
