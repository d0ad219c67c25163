//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub user_id: i64,
    pub username: String,
    pub discriminator: Option<String>,
    pub bot: bool,
    pub system: bool,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}
