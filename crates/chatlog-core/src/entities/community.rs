//! Community entity - a top-level workspace (platform term: guild)

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Community (guild) entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: Snowflake,
    pub name: String,
    /// Opt-out flag set by operators; suppresses content rows
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// Create a community as observed on the platform
    pub fn observed(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            disabled: false,
            created_at: Utc::now(),
        }
    }
}
