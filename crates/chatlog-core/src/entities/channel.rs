//! Channel entity - a persistent conversation stream within a community

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub name: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    /// Create a channel as observed on the platform
    pub fn observed(id: Snowflake, community_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            community_id,
            name: name.into(),
            disabled: false,
            created_at: Utc::now(),
        }
    }
}
