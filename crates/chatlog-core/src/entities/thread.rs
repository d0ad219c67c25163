//! Thread entity - a nested conversation spawned from a channel

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Thread entity
///
/// `channel_id` is the parent channel; a thread is always nested under
/// exactly one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: Snowflake,
    pub community_id: Snowflake,
    pub channel_id: Snowflake,
    pub name: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// Create a thread as observed on the platform
    pub fn observed(
        id: Snowflake,
        community_id: Snowflake,
        channel_id: Snowflake,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            community_id,
            channel_id,
            name: name.into(),
            disabled: false,
            created_at: Utc::now(),
        }
    }
}
