//! Name change ledger row and change-kind tags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Which attribute a name change row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    CommunityName,
    ChannelName,
    ThreadName,
    Username,
    Discriminator,
}

impl ChangeKind {
    /// Tag stored in the `kind` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommunityName => "COMMUNITY_NAME",
            Self::ChannelName => "CHANNEL_NAME",
            Self::ThreadName => "THREAD_NAME",
            Self::Username => "USERNAME",
            Self::Discriminator => "DISCRIMINATOR",
        }
    }

    /// Parse a stored tag
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "COMMUNITY_NAME" => Some(Self::CommunityName),
            "CHANNEL_NAME" => Some(Self::ChannelName),
            "THREAD_NAME" => Some(Self::ThreadName),
            "USERNAME" => Some(Self::Username),
            "DISCRIMINATOR" => Some(Self::Discriminator),
            _ => None,
        }
    }

    /// Column holding the attribute in the entity's table
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CommunityName | Self::ChannelName | Self::ThreadName => "name",
            Self::Username => "username",
            Self::Discriminator => "discriminator",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of an attribute change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChange {
    pub subject_id: Snowflake,
    pub kind: ChangeKind,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// Actor found in the audit trail, if any
    pub actor_id: Option<Snowflake>,
    /// When the audit trail says the change happened, if attributed
    pub changed_at: Option<DateTime<Utc>>,
}

impl NameChange {
    /// Create an unattributed change
    pub fn unattributed(
        subject_id: Snowflake,
        kind: ChangeKind,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            subject_id,
            kind,
            old_value,
            new_value,
            actor_id: None,
            changed_at: None,
        }
    }

    /// Attach the responsible actor and time
    #[must_use]
    pub fn attributed_to(mut self, actor_id: Snowflake, changed_at: DateTime<Utc>) -> Self {
        self.actor_id = Some(actor_id);
        self.changed_at = Some(changed_at);
        self
    }

    /// Check if an actor was found for this change
    #[inline]
    pub fn is_attributed(&self) -> bool {
        self.actor_id.is_some()
    }
}
