//! User entity - a platform account

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    /// Legacy 4-digit tag; "0" or absent for accounts on unique usernames
    pub discriminator: Option<String>,
    pub bot: bool,
    pub system: bool,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user as observed on the platform
    pub fn observed(
        id: Snowflake,
        username: impl Into<String>,
        discriminator: Option<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator,
            bot: false,
            system: false,
            disabled: false,
            created_at: Utc::now(),
        }
    }

    /// Mark the user as a bot account
    #[must_use]
    pub fn with_bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    /// Get the display tag: `username#discriminator`, or just `username`
    /// when the account has no legacy discriminator
    pub fn tag(&self) -> String {
        match self.legacy_discriminator() {
            Some(discriminator) => format!("{}#{}", self.username, discriminator),
            None => self.username.clone(),
        }
    }

    /// The discriminator, unless it is absent or the "0" sentinel
    pub fn legacy_discriminator(&self) -> Option<&str> {
        self.discriminator
            .as_deref()
            .filter(|d| !d.is_empty() && *d != "0")
    }

    /// Check if user is a bot account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }
}
