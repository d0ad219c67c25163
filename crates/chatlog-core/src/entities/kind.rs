//! Entity kinds and the descriptor table the generic reconcilers run on
//!
//! Everything that differs between communities, channels, threads and users
//! during reconciliation lives here: the backing table and key column, the
//! attributes that are compared against live state, and the audit event used
//! to attribute a rename.

use crate::traits::AuditAction;
use crate::value_objects::Snowflake;

use super::{ChangeKind, Channel, Community, Thread, User};

/// The four mirrored entity kinds that carry renameable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Community,
    Channel,
    Thread,
    User,
}

impl EntityKind {
    /// Backing table
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Community => "communities",
            Self::Channel => "channels",
            Self::Thread => "threads",
            Self::User => "users",
        }
    }

    /// Primary key column
    #[must_use]
    pub const fn key_column(self) -> &'static str {
        match self {
            Self::Community => "community_id",
            Self::Channel => "channel_id",
            Self::Thread => "thread_id",
            Self::User => "user_id",
        }
    }

    /// Attributes compared against live state, in reconciliation order
    #[must_use]
    pub const fn tracked_attributes(self) -> &'static [ChangeKind] {
        match self {
            Self::Community => &[ChangeKind::CommunityName],
            Self::Channel => &[ChangeKind::ChannelName],
            Self::Thread => &[ChangeKind::ThreadName],
            Self::User => &[ChangeKind::Username, ChangeKind::Discriminator],
        }
    }

    /// Audit event that records a rename of this kind.
    ///
    /// Users have none: profile changes are not in a community's audit trail.
    #[must_use]
    pub const fn audit_action(self) -> Option<AuditAction> {
        match self {
            Self::Community => Some(AuditAction::CommunityUpdate),
            Self::Channel => Some(AuditAction::ChannelUpdate),
            Self::Thread => Some(AuditAction::ThreadUpdate),
            Self::User => None,
        }
    }

    /// Lowercase label for logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Channel => "channel",
            Self::Thread => "thread",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An observed or persisted entity of any reconcilable kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Community(Community),
    Channel(Channel),
    Thread(Thread),
    User(User),
}

impl Entity {
    /// Kind descriptor
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Community(_) => EntityKind::Community,
            Self::Channel(_) => EntityKind::Channel,
            Self::Thread(_) => EntityKind::Thread,
            Self::User(_) => EntityKind::User,
        }
    }

    /// External identifier
    #[must_use]
    pub fn id(&self) -> Snowflake {
        match self {
            Self::Community(c) => c.id,
            Self::Channel(c) => c.id,
            Self::Thread(t) => t.id,
            Self::User(u) => u.id,
        }
    }

    /// Community whose audit trail covers changes to this entity
    #[must_use]
    pub fn community_id(&self) -> Option<Snowflake> {
        match self {
            Self::Community(c) => Some(c.id),
            Self::Channel(c) => Some(c.community_id),
            Self::Thread(t) => Some(t.community_id),
            Self::User(_) => None,
        }
    }

    /// Current value of a tracked attribute.
    ///
    /// Returns `None` both for attributes the kind does not have and for an
    /// absent discriminator; callers only ask for `tracked_attributes()`.
    #[must_use]
    pub fn attribute(&self, change: ChangeKind) -> Option<&str> {
        match (self, change) {
            (Self::Community(c), ChangeKind::CommunityName) => Some(&c.name),
            (Self::Channel(c), ChangeKind::ChannelName) => Some(&c.name),
            (Self::Thread(t), ChangeKind::ThreadName) => Some(&t.name),
            (Self::User(u), ChangeKind::Username) => Some(&u.username),
            (Self::User(u), ChangeKind::Discriminator) => u.discriminator.as_deref(),
            _ => None,
        }
    }

    /// Operator opt-out flag
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Community(c) => c.disabled,
            Self::Channel(c) => c.disabled,
            Self::Thread(t) => t.disabled,
            Self::User(u) => u.disabled,
        }
    }

    /// Human-readable name for logs
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Community(c) => c.name.clone(),
            Self::Channel(c) => c.name.clone(),
            Self::Thread(t) => t.name.clone(),
            Self::User(u) => u.tag(),
        }
    }
}

impl From<Community> for Entity {
    fn from(value: Community) -> Self {
        Self::Community(value)
    }
}

impl From<Channel> for Entity {
    fn from(value: Channel) -> Self {
        Self::Channel(value)
    }
}

impl From<Thread> for Entity {
    fn from(value: Thread) -> Self {
        Self::Thread(value)
    }
}

impl From<User> for Entity {
    fn from(value: User) -> Self {
        Self::User(value)
    }
}
