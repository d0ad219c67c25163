//! Building observed messages from platform payloads
//!
//! A payload only names its channel and community by id; the observed message
//! carries them as they look right now, so the reconcilers can compare names.

use async_trait::async_trait;
use chatlog_core::content::{render_display_text, MentionNames};
use chatlog_core::entities::{Channel, Community, ObservedMessage, Thread, User};
use chatlog_core::traits::PlatformResult;
use chatlog_core::Snowflake;

use super::models::{ChannelPayload, GuildPayload, MessagePayload, UserPayload};

/// Where a message was posted, as currently seen on the platform
#[derive(Debug, Clone)]
pub struct MessageOrigin {
    pub community: Community,
    /// For thread messages, the thread's parent channel
    pub channel: Channel,
    pub thread: Option<Thread>,
    /// Names of the community's channels, for rendering channel mentions
    pub channel_names: Vec<(Snowflake, String)>,
}

impl MessageOrigin {
    /// Assemble an origin from the channel (or thread) the message was posted
    /// in, its parent when it is a thread, and the community.
    pub fn new(
        guild: &GuildPayload,
        posted_in: &ChannelPayload,
        parent: Option<&ChannelPayload>,
        guild_channels: &[ChannelPayload],
    ) -> Self {
        let community = Community::observed(guild.id, &guild.name);
        let (channel, thread) = match parent {
            Some(parent) => (
                Channel::observed(parent.id, guild.id, parent.name()),
                Some(Thread::observed(
                    posted_in.id,
                    guild.id,
                    parent.id,
                    posted_in.name(),
                )),
            ),
            None => (Channel::observed(posted_in.id, guild.id, posted_in.name()), None),
        };

        Self {
            community,
            channel,
            thread,
            channel_names: guild_channels
                .iter()
                .map(|c| (c.id, c.name().to_string()))
                .collect(),
        }
    }
}

/// Convert a user object
pub fn to_user(payload: &UserPayload) -> User {
    let mut user = User::observed(payload.id, &payload.username, payload.discriminator.clone())
        .with_bot(payload.bot);
    user.system = payload.system;
    user
}

/// Build the observed message for a payload posted in `origin`
pub fn observe(payload: &MessagePayload, origin: &MessageOrigin) -> ObservedMessage {
    let mut names = MentionNames::new();
    for user in &payload.mentions {
        names.user(user.id, &user.username);
    }
    for (id, name) in &origin.channel_names {
        names.channel(*id, name);
    }
    if let Some(thread) = &origin.thread {
        names.channel(thread.id, &thread.name);
    }

    ObservedMessage {
        id: payload.id,
        community: Some(origin.community.clone()),
        channel: Some(origin.channel.clone()),
        thread: origin.thread.clone(),
        author: Some(to_user(&payload.author)),
        raw_text: payload.content.clone(),
        display_text: render_display_text(&payload.content, &names),
        kind: payload.kind,
        attachments: payload.attachments.iter().map(|a| a.url.clone()).collect(),
        created_at: payload.timestamp,
        edited_at: payload.edited_timestamp,
    }
}

/// Turns dispatched message payloads into observed messages
#[async_trait]
pub trait MessageResolver: Send + Sync {
    /// Resolve the live community, channel and thread of a message
    async fn resolve(&self, payload: &MessagePayload) -> PlatformResult<ObservedMessage>;
}
