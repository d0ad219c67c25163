//! REST client for the chat platform
//!
//! Implements the audit trail, message history and notifier ports, and
//! resolves dispatched messages, all over the platform's JSON API. Every call
//! reads live state; nothing is cached between calls.

use async_trait::async_trait;
use chatlog_common::PlatformConfig;
use chatlog_core::entities::{Channel, ObservedMessage};
use chatlog_core::error::PlatformError;
use chatlog_core::traits::{
    AuditAction, AuditEntry, AuditTrail, MessageHistory, Notifier, PlatformResult,
};
use chatlog_core::Snowflake;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::models::{
    channel_type, AllowedMentions, AuditLogPayload, ChannelPayload, CreateMessageRequest,
    GuildPayload, MessagePayload,
};
use super::resolve::{observe, to_user, MessageOrigin, MessageResolver};

/// Platform REST client
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    api_base: String,
    authorization: String,
}

impl PlatformClient {
    /// Create a client from the platform configuration
    pub fn new(config: &PlatformConfig) -> PlatformResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("chatlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            authorization: format!("Bot {}", config.token),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
    }

    /// Send a request and decode its JSON body.
    ///
    /// `route` is the path template, used in errors and logs.
    async fn send<T: DeserializeOwned>(request: RequestBuilder, route: &str) -> PlatformResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
                route: route.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PlatformError::Decode(format!("{route}: {e}")))
    }

    async fn guild(&self, guild_id: Snowflake) -> PlatformResult<GuildPayload> {
        Self::send(self.get(&format!("/guilds/{guild_id}")), "/guilds/{guild.id}").await
    }

    async fn guild_channels(&self, guild_id: Snowflake) -> PlatformResult<Vec<ChannelPayload>> {
        Self::send(
            self.get(&format!("/guilds/{guild_id}/channels")),
            "/guilds/{guild.id}/channels",
        )
        .await
    }

    async fn channel(&self, channel_id: Snowflake) -> PlatformResult<ChannelPayload> {
        Self::send(self.get(&format!("/channels/{channel_id}")), "/channels/{channel.id}").await
    }

    /// Resolve where messages posted in `channel_id` live; `None` outside
    /// communities
    #[instrument(skip(self))]
    pub async fn origin(&self, channel_id: Snowflake) -> PlatformResult<Option<MessageOrigin>> {
        let posted_in = self.channel(channel_id).await?;
        let Some(guild_id) = posted_in.guild_id else {
            return Ok(None);
        };

        let guild = self.guild(guild_id).await?;
        let guild_channels = self.guild_channels(guild_id).await?;

        let parent = match (posted_in.is_thread(), posted_in.parent_id) {
            (true, Some(parent_id)) => match guild_channels.iter().find(|c| c.id == parent_id) {
                Some(parent) => Some(parent.clone()),
                None => Some(self.channel(parent_id).await?),
            },
            _ => None,
        };

        Ok(Some(MessageOrigin::new(
            &guild,
            &posted_in,
            parent.as_ref(),
            &guild_channels,
        )))
    }

    /// Origin of messages listed from a known text channel
    async fn channel_origin(&self, channel: &Channel) -> PlatformResult<MessageOrigin> {
        let guild = self.guild(channel.community_id).await?;
        let guild_channels = self.guild_channels(channel.community_id).await?;
        let posted_in = ChannelPayload {
            id: channel.id,
            kind: channel_type::GUILD_TEXT,
            guild_id: Some(channel.community_id),
            name: Some(channel.name.clone()),
            parent_id: None,
        };
        Ok(MessageOrigin::new(&guild, &posted_in, None, &guild_channels))
    }
}

/// Text channels among a community's channel listing
fn text_channels_of(guild_id: Snowflake, listed: &[ChannelPayload]) -> Vec<Channel> {
    listed
        .iter()
        .filter(|c| c.kind == channel_type::GUILD_TEXT)
        .map(|c| Channel::observed(c.id, guild_id, c.name()))
        .collect()
}

#[async_trait]
impl AuditTrail for PlatformClient {
    async fn recent_entries(
        &self,
        community_id: Snowflake,
        action: AuditAction,
        limit: u8,
    ) -> PlatformResult<Vec<AuditEntry>> {
        let request = self
            .get(&format!("/guilds/{community_id}/audit-logs"))
            .query(&[("action_type", action.code()), ("limit", u16::from(limit))]);
        let log: AuditLogPayload = Self::send(request, "/guilds/{guild.id}/audit-logs").await?;

        Ok(log
            .audit_log_entries
            .iter()
            .map(|entry| AuditEntry {
                actor: entry
                    .user_id
                    .and_then(|id| log.users.iter().find(|u| u.id == id))
                    .map(to_user),
                created_at: entry.id.created_at(),
                changed_keys: entry.changes.iter().map(|c| c.key.clone()).collect(),
            })
            .collect())
    }
}

#[async_trait]
impl MessageHistory for PlatformClient {
    async fn text_channels(&self) -> PlatformResult<Vec<Channel>> {
        let guilds: Vec<GuildPayload> =
            Self::send(self.get("/users/@me/guilds"), "/users/@me/guilds").await?;

        let mut channels = Vec::new();
        for guild in &guilds {
            let listed = match self.guild_channels(guild.id).await {
                Ok(listed) => listed,
                Err(e) => {
                    warn!(
                        guild_id = %guild.id,
                        error = %e,
                        "Skipping community whose channels could not be listed"
                    );
                    continue;
                }
            };
            channels.extend(text_channels_of(guild.id, &listed));
        }
        debug!(guilds = guilds.len(), channels = channels.len(), "Listed text channels");
        Ok(channels)
    }

    async fn fetch_page(
        &self,
        channel: &Channel,
        before: Option<Snowflake>,
        limit: u8,
    ) -> PlatformResult<Vec<ObservedMessage>> {
        let mut request = self
            .get(&format!("/channels/{}/messages", channel.id))
            .query(&[("limit", limit.to_string())]);
        if let Some(before) = before {
            request = request.query(&[("before", before.to_string())]);
        }
        let page: Vec<MessagePayload> =
            Self::send(request, "/channels/{channel.id}/messages").await?;
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let origin = self.channel_origin(channel).await?;
        Ok(page.iter().map(|message| observe(message, &origin)).collect())
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Option<ObservedMessage>> {
        let request = self.get(&format!("/channels/{channel_id}/messages/{message_id}"));
        let message: MessagePayload =
            match Self::send(request, "/channels/{channel.id}/messages/{message.id}").await {
                Ok(message) => message,
                Err(e) if e.is_not_found() => return Ok(None),
                Err(e) => return Err(e),
            };

        Ok(self
            .origin(channel_id)
            .await?
            .map(|origin| observe(&message, &origin)))
    }
}

#[async_trait]
impl MessageResolver for PlatformClient {
    async fn resolve(&self, payload: &MessagePayload) -> PlatformResult<ObservedMessage> {
        let origin = self.origin(payload.channel_id).await?.ok_or_else(|| {
            PlatformError::Decode(format!("channel {} is not in a community", payload.channel_id))
        })?;
        Ok(observe(payload, &origin))
    }
}

#[async_trait]
impl Notifier for PlatformClient {
    async fn send_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        let body = CreateMessageRequest {
            content,
            allowed_mentions: AllowedMentions::default(),
        };
        let response = self
            .http
            .post(self.url(&format!("/channels/{channel_id}/messages")))
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PlatformError::Status {
                status: status.as_u16(),
                route: "/channels/{channel.id}/messages".to_string(),
            })
        }
    }
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("api_base", &self.api_base)
            .field("authorization", &"[redacted]")
            .finish()
    }
}
