// Discord implementation of the antitag ChatTransport.
//
// A Discord text channel plays the role of a group chat: the channel id is
// the group id, the guild's members are its participants and removing a
// participant kicks them from the guild.

use crate::core::antitag::{
    mention_handle, ChatTransport, GroupRoster, MessageContent, MessageEvent, OutgoingMessage,
    TransportError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Discord only returns 1000 members per request; larger guilds are
/// evaluated against the first page.
const MEMBER_PAGE_LIMIT: u64 = 1000;

const KICK_REASON: &str = "Antitag: mass mentioning members";

pub struct DiscordTransport {
    http: Arc<serenity::Http>,
    /// Guild of each channel seen on the gateway
    guilds: DashMap<serenity::ChannelId, serenity::GuildId>,
}

impl DiscordTransport {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self {
            http,
            guilds: DashMap::new(),
        }
    }

    /// Record the guild an inbound message came from so enforcement can skip
    /// the channel lookup.
    pub fn remember_guild(&self, channel_id: serenity::ChannelId, guild_id: serenity::GuildId) {
        self.guilds.insert(channel_id, guild_id);
    }

    fn cached_guild(&self, channel_id: serenity::ChannelId) -> Option<serenity::GuildId> {
        self.guilds.get(&channel_id).map(|entry| *entry)
    }

    async fn guild_of(
        &self,
        channel_id: serenity::ChannelId,
    ) -> Result<serenity::GuildId, TransportError> {
        if let Some(guild_id) = self.cached_guild(channel_id) {
            return Ok(guild_id);
        }

        let channel = self.http.get_channel(channel_id).await.map_err(map_error)?;
        let guild_id = channel.guild().map(|c| c.guild_id).ok_or_else(|| {
            TransportError::NotFound(format!("channel {} is not in a guild", channel_id))
        })?;
        self.remember_guild(channel_id, guild_id);
        Ok(guild_id)
    }
}

fn parse_id(raw: &str) -> Result<u64, TransportError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| TransportError::InvalidId(raw.to_string()))
}

fn map_error(e: ::serenity::Error) -> TransportError {
    let status = match &e {
        ::serenity::Error::Http(http_error) => http_error.status_code().map(|s| s.as_u16()),
        _ => None,
    };

    match status {
        Some(403) => TransportError::PermissionDenied(e.to_string()),
        Some(404) => TransportError::NotFound(e.to_string()),
        _ => TransportError::Request(e.to_string()),
    }
}

/// Turn `@<id>` handles for the given users into Discord user mentions.
fn render_mentions(text: &str, mentions: &[String]) -> String {
    mentions.iter().fold(text.to_string(), |acc, id| {
        acc.replace(&format!("@{}", mention_handle(id)), &format!("<@{}>", id))
    })
}

#[async_trait]
impl ChatTransport for DiscordTransport {
    async fn send_message(
        &self,
        group_id: &str,
        message: OutgoingMessage,
    ) -> Result<(), TransportError> {
        let channel_id = serenity::ChannelId::new(parse_id(group_id)?);

        match message {
            OutgoingMessage::Delete { delete } => {
                let message_id = serenity::MessageId::new(parse_id(&delete.id)?);
                channel_id
                    .delete_message(&self.http, message_id)
                    .await
                    .map_err(map_error)
            }
            OutgoingMessage::Text { text, mentions } => {
                let user_ids = mentions
                    .iter()
                    .map(|id| parse_id(id).map(serenity::UserId::new))
                    .collect::<Result<Vec<_>, _>>()?;

                let builder = serenity::CreateMessage::new()
                    .content(render_mentions(&text, &mentions))
                    .allowed_mentions(serenity::CreateAllowedMentions::new().users(user_ids));

                channel_id
                    .send_message(&self.http, builder)
                    .await
                    .map(|_| ())
                    .map_err(map_error)
            }
        }
    }

    async fn fetch_group_metadata(&self, group_id: &str) -> Result<GroupRoster, TransportError> {
        let channel_id = serenity::ChannelId::new(parse_id(group_id)?);
        let guild_id = self.guild_of(channel_id).await?;

        let members = guild_id
            .members(&self.http, Some(MEMBER_PAGE_LIMIT), None::<serenity::UserId>)
            .await
            .map_err(map_error)?;

        Ok(GroupRoster {
            participants: members.iter().map(|m| m.user.id.get().to_string()).collect(),
        })
    }

    async fn remove_participants(
        &self,
        group_id: &str,
        participant_ids: &[String],
    ) -> Result<(), TransportError> {
        let channel_id = serenity::ChannelId::new(parse_id(group_id)?);
        let guild_id = self.guild_of(channel_id).await?;

        for participant in participant_ids {
            let user_id = serenity::UserId::new(parse_id(participant)?);
            guild_id
                .kick_with_reason(&self.http, user_id, KICK_REASON)
                .await
                .map_err(map_error)?;
        }
        Ok(())
    }
}

/// Convert a Discord message into an antitag message event.
///
/// The first image and video attachment descriptions stand in for captions.
pub fn message_event_from_discord(msg: &serenity::Message) -> MessageEvent {
    let caption_for = |kind: &str| {
        msg.attachments
            .iter()
            .find(|a| {
                a.content_type
                    .as_deref()
                    .is_some_and(|content_type| content_type.starts_with(kind))
            })
            .and_then(|a| a.description.clone())
    };

    MessageEvent {
        group_id: msg.channel_id.get().to_string(),
        sender_id: msg.author.id.get().to_string(),
        message_id: msg.id.get().to_string(),
        content: MessageContent {
            conversation: Some(msg.content.clone()),
            extended_text: None,
            image_caption: caption_for("image/"),
            video_caption: caption_for("video/"),
        },
        mentioned_ids: msg.mentions.iter().map(|u| u.id.get().to_string()).collect(),
    }
}
