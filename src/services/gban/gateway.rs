use std::collections::HashSet;

use async_trait::async_trait;
use serenity::all::{ChannelId, Context, CreateEmbed, CreateMessage, GuildId, UserId};
use serenity::http::{HttpError, UserPagination};
use tracing::debug;

use crate::bot::error::Error;

/// A guild the bot is a member of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildInfo {
    pub id: GuildId,
    pub name: String,
}

/// The Discord operations the global ban services rely on
#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// The bot's own user id, used as the modlog executor
    fn bot_id(&self) -> UserId;

    /// Every guild the bot currently belongs to
    async fn guilds(&self) -> Result<Vec<GuildInfo>, Error>;

    /// Ban without deleting any message history
    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<(), Error>;

    async fn unban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<(), Error>;

    /// The guild's complete live ban list
    async fn bans(&self, guild_id: GuildId) -> Result<HashSet<UserId>, Error>;

    /// Whether Discord knows this user at all
    async fn user_exists(&self, user_id: UserId) -> Result<bool, Error>;

    async fn send_embed(&self, channel_id: ChannelId, embed: CreateEmbed) -> Result<(), Error>;
}

/// [`GuildGateway`] backed by a live serenity client
#[derive(Clone)]
pub struct SerenityGateway {
    ctx: Context,
}

impl SerenityGateway {
    pub fn new(ctx: &Context) -> Self {
        Self { ctx: ctx.clone() }
    }
}

fn is_not_found(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            response.status_code.as_u16() == 404
        }
        _ => false,
    }
}

#[async_trait]
impl GuildGateway for SerenityGateway {
    fn bot_id(&self) -> UserId {
        self.ctx.cache.current_user().id
    }

    async fn guilds(&self) -> Result<Vec<GuildInfo>, Error> {
        let mut guilds: Vec<GuildInfo> = self
            .ctx
            .cache
            .guilds()
            .into_iter()
            .map(|id| {
                let name = self
                    .ctx
                    .cache
                    .guild(id)
                    .map(|g| g.name.clone())
                    .unwrap_or_else(|| id.to_string());
                GuildInfo { id, name }
            })
            .collect();

        // Stable order so failure reports read the same between runs
        guilds.sort_by_key(|g| g.id);
        Ok(guilds)
    }

    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<(), Error> {
        self.ctx
            .http
            .ban_user(guild_id, user_id, 0, Some(reason))
            .await?;
        Ok(())
    }

    async fn unban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<(), Error> {
        self.ctx
            .http
            .remove_ban(guild_id, user_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn bans(&self, guild_id: GuildId) -> Result<HashSet<UserId>, Error> {
        let mut banned = HashSet::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = self
                .ctx
                .http
                .get_bans(guild_id, after.map(UserPagination::After), None)
                .await?;

            let Some(last) = page.last() else { break };
            after = Some(last.user.id);
            banned.extend(page.iter().map(|ban| ban.user.id));
        }

        debug!("Fetched {} bans for guild {}", banned.len(), guild_id);
        Ok(banned)
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool, Error> {
        match self.ctx.http.get_user(user_id).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(Error::Serenity(e)),
        }
    }

    async fn send_embed(&self, channel_id: ChannelId, embed: CreateEmbed) -> Result<(), Error> {
        channel_id
            .send_message(&self.ctx, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}
