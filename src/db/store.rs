//! Storage seam for the global ban services.
//!
//! The services only talk to the ledger, modlog and server registry through
//! [`GbanStore`], so they can run against PostgreSQL in production and an
//! in-memory store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, UserId};
use sqlx::PgPool;

use crate::bot::error::Error;
use crate::db::models::{GlobalBan, ModlogEntry, RaterAssignment, ServerClass};
use crate::db::queries::{gbans, log_channel, modlog, raters, servers};
use crate::utils::ids::snowflake;

#[async_trait]
pub trait GbanStore: Send + Sync {
    /// Stored class of a guild, if it has a record
    async fn server_class(&self, guild_id: GuildId) -> Result<Option<ServerClass>, Error>;

    /// Create a record with the given class unless one exists
    async fn register_server(&self, guild_id: GuildId, class: ServerClass) -> Result<bool, Error>;

    /// Raise a guild's class, never lowering it. Returns true if it changed.
    async fn raise_server_class(&self, guild_id: GuildId, class: ServerClass)
        -> Result<bool, Error>;

    async fn set_server_class(&self, guild_id: GuildId, class: ServerClass) -> Result<(), Error>;

    async fn remove_server(&self, guild_id: GuildId) -> Result<bool, Error>;

    /// Moderation-log channel configured for a guild
    async fn log_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>, Error>;

    async fn set_log_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error>;

    async fn global_ban(&self, target: UserId) -> Result<Option<GlobalBan>, Error>;

    /// Ledger rows with `unbanned = false`
    async fn active_global_bans(&self) -> Result<Vec<GlobalBan>, Error>;

    async fn upsert_global_ban(
        &self,
        target: UserId,
        reason: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), Error>;

    async fn upsert_global_bans(&self, rows: &[GlobalBan]) -> Result<u64, Error>;

    async fn mark_unbanned(&self, targets: &[UserId]) -> Result<u64, Error>;

    async fn record_action(&self, entry: &ModlogEntry) -> Result<(), Error>;

    /// Modlog bans `executor` issued against `target`, newest first
    async fn bans_by_executor(
        &self,
        executor: UserId,
        target: UserId,
    ) -> Result<Vec<ModlogEntry>, Error>;

    /// Modlog bans `executor` issued against any of `targets`, newest first
    async fn bans_by_executor_for(
        &self,
        executor: UserId,
        targets: &[UserId],
    ) -> Result<Vec<ModlogEntry>, Error>;

    /// User ids trusted to rate submissions in a channel
    async fn channel_raters(&self, channel_id: ChannelId) -> Result<Vec<String>, Error>;

    /// Drop a user from every trusted rater assignment
    async fn remove_rater(&self, user: UserId) -> Result<Vec<RaterAssignment>, Error>;
}

/// PostgreSQL implementation of [`GbanStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn id_strings(ids: &[UserId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[async_trait]
impl GbanStore for PgStore {
    async fn server_class(&self, guild_id: GuildId) -> Result<Option<ServerClass>, Error> {
        let record = servers::get(&self.pool, &guild_id.to_string()).await?;
        Ok(record.map(|r| r.class()))
    }

    async fn register_server(&self, guild_id: GuildId, class: ServerClass) -> Result<bool, Error> {
        Ok(servers::register(&self.pool, &guild_id.to_string(), class.as_i16()).await?)
    }

    async fn raise_server_class(
        &self,
        guild_id: GuildId,
        class: ServerClass,
    ) -> Result<bool, Error> {
        Ok(servers::raise_class(&self.pool, &guild_id.to_string(), class.as_i16()).await?)
    }

    async fn set_server_class(&self, guild_id: GuildId, class: ServerClass) -> Result<(), Error> {
        Ok(servers::set_class(&self.pool, &guild_id.to_string(), class.as_i16()).await?)
    }

    async fn remove_server(&self, guild_id: GuildId) -> Result<bool, Error> {
        Ok(servers::delete(&self.pool, &guild_id.to_string()).await?)
    }

    async fn log_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>, Error> {
        let channel = log_channel::get(&self.pool, &guild_id.to_string()).await?;
        Ok(channel.as_deref().and_then(snowflake).map(ChannelId::new))
    }

    async fn set_log_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error> {
        Ok(log_channel::set(&self.pool, &guild_id.to_string(), &channel_id.to_string()).await?)
    }

    async fn global_ban(&self, target: UserId) -> Result<Option<GlobalBan>, Error> {
        Ok(gbans::get(&self.pool, &target.to_string()).await?)
    }

    async fn active_global_bans(&self) -> Result<Vec<GlobalBan>, Error> {
        Ok(gbans::list_active(&self.pool).await?)
    }

    async fn upsert_global_ban(
        &self,
        target: UserId,
        reason: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        Ok(gbans::upsert(&self.pool, &target.to_string(), reason, issued_at).await?)
    }

    async fn upsert_global_bans(&self, rows: &[GlobalBan]) -> Result<u64, Error> {
        Ok(gbans::upsert_many(&self.pool, rows).await?)
    }

    async fn mark_unbanned(&self, targets: &[UserId]) -> Result<u64, Error> {
        Ok(gbans::mark_unbanned(&self.pool, &id_strings(targets)).await?)
    }

    async fn record_action(&self, entry: &ModlogEntry) -> Result<(), Error> {
        Ok(modlog::create(&self.pool, entry).await?)
    }

    async fn bans_by_executor(
        &self,
        executor: UserId,
        target: UserId,
    ) -> Result<Vec<ModlogEntry>, Error> {
        Ok(modlog::bans_for_target(&self.pool, &executor.to_string(), &target.to_string()).await?)
    }

    async fn bans_by_executor_for(
        &self,
        executor: UserId,
        targets: &[UserId],
    ) -> Result<Vec<ModlogEntry>, Error> {
        Ok(
            modlog::bans_for_targets(&self.pool, &executor.to_string(), &id_strings(targets))
                .await?,
        )
    }

    async fn channel_raters(&self, channel_id: ChannelId) -> Result<Vec<String>, Error> {
        Ok(raters::for_channel(&self.pool, &channel_id.to_string()).await?)
    }

    async fn remove_rater(&self, user: UserId) -> Result<Vec<RaterAssignment>, Error> {
        Ok(raters::remove_user(&self.pool, &user.to_string()).await?)
    }
}
