use serenity::all::GuildId;
use tracing::{debug, info};

use crate::bot::error::Error;
use crate::db::models::ServerClass;
use crate::db::GbanStore;

/// Record a guild the bot just joined without touching an existing record
pub async fn register_guild(store: &dyn GbanStore, guild_id: GuildId) -> Result<(), Error> {
    if store.register_server(guild_id, ServerClass::DEFAULT).await? {
        info!(
            "Registered guild {} as {}",
            guild_id,
            ServerClass::DEFAULT.label()
        );
    }
    Ok(())
}

/// Forget a guild the bot has left
pub async fn forget_guild(store: &dyn GbanStore, guild_id: GuildId) -> Result<(), Error> {
    if store.remove_server(guild_id).await? {
        info!("Removed server record for guild {}", guild_id);
    }
    Ok(())
}

/// Current class of a guild, falling back to the default for unknown guilds
pub async fn class_of(store: &dyn GbanStore, guild_id: GuildId) -> Result<ServerClass, Error> {
    Ok(store
        .server_class(guild_id)
        .await?
        .unwrap_or(ServerClass::DEFAULT))
}

/// Opt a guild into global bans. Never lowers an official guild.
pub async fn opt_in(store: &dyn GbanStore, guild_id: GuildId) -> Result<ServerClass, Error> {
    let changed = store.raise_server_class(guild_id, ServerClass::OptIn).await?;
    debug!("Opt-in for guild {} (changed: {})", guild_id, changed);
    class_of(store, guild_id).await
}

/// Opt a guild out of global bans. Official guilds can't opt out.
pub async fn opt_out(store: &dyn GbanStore, guild_id: GuildId) -> Result<ServerClass, Error> {
    if class_of(store, guild_id).await? == ServerClass::Official {
        return Err(Error::OfficialOptOut);
    }

    store.set_server_class(guild_id, ServerClass::OptOut).await?;
    info!("Guild {} opted out of global bans", guild_id);
    Ok(ServerClass::OptOut)
}
