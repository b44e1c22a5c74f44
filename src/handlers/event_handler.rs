use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::services::gban::registry;

pub async fn event_handler(
    _ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!("Bot ready as {}", data_about_bot.user.name);
        }

        FullEvent::GuildCreate { guild, .. } => {
            if let Err(e) = registry::register_guild(&data.store, guild.id).await {
                error!("Failed to register guild {}: {:?}", guild.id, e);
            }
        }

        FullEvent::GuildDelete { incomplete, .. } => {
            // Unavailable means an outage, not that the bot left
            if incomplete.unavailable {
                debug!("Guild {} became unavailable", incomplete.id);
            } else if let Err(e) = registry::forget_guild(&data.store, incomplete.id).await {
                error!("Failed to remove guild {}: {:?}", incomplete.id, e);
            }
        }

        _ => {}
    }

    Ok(())
}
