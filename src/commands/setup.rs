use poise::serenity_prelude::Channel;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::db::GbanStore;
use crate::utils::formatting::mention_channel;

/// Setup commands for configuring the bot
#[poise::command(
    slash_command,
    subcommands("logchannel"),
    subcommand_required,
    required_permissions = "ADMINISTRATOR",
    guild_only
)]
pub async fn setup(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Set the channel where failed global bans are reported
#[poise::command(slash_command, guild_only)]
pub async fn logchannel(
    ctx: Context<'_>,
    #[description = "Moderation log channel"]
    #[channel_types("Text")]
    channel: Channel,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;

    ctx.data()
        .store
        .set_log_channel(guild_id, channel.id())
        .await?;

    let embed = embeds::success_embed()
        .title("Log Channel Set")
        .description(format!(
            "Global ban alerts will be posted in {}",
            mention_channel(channel.id().get())
        ));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}
