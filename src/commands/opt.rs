use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::run_gban;
use crate::services::gban::command::GbanCommand;

/// Choose whether this server receives global bans
#[poise::command(
    slash_command,
    subcommands("opt_in", "opt_out"),
    subcommand_required,
    required_permissions = "ADMINISTRATOR",
    guild_only
)]
pub async fn opt(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Receive global bans in this server
#[poise::command(slash_command, rename = "in", guild_only)]
pub async fn opt_in(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    run_gban(ctx, GbanCommand::OptIn { guild_id }).await
}

/// Stop receiving global bans in this server
#[poise::command(slash_command, rename = "out", guild_only)]
pub async fn opt_out(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    run_gban(ctx, GbanCommand::OptOut { guild_id }).await
}
