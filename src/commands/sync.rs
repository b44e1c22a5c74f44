use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::run_gban;
use crate::services::gban::command::GbanCommand;

/// Apply every global ban this server is missing
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn syncgban(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    run_gban(ctx, GbanCommand::Enforce { guild_id }).await
}

/// What `syncdb` should bring up to date
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum SyncScope {
    #[name = "gban"]
    Gban,
}

/// Bring stored data in line with what Discord shows
#[poise::command(slash_command, owners_only)]
pub async fn syncdb(
    ctx: Context<'_>,
    #[description = "What to sync"] scope: SyncScope,
) -> Result<(), Error> {
    match scope {
        SyncScope::Gban => run_gban(ctx, GbanCommand::DetectUnbanned).await,
    }
}

/// Fill the global ban ledger from past bans in the reference server
#[poise::command(slash_command, owners_only)]
pub async fn popgban(ctx: Context<'_>) -> Result<(), Error> {
    run_gban(ctx, GbanCommand::Import).await
}
