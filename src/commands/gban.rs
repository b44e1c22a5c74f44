use poise::serenity_prelude::User;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::run_gban;
use crate::services::gban::command::GbanCommand;
use crate::utils::ids::{parse_user_id, split_id_list};

/// Ban users from every server the bot is in
#[poise::command(
    slash_command,
    subcommands("user", "group"),
    subcommand_required,
    owners_only
)]
pub async fn gban(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Globally ban a single user
#[poise::command(slash_command, owners_only)]
pub async fn user(
    ctx: Context<'_>,
    #[description = "User to ban"] user: User,
    #[description = "Reason for the ban"] reason: Option<String>,
) -> Result<(), Error> {
    run_gban(
        ctx,
        GbanCommand::BanUser {
            target: user.id,
            reason,
        },
    )
    .await
}

/// Globally ban a list of user ids
#[poise::command(slash_command, owners_only)]
pub async fn group(
    ctx: Context<'_>,
    #[description = "User ids separated by spaces or commas"] ids: String,
    #[description = "Reason for the bans"] reason: Option<String>,
) -> Result<(), Error> {
    run_gban(
        ctx,
        GbanCommand::BanGroup {
            ids: split_id_list(&ids),
            reason,
        },
    )
    .await
}

/// Lift a global ban where it was the global ban that put it there
#[poise::command(slash_command, owners_only)]
pub async fn gunban(
    ctx: Context<'_>,
    #[description = "Id of the user to unban"] user_id: String,
    #[description = "Reason for the unban"] reason: Option<String>,
) -> Result<(), Error> {
    let target = parse_user_id(&user_id)?;
    run_gban(ctx, GbanCommand::Unban { target, reason }).await
}
