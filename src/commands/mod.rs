use std::sync::Arc;

use crate::bot::data::{Context, Data};
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::services::gban::command::{dispatch, CommandOutcome, GbanCommand};
use crate::services::gban::SerenityGateway;
use crate::utils::formatting::truncate;

/// Discord's limit for embed descriptions
const EMBED_DESCRIPTION_LIMIT: usize = 4096;

pub mod gban;
pub mod opt;
pub mod setup;
pub mod sync;

/// Every slash command the bot registers
pub fn all() -> Vec<poise::Command<Arc<Data>, Error>> {
    vec![
        gban::gban(),
        gban::gunban(),
        sync::syncgban(),
        sync::syncdb(),
        sync::popgban(),
        opt::opt(),
        setup::setup(),
    ]
}

/// Run a gban command against live Discord and reply with its outcome
pub(crate) async fn run_gban(ctx: Context<'_>, command: GbanCommand) -> Result<(), Error> {
    // Fan-out can take a while
    ctx.defer().await?;

    let gateway = SerenityGateway::new(ctx.serenity_context());
    let outcome = dispatch(&ctx.data().gban_context(&gateway), command).await?;
    ctx.data().evict_raters(&outcome.removed_raters);

    reply_outcome(ctx, outcome).await
}

async fn reply_outcome(ctx: Context<'_>, outcome: CommandOutcome) -> Result<(), Error> {
    let embed = if outcome.success {
        embeds::success_embed()
    } else {
        embeds::warning_embed()
    }
    .title(outcome.title)
    .description(truncate(&outcome.message, EMBED_DESCRIPTION_LIMIT));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
