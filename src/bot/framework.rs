use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GatewayIntents, GuildId, UserId};
use sqlx::PgPool;
use tracing::{error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::constants::embeds;
use crate::handlers::event_handler::event_handler;

pub async fn run(settings: Settings, pool: PgPool) -> Result<(), Error> {
    let data = Arc::new(Data::new(pool, settings.clone()));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            owners: settings.owner_ids.iter().copied().map(UserId::new).collect(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: None, // Slash commands only
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command {} failed: {:?}", ctx.command().name, error);
                            let embed = embeds::error_embed()
                                .title("Something Went Wrong")
                                .description(error.to_string());
                            let _ = ctx
                                .send(poise::CreateReply::default().embed(embed).ephemeral(true))
                                .await;
                        }
                        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
                            let _ = ctx.say(format!("Invalid argument: {}", error)).await;
                        }
                        poise::FrameworkError::NotAnOwner { ctx, .. } => {
                            let _ = ctx.say("Only bot owners can use this command.").await;
                        }
                        poise::FrameworkError::UnknownCommand { .. } => {}
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as {}", ready.user.name);

                // Register commands globally or per-guild based on GUILD_ID env var
                match data.settings.guild_id {
                    Some(guild_id) => {
                        let guild_id = GuildId::new(guild_id);
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await
                        .map_err(|e| {
                            error!("Failed to register guild commands in {}: {:?}", guild_id, e);
                            Error::Serenity(e)
                        })?;
                        info!(
                            "Registered {} commands in guild {}",
                            framework.options().commands.len(),
                            guild_id
                        );
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await
                            .map_err(|e| {
                                error!("Failed to register commands globally: {:?}", e);
                                Error::Serenity(e)
                            })?;
                        info!(
                            "Registered {} commands globally",
                            framework.options().commands.len()
                        );
                    }
                }

                Ok(data)
            })
        })
        .build();

    // Guild list and names come from the cache
    let intents = GatewayIntents::GUILDS;

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}
