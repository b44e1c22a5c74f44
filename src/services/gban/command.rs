//! Typed entry point for every gban command.
//!
//! Slash commands parse their options into a [`GbanCommand`] and hand it to
//! [`dispatch`]; nothing here knows about poise.

use serenity::all::{GuildId, UserId};
use tracing::info;

use crate::bot::error::Error;
use crate::constants::gban::{DEFAULT_BAN_REASON, DEFAULT_UNBAN_REASON, FORUM_BAN_REASON};
use crate::db::models::RaterAssignment;
use crate::services::gban::{importer, propagator, reconciler, registry, resolver, GbanContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GbanCommand {
    BanUser {
        target: UserId,
        reason: Option<String>,
    },
    BanGroup {
        ids: Vec<String>,
        reason: Option<String>,
    },
    Unban {
        target: UserId,
        reason: Option<String>,
    },
    Enforce {
        guild_id: GuildId,
    },
    DetectUnbanned,
    Import,
    OptIn {
        guild_id: GuildId,
    },
    OptOut {
        guild_id: GuildId,
    },
}

impl GbanCommand {
    pub fn name(&self) -> &'static str {
        match self {
            GbanCommand::BanUser { .. } => "gban user",
            GbanCommand::BanGroup { .. } => "gban group",
            GbanCommand::Unban { .. } => "gunban",
            GbanCommand::Enforce { .. } => "syncgban",
            GbanCommand::DetectUnbanned => "syncdb",
            GbanCommand::Import => "popgban",
            GbanCommand::OptIn { .. } => "opt in",
            GbanCommand::OptOut { .. } => "opt out",
        }
    }
}

/// What to tell the invoker
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub title: &'static str,
    pub message: String,
    /// False when the command finished but some guilds or targets failed
    pub success: bool,
    /// Rater assignments removed by a ban; the caller evicts their caches
    pub removed_raters: Vec<RaterAssignment>,
}

impl CommandOutcome {
    fn new(title: &'static str, message: String, success: bool) -> Self {
        Self {
            title,
            message,
            success,
            removed_raters: Vec::new(),
        }
    }
}

fn reason_or<'a>(reason: &'a Option<String>, default: &'a str) -> &'a str {
    reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(default)
}

pub async fn dispatch(
    cx: &GbanContext<'_>,
    command: GbanCommand,
) -> Result<CommandOutcome, Error> {
    info!("Running {}", command.name());

    let outcome = match command {
        GbanCommand::BanUser { target, reason } => {
            let reason = reason_or(&reason, DEFAULT_BAN_REASON);
            let report = propagator::propagate(cx, target, reason).await?;
            CommandOutcome {
                removed_raters: report.removed_raters.clone(),
                ..CommandOutcome::new("User Globally Banned", report.summary(), report.succeeded())
            }
        }
        GbanCommand::BanGroup { ids, reason } => {
            let reason = reason_or(&reason, FORUM_BAN_REASON);
            let report = propagator::propagate_batch(cx, &ids, reason).await?;
            CommandOutcome {
                removed_raters: report.removed_raters().cloned().collect(),
                ..CommandOutcome::new("Users Globally Banned", report.summary(), report.succeeded())
            }
        }
        GbanCommand::Unban { target, reason } => {
            let reason = reason_or(&reason, DEFAULT_UNBAN_REASON);
            let report = resolver::unban(cx, target, reason).await?;
            CommandOutcome::new("Global Ban Lifted", report.summary(), report.succeeded())
        }
        GbanCommand::Enforce { guild_id } => {
            let report = reconciler::enforce(cx, guild_id).await?;
            CommandOutcome::new("Global Bans Synced", report.summary(), report.succeeded())
        }
        GbanCommand::DetectUnbanned => {
            let report = reconciler::detect_unbanned(cx).await?;
            CommandOutcome::new("Ledger Synced", report.summary(), true)
        }
        GbanCommand::Import => {
            let report = importer::import(cx).await?;
            CommandOutcome::new("Ledger Populated", report.summary(), true)
        }
        GbanCommand::OptIn { guild_id } => {
            let class = registry::opt_in(cx.store, guild_id).await?;
            CommandOutcome::new(
                "Opted In",
                format!(
                    "This server is now {} and will receive global bans.",
                    class.label()
                ),
                true,
            )
        }
        GbanCommand::OptOut { guild_id } => {
            registry::opt_out(cx.store, guild_id).await?;
            CommandOutcome::new(
                "Opted Out",
                "This server will no longer receive global bans.".to_string(),
                true,
            )
        }
    };

    Ok(outcome)
}
