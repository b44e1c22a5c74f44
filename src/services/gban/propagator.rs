use std::collections::HashSet;

use chrono::Utc;
use futures::{stream, StreamExt, TryStreamExt};
use serenity::all::{GuildId, UserId};
use tracing::{debug, error, info, warn};

use crate::bot::error::Error;
use crate::constants::embeds;
use crate::db::models::{ModAction, ModlogEntry, RaterAssignment, ServerClass};
use crate::services::gban::{GbanContext, GuildInfo, JobKind};
use crate::utils::formatting::join_names;
use crate::utils::ids::parse_user_ids;

/// Result of fanning one ban out to every participating guild
#[derive(Debug, Clone, Default)]
pub struct PropagationReport {
    /// Guilds a ban was attempted in
    pub attempted: usize,
    /// Guilds skipped because they opted out
    pub skipped: usize,
    /// Names of guilds where the ban failed, in guild order
    pub failed: Vec<String>,
    /// Rater assignments the target lost; their caches need evicting
    pub removed_raters: Vec<RaterAssignment>,
}

impl PropagationReport {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.succeeded() {
            "I have banned the user from every server I am in.".to_string()
        } else {
            format!(
                "I have banned the user from every server I am in, but I had issues in: {}",
                join_names(&self.failed)
            )
        }
    }
}

/// Result of a batch ban, one report per target in input order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub reports: Vec<(UserId, PropagationReport)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> bool {
        self.reports.iter().all(|(_, r)| r.succeeded())
    }

    pub fn removed_raters(&self) -> impl Iterator<Item = &RaterAssignment> {
        self.reports.iter().flat_map(|(_, r)| r.removed_raters.iter())
    }

    pub fn summary(&self) -> String {
        let troubled: Vec<String> = self
            .reports
            .iter()
            .filter(|(_, r)| !r.succeeded())
            .map(|(target, r)| format!("{} ({})", target, join_names(&r.failed)))
            .collect();

        if troubled.is_empty() {
            format!(
                "I have banned {} users from every server I am in.",
                self.reports.len()
            )
        } else {
            format!(
                "I have banned {} users from every server I am in, but I had issues with: {}",
                self.reports.len(),
                troubled.join("; ")
            )
        }
    }
}

enum GuildOutcome {
    Banned,
    Failed(String),
}

/// Ban `target` everywhere it is allowed, then record the ban in the ledger.
///
/// A failing guild never stops the fan-out. Storage errors do, and leave any
/// guilds already processed banned.
pub async fn propagate(
    cx: &GbanContext<'_>,
    target: UserId,
    reason: &str,
) -> Result<PropagationReport, Error> {
    let issued_at = Utc::now();
    let bot = cx.gateway.bot_id();
    let (guilds, skipped) = participating_guilds(cx).await?;

    info!(
        "Propagating global ban of {} to {} guilds ({} opted out)",
        target,
        guilds.len(),
        skipped
    );

    // Built up front so the stream holds concrete futures rather than a
    // borrowing closure, which keeps the whole command future Send.
    let pending: Vec<_> = guilds
        .iter()
        .map(|guild| ban_in_guild(cx, guild, bot, target, reason))
        .collect();
    let outcomes: Vec<GuildOutcome> = stream::iter(pending)
        .buffered(cx.options.fan_out_width.max(1))
        .try_collect()
        .await?;

    let failed: Vec<String> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            GuildOutcome::Banned => None,
            GuildOutcome::Failed(name) => Some(name),
        })
        .collect();

    {
        // A drift pass compares the ledger with a ban list it fetched earlier;
        // writing the row mid-pass would get it marked lifted right away.
        let _ledger = cx
            .locks
            .acquire(JobKind::LedgerSync, cx.options.job_failsafe)
            .await?;
        cx.store.upsert_global_ban(target, reason, issued_at).await?;
    }
    let removed_raters = cx.store.remove_rater(target).await?;

    if failed.is_empty() {
        info!("Globally banned {} in {} guilds", target, guilds.len());
    } else {
        warn!(
            "Globally banned {} with {} failures: {}",
            target,
            failed.len(),
            join_names(&failed)
        );
    }

    Ok(PropagationReport {
        attempted: guilds.len(),
        skipped,
        failed,
        removed_raters,
    })
}

/// Ban a list of raw ids. Every id is validated before anything is sent to
/// Discord, and one unknown user aborts the whole batch.
pub async fn propagate_batch<S: AsRef<str>>(
    cx: &GbanContext<'_>,
    raw_ids: &[S],
    reason: &str,
) -> Result<BatchReport, Error> {
    let parsed = parse_user_ids(raw_ids)?;
    if parsed.is_empty() {
        return Err(Error::custom("No user ids were supplied."));
    }

    let mut seen = HashSet::new();
    let targets: Vec<UserId> = parsed.into_iter().filter(|id| seen.insert(*id)).collect();

    for target in &targets {
        if !cx.gateway.user_exists(*target).await? {
            warn!("Aborting batch global ban: unknown user {}", target);
            return Err(Error::UserNotFound(target.get()));
        }
    }

    let mut report = BatchReport::default();
    for target in targets {
        let single = propagate(cx, target, reason).await?;
        report.reports.push((target, single));
    }

    Ok(report)
}

/// Guilds the bot is in whose class allows global bans, plus how many were skipped
async fn participating_guilds(cx: &GbanContext<'_>) -> Result<(Vec<GuildInfo>, usize), Error> {
    let mut participating = Vec::new();
    let mut skipped = 0;

    for guild in cx.gateway.guilds().await? {
        let class = cx
            .store
            .server_class(guild.id)
            .await?
            .unwrap_or(ServerClass::DEFAULT);

        if class.participates() {
            participating.push(guild);
        } else {
            debug!("Skipping opted out guild {}", guild.id);
            skipped += 1;
        }
    }

    Ok((participating, skipped))
}

async fn ban_in_guild(
    cx: &GbanContext<'_>,
    guild: &GuildInfo,
    bot: UserId,
    target: UserId,
    reason: &str,
) -> Result<GuildOutcome, Error> {
    match cx.gateway.ban(guild.id, target, reason).await {
        Ok(()) => {
            let entry =
                ModlogEntry::new(guild.id, bot, target, ModAction::Ban, reason, Utc::now());
            cx.store.record_action(&entry).await?;
            debug!("Banned {} in guild {}", target, guild.id);
            Ok(GuildOutcome::Banned)
        }
        Err(e) => {
            warn!(
                "Failed to globally ban {} in guild {} ({}): {:?}",
                target, guild.name, guild.id, e
            );
            alert_log_channel(cx, guild.id, target, reason).await;
            Ok(GuildOutcome::Failed(guild.name.clone()))
        }
    }
}

/// Best effort: tell the guild's moderators a global ban didn't land.
/// Failures here are only reported to the log.
async fn alert_log_channel(cx: &GbanContext<'_>, guild_id: GuildId, target: UserId, reason: &str) {
    let channel_id = match cx.store.log_channel(guild_id).await {
        Ok(Some(channel_id)) => channel_id,
        Ok(None) => return,
        Err(e) => {
            error!("Failed to look up log channel for guild {}: {:?}", guild_id, e);
            return;
        }
    };

    if let Err(e) = cx
        .gateway
        .send_embed(channel_id, embeds::failed_ban_alert(target, reason))
        .await
    {
        error!(
            "Failed to post ban failure alert to channel {} in guild {}: {:?}",
            channel_id, guild_id, e
        );
    }
}
