use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, UserId};
use tracing::{debug, info, warn};

use crate::bot::error::Error;
use crate::constants::gban::provenance_window;
use crate::db::models::{GlobalBan, ModAction, ModlogEntry};
use crate::services::gban::{newest_per, GbanContext};
use crate::utils::formatting::join_names;

/// Outcome of lifting a global ban
#[derive(Debug, Clone, Default)]
pub struct UnbanReport {
    /// Guilds whose active ban was traced back to the global ban
    pub eligible: usize,
    /// Guilds with a bot ban that looks locally issued, left untouched
    pub kept_local: usize,
    pub unbanned: Vec<String>,
    pub failed: Vec<String>,
}

impl UnbanReport {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = match self.unbanned.len() {
            0 => "I didn't find any servers where this user's ban came from the global ban."
                .to_string(),
            n => format!("I have unbanned the user from {} server(s).", n),
        };

        if self.kept_local > 0 {
            summary.push_str(&format!(
                " {} server(s) have their own ban on this user, so I left those alone.",
                self.kept_local
            ));
        }
        if !self.failed.is_empty() {
            summary.push_str(&format!(
                " I had issues in: {}",
                join_names(&self.failed)
            ));
        }
        summary
    }
}

/// Whether a guild's active ban was caused by this ledger entry: it must have
/// been issued within the provenance window of the ledger timestamp (bounds
/// included) with exactly the same reason.
pub fn caused_by(ledger: &GlobalBan, entry: &ModlogEntry) -> bool {
    within_window(ledger.date, entry.date) && entry.reason == ledger.reason
}

fn within_window(issued_at: DateTime<Utc>, at: DateTime<Utc>) -> bool {
    let window = provenance_window();
    at >= issued_at - window && at <= issued_at + window
}

/// Lift a global ban only in the guilds where it was the global ban that put
/// it there. The ledger row is kept; re-propagating restores the bans.
///
/// Provenance is inferred from the bot's own modlog bans, so it is a best
/// effort. A guild whose moderators re-ban the user by hand after a previous
/// unban leaves no modlog row, and a later unban still matches the old bot
/// ban and lifts the hand-made one.
pub async fn unban(
    cx: &GbanContext<'_>,
    target: UserId,
    reason: &str,
) -> Result<UnbanReport, Error> {
    let ledger = cx
        .store
        .global_ban(target)
        .await?
        .ok_or(Error::NotGloballyBanned(target.get()))?;

    let bot = cx.gateway.bot_id();
    let history = cx.store.bans_by_executor(bot, target).await?;
    let active = newest_per(history, |entry| entry.serverid.clone());

    let (eligible, local): (Vec<ModlogEntry>, Vec<ModlogEntry>) =
        active.into_iter().partition(|entry| caused_by(&ledger, entry));

    info!(
        "Lifting global ban of {}: {} guilds eligible, {} with local bans",
        target,
        eligible.len(),
        local.len()
    );

    let names: HashMap<GuildId, String> = cx
        .gateway
        .guilds()
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();

    let mut report = UnbanReport {
        eligible: eligible.len(),
        kept_local: local.len(),
        ..UnbanReport::default()
    };

    for entry in eligible {
        let Some(guild_id) = entry.guild_id() else {
            warn!("Skipping modlog entry with bad server id {:?}", entry.serverid);
            continue;
        };
        let name = names
            .get(&guild_id)
            .cloned()
            .unwrap_or_else(|| guild_id.to_string());

        match cx.gateway.unban(guild_id, target, reason).await {
            Ok(()) => {
                let record =
                    ModlogEntry::new(guild_id, bot, target, ModAction::Unban, reason, Utc::now());
                cx.store.record_action(&record).await?;
                debug!("Unbanned {} in guild {}", target, guild_id);
                report.unbanned.push(name);
            }
            Err(e) => {
                warn!(
                    "Failed to lift global ban of {} in guild {}: {:?}",
                    target, guild_id, e
                );
                report.failed.push(name);
            }
        }
    }

    Ok(report)
}
