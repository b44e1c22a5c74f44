use chrono::Utc;
use serenity::all::{GuildId, UserId};
use tracing::{info, warn};

use crate::bot::error::Error;
use crate::db::models::{ModAction, ModlogEntry, ServerClass};
use crate::services::gban::{GbanContext, JobKind};

#[derive(Debug, Clone, Default)]
pub struct EnforceReport {
    /// Active ledger bans that were missing from the guild
    pub missing: usize,
    pub applied: usize,
    pub failed: Vec<UserId>,
}

impl EnforceReport {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("{} new bans were found.", self.applied);
        if !self.failed.is_empty() {
            let ids: Vec<String> = self.failed.iter().map(|id| id.to_string()).collect();
            summary.push_str(&format!(
                " I couldn't ban {} of them: {}",
                self.failed.len(),
                ids.join(", ")
            ));
        }
        summary
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriftReport {
    /// Ledger entries no longer banned in the reference guild, now marked lifted
    pub lifted: Vec<UserId>,
}

impl DriftReport {
    pub fn summary(&self) -> String {
        match self.lifted.len() {
            0 => "The ledger matches the reference server's ban list.".to_string(),
            n => format!("Marked {} global ban(s) as unbanned.", n),
        }
    }
}

/// Apply every active ledger ban the guild is missing.
///
/// Opted out guilds are refused before any Discord call is made.
pub async fn enforce(cx: &GbanContext<'_>, guild_id: GuildId) -> Result<EnforceReport, Error> {
    let class = cx
        .store
        .server_class(guild_id)
        .await?
        .unwrap_or(ServerClass::DEFAULT);
    if !class.participates() {
        return Err(Error::GbansNotEnforced(guild_id.get()));
    }

    let _job = cx
        .locks
        .acquire(JobKind::Enforce(guild_id), cx.options.job_failsafe)
        .await?;

    let live = cx.gateway.bans(guild_id).await?;
    let missing: Vec<_> = cx
        .store
        .active_global_bans()
        .await?
        .into_iter()
        .filter_map(|row| match row.target_id() {
            Some(target) => Some((target, row.reason)),
            None => {
                warn!("Ignoring ledger row with bad target {:?}", row.target);
                None
            }
        })
        .filter(|(target, _)| !live.contains(target))
        .collect();

    info!(
        "Enforcing {} missing global bans in guild {}",
        missing.len(),
        guild_id
    );

    let bot = cx.gateway.bot_id();
    let mut report = EnforceReport {
        missing: missing.len(),
        ..EnforceReport::default()
    };

    for (target, reason) in missing {
        match cx.gateway.ban(guild_id, target, &reason).await {
            Ok(()) => {
                let entry =
                    ModlogEntry::new(guild_id, bot, target, ModAction::Ban, &reason, Utc::now());
                cx.store.record_action(&entry).await?;
                report.applied += 1;
            }
            Err(e) => {
                warn!(
                    "Failed to enforce global ban of {} in guild {}: {:?}",
                    target, guild_id, e
                );
                report.failed.push(target);
            }
        }
    }

    Ok(report)
}

/// Mark ledger entries as lifted when the reference guild no longer bans them.
///
/// Only the one reference guild is consulted, so a user still banned
/// elsewhere is marked lifted all the same.
pub async fn detect_unbanned(cx: &GbanContext<'_>) -> Result<DriftReport, Error> {
    let reference = cx
        .options
        .reference_guild
        .map(GuildId::new)
        .ok_or_else(|| Error::ConfigNotFound("GBAN_REFERENCE_GUILD_ID".to_string()))?;

    let _job = cx
        .locks
        .acquire(JobKind::LedgerSync, cx.options.job_failsafe)
        .await?;

    let live = cx.gateway.bans(reference).await?;
    let drift: Vec<UserId> = cx
        .store
        .active_global_bans()
        .await?
        .iter()
        .filter_map(|row| row.target_id())
        .filter(|target| !live.contains(target))
        .collect();

    if !drift.is_empty() {
        let updated = cx.store.mark_unbanned(&drift).await?;
        info!(
            "Marked {} global bans as lifted (not banned in reference guild {})",
            updated, reference
        );
    }

    Ok(DriftReport { lifted: drift })
}
