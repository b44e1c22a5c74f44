use serenity::all::{GuildId, UserId};
use tracing::{info, warn};

use crate::bot::error::Error;
use crate::db::models::GlobalBan;
use crate::services::gban::{newest_per, GbanContext, JobKind};

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Users banned in the reference guild
    pub live: usize,
    /// Ledger rows written
    pub imported: usize,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        format!(
            "Imported {} global ban(s) from {} ban(s) in the reference server.",
            self.imported, self.live
        )
    }
}

/// Seed the ledger from the bot's own modlog bans of users that are still
/// banned in the reference guild. Re-running it against a consistent ledger
/// changes nothing.
pub async fn import(cx: &GbanContext<'_>) -> Result<ImportReport, Error> {
    let reference = cx
        .options
        .reference_guild
        .map(GuildId::new)
        .ok_or_else(|| Error::ConfigNotFound("GBAN_REFERENCE_GUILD_ID".to_string()))?;

    let _job = cx
        .locks
        .acquire(JobKind::LedgerSync, cx.options.job_failsafe)
        .await?;

    let live: Vec<UserId> = cx.gateway.bans(reference).await?.into_iter().collect();
    let bot = cx.gateway.bot_id();
    let history = cx.store.bans_by_executor_for(bot, &live).await?;

    let rows: Vec<GlobalBan> = newest_per(history, |entry| entry.target.clone())
        .into_iter()
        .filter_map(|entry| match entry.target_id() {
            Some(target) => Some(GlobalBan::new(target, &entry.reason, entry.date)),
            None => {
                warn!("Skipping modlog entry with bad target {:?}", entry.target);
                None
            }
        })
        .collect();

    let imported = cx.store.upsert_global_bans(&rows).await?;
    info!(
        "Imported {} global bans from {} live bans in reference guild {}",
        imported,
        live.len(),
        reference
    );

    Ok(ImportReport {
        live: live.len(),
        imported: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tokio_test::assert_ok;

    use super::*;
    use crate::config::GbanOptions;
    use crate::services::gban::testing::{FakeGateway, FakeStore};
    use crate::services::gban::JobLocks;

    const REFERENCE: u64 = 10;

    #[tokio::test]
    async fn test_import_keeps_newest_ban_per_target() {
        let now = Utc::now();
        let gateway = FakeGateway::with_guilds(&[(REFERENCE, "Alpha")]);
        gateway.set_banned(REFERENCE, 500);
        gateway.set_banned(REFERENCE, 600);
        let store = FakeStore::default();
        store.seed_bot_ban(REFERENCE, 500, "first", now - Duration::days(30));
        store.seed_bot_ban(20, 500, "third", now - Duration::days(1));
        store.seed_bot_ban(REFERENCE, 500, "second", now - Duration::days(10));
        // Banned by hand, never by the bot: nothing to import
        gateway.set_banned(REFERENCE, 700);
        // In the modlog but no longer banned in the reference guild
        store.seed_bot_ban(REFERENCE, 800, "old", now - Duration::days(3));
        store.seed_bot_ban(REFERENCE, 600, "alts", now - Duration::days(2));

        let locks = JobLocks::new();
        let options = GbanOptions {
            reference_guild: Some(REFERENCE),
            ..GbanOptions::default()
        };
        let cx = GbanContext {
            gateway: &gateway,
            store: &store,
            locks: &locks,
            options: &options,
        };

        let report = assert_ok!(import(&cx).await);

        assert_eq!(report.live, 3);
        assert_eq!(report.imported, 2);
        assert_eq!(store.gban_count(), 2);
        let row = store.gban(500).unwrap();
        assert_eq!(row.reason, "third");
        assert_eq!(row.date, now - Duration::days(1));
        assert_eq!(store.gban(600).unwrap().reason, "alts");
        assert!(store.gban(800).is_none());

        // Second run leaves the ledger as it was
        assert_ok!(import(&cx).await);
        assert_eq!(store.gban_count(), 2);
        assert_eq!(store.gban(500).unwrap().reason, "third");
    }

    #[tokio::test]
    async fn test_import_needs_reference_guild() {
        let gateway = FakeGateway::default();
        let store = FakeStore::default();
        let locks = JobLocks::new();
        let options = GbanOptions::default();
        let cx = GbanContext {
            gateway: &gateway,
            store: &store,
            locks: &locks,
            options: &options,
        };

        assert!(matches!(import(&cx).await, Err(Error::ConfigNotFound(_))));
        assert_eq!(store.writes(), 0);
    }
}
