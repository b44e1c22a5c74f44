use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Settings;
use crate::db::models::RaterAssignment;
use crate::db::PgStore;
use crate::services::gban::{GbanContext, GuildGateway, JobLocks};
use crate::services::rater_cache::RaterCache;

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    pub store: PgStore,
    /// Single-flight locks for bulk gban jobs
    pub job_locks: JobLocks,
    /// Trusted raters per channel
    pub rater_cache: RaterCache,
}

impl Data {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        Self {
            store: PgStore::new(pool),
            settings,
            job_locks: JobLocks::new(),
            rater_cache: RaterCache::new(),
        }
    }

    /// Bundle everything a gban operation needs around the given gateway
    pub fn gban_context<'a>(&'a self, gateway: &'a dyn GuildGateway) -> GbanContext<'a> {
        GbanContext {
            gateway,
            store: &self.store,
            locks: &self.job_locks,
            options: &self.settings.gban,
        }
    }

    /// Drop cached rater lists for channels a banned user was removed from
    pub fn evict_raters(&self, removed: &[RaterAssignment]) {
        self.rater_cache.evict(removed);
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("rater_cache_count", &self.rater_cache.len())
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
