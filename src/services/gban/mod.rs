//! Global ban propagation and reconciliation.
//!
//! Every operation runs against the [`GuildGateway`] and [`GbanStore`] seams
//! bundled in a [`GbanContext`], so the command layer only picks which one to
//! call.

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::GbanOptions;
use crate::db::models::ModlogEntry;
use crate::db::GbanStore;

pub mod command;
pub mod gateway;
pub mod importer;
pub mod job_lock;
pub mod propagator;
pub mod reconciler;
pub mod registry;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{GuildGateway, GuildInfo, SerenityGateway};
pub use job_lock::{JobKind, JobLocks};

/// Everything a gban operation needs
pub struct GbanContext<'a> {
    pub gateway: &'a dyn GuildGateway,
    pub store: &'a dyn GbanStore,
    pub locks: &'a JobLocks,
    pub options: &'a GbanOptions,
}

/// Keep only the newest modlog entry per key. Output is newest first.
///
/// The newest ban per guild (or per target) is taken to be the one currently
/// in force, since the ledger doesn't track per-guild state.
pub(crate) fn newest_per<K, F>(entries: Vec<ModlogEntry>, key: F) -> Vec<ModlogEntry>
where
    K: Eq + Hash,
    F: Fn(&ModlogEntry) -> K,
{
    let mut newest: HashMap<K, ModlogEntry> = HashMap::new();
    for entry in entries {
        match newest.get(&key(&entry)) {
            Some(kept) if kept.date >= entry.date => {}
            _ => {
                newest.insert(key(&entry), entry);
            }
        }
    }

    let mut reduced: Vec<ModlogEntry> = newest.into_values().collect();
    reduced.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.serverid.cmp(&b.serverid)));
    reduced
}
