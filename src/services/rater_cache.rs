use dashmap::DashMap;
use serenity::all::ChannelId;
use tracing::debug;

use crate::bot::error::Error;
use crate::db::models::RaterAssignment;
use crate::db::GbanStore;

/// Trusted raters per channel, loaded from the `raters` table on first use.
///
/// A global ban removes the target's assignments; the affected channels are
/// evicted so the next lookup reloads them.
#[derive(Default)]
pub struct RaterCache {
    channels: DashMap<String, Vec<String>>,
}

impl RaterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// User ids trusted to rate submissions in `channel_id`
    pub async fn raters_for(
        &self,
        store: &dyn GbanStore,
        channel_id: ChannelId,
    ) -> Result<Vec<String>, Error> {
        let key = channel_id.to_string();
        if let Some(cached) = self.channels.get(&key) {
            return Ok(cached.clone());
        }

        let raters = store.channel_raters(channel_id).await?;
        debug!("Loaded {} raters for channel {}", raters.len(), channel_id);
        self.channels.insert(key, raters.clone());
        Ok(raters)
    }

    pub fn evict(&self, removed: &[RaterAssignment]) {
        for assignment in removed {
            if self.channels.remove(&assignment.channelid).is_some() {
                debug!("Evicted rater cache for channel {}", assignment.channelid);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::UserId;
    use tokio_test::assert_ok;

    use super::*;
    use crate::config::GbanOptions;
    use crate::services::gban::testing::{FakeGateway, FakeStore};
    use crate::services::gban::{propagator, GbanContext, JobLocks};

    const CHANNEL: u64 = 900;

    #[tokio::test]
    async fn test_lookup_is_cached_until_evicted() {
        let store = FakeStore::default();
        store.seed_rater(55, "900", "ou");
        let cache = RaterCache::new();

        let first = assert_ok!(cache.raters_for(&store, ChannelId::new(CHANNEL)).await);
        assert_eq!(first, vec!["55".to_string()]);

        // Not visible until the channel is evicted
        store.seed_rater(66, "900", "ubers");
        let cached = assert_ok!(cache.raters_for(&store, ChannelId::new(CHANNEL)).await);
        assert_eq!(cached, vec!["55".to_string()]);

        cache.evict(&[RaterAssignment {
            userid: "55".to_string(),
            channelid: "900".to_string(),
            meta: "ou".to_string(),
        }]);
        assert!(cache.is_empty());
        let reloaded = assert_ok!(cache.raters_for(&store, ChannelId::new(CHANNEL)).await);
        assert_eq!(reloaded, vec!["55".to_string(), "66".to_string()]);
    }

    #[tokio::test]
    async fn test_gbanned_rater_disappears_after_eviction() {
        let gateway = FakeGateway::with_guilds(&[(10, "Alpha")]);
        let store = FakeStore::default();
        store.seed_rater(55, "900", "ou");
        store.seed_rater(66, "900", "ou");
        store.seed_rater(66, "901", "uu");
        let cache = RaterCache::new();
        assert_ok!(cache.raters_for(&store, ChannelId::new(CHANNEL)).await);
        assert_ok!(cache.raters_for(&store, ChannelId::new(901)).await);
        assert_eq!(cache.len(), 2);

        let locks = JobLocks::new();
        let options = GbanOptions::default();
        let cx = GbanContext {
            gateway: &gateway,
            store: &store,
            locks: &locks,
            options: &options,
        };
        let report = assert_ok!(propagator::propagate(&cx, UserId::new(55), "spam").await);
        cache.evict(&report.removed_raters);

        assert_eq!(cache.len(), 1);
        let raters = assert_ok!(cache.raters_for(&store, ChannelId::new(CHANNEL)).await);
        assert_eq!(raters, vec!["66".to_string()]);
    }
}
