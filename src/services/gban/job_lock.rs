use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serenity::all::GuildId;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::bot::error::Error;

/// Bulk jobs that must not overlap with another run of the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Bulk ledger rewrites: drift detection and bootstrap import
    LedgerSync,
    /// Enforcing the ledger in one guild; other guilds run independently
    Enforce(GuildId),
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::LedgerSync => "ledger sync",
            JobKind::Enforce(_) => "enforce",
        }
    }
}

/// Process-wide single-flight locks, one per job kind.
///
/// The returned guard releases the lock when dropped, so a job that errors or
/// panics never blocks later runs.
#[derive(Default)]
pub struct JobLocks {
    locks: DashMap<JobKind, Arc<Mutex<()>>>,
}

pub struct JobGuard {
    kind: JobKind,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        debug!("Released {} job lock", self.kind.as_str());
    }
}

impl JobLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the lock of `kind`, giving up after `failsafe`
    pub async fn acquire(&self, kind: JobKind, failsafe: Duration) -> Result<JobGuard, Error> {
        // Clone the Arc out so the map shard isn't held across the await
        let lock = self
            .locks
            .entry(kind)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match tokio::time::timeout(failsafe, lock.lock_owned()).await {
            Ok(guard) => {
                debug!("Acquired {} job lock", kind.as_str());
                Ok(JobGuard {
                    kind,
                    _guard: guard,
                })
            }
            Err(_) => {
                warn!(
                    "Gave up waiting for {} job lock after {:?}",
                    kind.as_str(),
                    failsafe
                );
                Err(Error::JobTimeout(kind.as_str()))
            }
        }
    }

    /// Whether a job of this kind is currently running
    #[cfg(test)]
    pub fn is_running(&self, kind: JobKind) -> bool {
        self.locks
            .get(&kind)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_second_job_times_out_while_first_runs() {
        let locks = JobLocks::new();
        let first = assert_ok!(locks.acquire(JobKind::LedgerSync, Duration::from_millis(50)).await);
        assert!(locks.is_running(JobKind::LedgerSync));

        let second = locks
            .acquire(JobKind::LedgerSync, Duration::from_millis(50))
            .await;
        assert!(matches!(second, Err(Error::JobTimeout("ledger sync"))));

        drop(first);
        assert!(!locks.is_running(JobKind::LedgerSync));
        assert_ok!(locks.acquire(JobKind::LedgerSync, Duration::from_millis(50)).await);
    }

    const GUILD: GuildId = GuildId::new(10);

    #[tokio::test]
    async fn test_kinds_do_not_block_each_other() {
        let locks = JobLocks::new();
        let _sync = assert_ok!(locks.acquire(JobKind::LedgerSync, Duration::from_millis(50)).await);
        assert_ok!(locks.acquire(JobKind::Enforce(GUILD), Duration::from_millis(50)).await);
    }

    #[tokio::test]
    async fn test_enforce_locks_are_per_guild() {
        let locks = JobLocks::new();
        let _first = assert_ok!(locks.acquire(JobKind::Enforce(GUILD), Duration::from_millis(50)).await);

        assert_ok!(
            locks
                .acquire(JobKind::Enforce(GuildId::new(20)), Duration::from_millis(50))
                .await
        );
        assert!(matches!(
            locks
                .acquire(JobKind::Enforce(GUILD), Duration::from_millis(50))
                .await,
            Err(Error::JobTimeout("enforce"))
        ));
    }

    #[tokio::test]
    async fn test_lock_released_when_job_fails() {
        let locks = JobLocks::new();

        async fn failing_job(locks: &JobLocks) -> Result<(), Error> {
            let _guard = locks
                .acquire(JobKind::Enforce(GUILD), Duration::from_millis(50))
                .await?;
            Err(Error::custom("boom"))
        }

        assert_err!(failing_job(&locks).await);
        assert!(!locks.is_running(JobKind::Enforce(GUILD)));
    }

    #[tokio::test]
    async fn test_waiter_gets_lock_once_released() {
        let locks = Arc::new(JobLocks::new());
        let first = assert_ok!(locks.acquire(JobKind::LedgerSync, Duration::from_secs(1)).await);

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                locks
                    .acquire(JobKind::LedgerSync, Duration::from_secs(5))
                    .await
                    .is_ok()
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(first);
        assert!(waiter.await.unwrap());
    }
}
