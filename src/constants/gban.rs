/// Reason used when `gban user` is run without one
pub const DEFAULT_BAN_REASON: &str = "No reason provided";

/// Reason used for batch bans coming from the forums ban list
pub const FORUM_BAN_REASON: &str = "Banned from forums";

/// Audit reason for global unbans without an explicit reason
pub const DEFAULT_UNBAN_REASON: &str = "No reason provided";

/// A guild ban counts as caused by a global ban if it was issued within this
/// many seconds of the ledger timestamp (either side, inclusive)
pub const PROVENANCE_WINDOW_SECONDS: i64 = 5 * 60;

/// Guilds contacted at once during fan-out
pub const DEFAULT_FAN_OUT_WIDTH: usize = 1;

/// How long a bulk ledger job waits on another one before giving up (7 minutes)
pub const DEFAULT_JOB_FAILSAFE_SECONDS: u64 = 7 * 60;

pub fn provenance_window() -> chrono::Duration {
    chrono::Duration::seconds(PROVENANCE_WINDOW_SECONDS)
}
