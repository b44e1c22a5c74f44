use std::env;
use std::time::Duration;

use crate::constants::gban::{DEFAULT_FAN_OUT_WIDTH, DEFAULT_JOB_FAILSAFE_SECONDS};

/// Tunables for the global ban services
#[derive(Debug, Clone)]
pub struct GbanOptions {
    /// Guild whose live ban list is treated as the reference for drift detection and imports
    pub reference_guild: Option<u64>,
    /// How many guilds are contacted at once during fan-out (1 = sequential)
    pub fan_out_width: usize,
    /// How long a second bulk job waits for the first before giving up
    pub job_failsafe: Duration,
}

impl Default for GbanOptions {
    fn default() -> Self {
        Self {
            reference_guild: None,
            fan_out_width: DEFAULT_FAN_OUT_WIDTH,
            job_failsafe: Duration::from_secs(DEFAULT_JOB_FAILSAFE_SECONDS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub database_url: String,
    pub guild_id: Option<u64>,
    /// Users allowed to run owner-only commands
    pub owner_ids: Vec<u64>,
    pub gban: GbanOptions,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable not set")?;

        let guild_id = env::var("GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let owner_ids = env::var("OWNER_IDS")
            .map(|s| parse_id_list(&s))
            .unwrap_or_default();

        let reference_guild = env::var("GBAN_REFERENCE_GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let fan_out_width = env::var("GBAN_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_FAN_OUT_WIDTH)
            .max(1);

        let job_failsafe = env::var("GBAN_JOB_FAILSAFE_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_JOB_FAILSAFE_SECONDS);

        Ok(Self {
            discord_token,
            database_url,
            guild_id,
            owner_ids,
            gban: GbanOptions {
                reference_guild,
                fan_out_width,
                job_failsafe: Duration::from_secs(job_failsafe),
            },
        })
    }
}

/// Parse a comma separated list of ids, ignoring anything that isn't a number
fn parse_id_list(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .filter(|id| *id != 0)
        .collect()
}
