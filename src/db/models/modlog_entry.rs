use chrono::{DateTime, Utc};
use serenity::all::{GuildId, UserId};

use crate::utils::ids::snowflake;

/// Moderation action recorded in the modlog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModAction {
    Ban,
    Unban,
    Kick,
    Timeout,
    Untimeout,
}

impl ModAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModAction::Ban => "Ban",
            ModAction::Unban => "Unban",
            ModAction::Kick => "Kick",
            ModAction::Timeout => "Timeout",
            ModAction::Untimeout => "Untimeout",
        }
    }
}

/// One moderation action the bot performed in a guild. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ModlogEntry {
    pub serverid: String,
    pub executor: String,
    pub target: String,
    pub action: String,
    pub reason: String,
    pub date: DateTime<Utc>,
}

impl ModlogEntry {
    pub fn new(
        guild_id: GuildId,
        executor: UserId,
        target: UserId,
        action: ModAction,
        reason: &str,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            serverid: guild_id.to_string(),
            executor: executor.to_string(),
            target: target.to_string(),
            action: action.as_str().to_string(),
            reason: reason.to_string(),
            date,
        }
    }

    pub fn guild_id(&self) -> Option<GuildId> {
        snowflake(&self.serverid).map(GuildId::new)
    }

    pub fn target_id(&self) -> Option<UserId> {
        snowflake(&self.target).map(UserId::new)
    }

    pub fn is(&self, action: ModAction) -> bool {
        self.action == action.as_str()
    }
}
