use chrono::{DateTime, Utc};
use serenity::all::UserId;

use crate::utils::ids::snowflake;

/// Ledger row: one per globally banned user, never deleted
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GlobalBan {
    pub target: String,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub unbanned: bool,
}

impl GlobalBan {
    pub fn new(target: UserId, reason: &str, date: DateTime<Utc>) -> Self {
        Self {
            target: target.to_string(),
            date,
            reason: reason.to_string(),
            unbanned: false,
        }
    }

    pub fn target_id(&self) -> Option<UserId> {
        snowflake(&self.target).map(UserId::new)
    }

    pub fn is_active(&self) -> bool {
        !self.unbanned
    }
}
