use serenity::all::UserId;

use crate::bot::error::Error;

/// Parse a stored snowflake string, rejecting anything that isn't a non-zero number
pub fn snowflake(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Parse a single user id supplied by a moderator
pub fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    let trimmed = raw.trim();
    snowflake(trimmed)
        .map(UserId::new)
        .ok_or_else(|| Error::InvalidUserId(trimmed.to_string()))
}

/// Parse every id in a batch, failing on the first one that isn't numeric
pub fn parse_user_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<UserId>, Error> {
    raw.iter().map(|s| parse_user_id(s.as_ref())).collect()
}

/// Split a free-form list of ids separated by commas and/or whitespace
pub fn split_id_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
