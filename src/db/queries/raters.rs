use sqlx::PgPool;

use crate::db::models::RaterAssignment;

/// Remove a user from every rater assignment, returning what was removed
pub async fn remove_user(pool: &PgPool, userid: &str) -> Result<Vec<RaterAssignment>, sqlx::Error> {
    sqlx::query_as::<_, RaterAssignment>(
        "DELETE FROM raters WHERE userid = $1 RETURNING userid, channelid, meta",
    )
    .bind(userid)
    .fetch_all(pool)
    .await
}

/// User ids trusted to rate submissions in a channel
pub async fn for_channel(pool: &PgPool, channelid: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT userid FROM raters WHERE channelid = $1 ORDER BY userid")
        .bind(channelid)
        .fetch_all(pool)
        .await
}
