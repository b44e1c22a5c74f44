use sqlx::PgPool;

use crate::db::models::{ModAction, ModlogEntry};

pub async fn create(pool: &PgPool, entry: &ModlogEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO modlog (serverid, executor, target, action, reason, date)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&entry.serverid)
    .bind(&entry.executor)
    .bind(&entry.target)
    .bind(&entry.action)
    .bind(&entry.reason)
    .bind(entry.date)
    .execute(pool)
    .await?;

    Ok(())
}

/// Bans a given executor issued against one target, newest first
pub async fn bans_for_target(
    pool: &PgPool,
    executor: &str,
    target: &str,
) -> Result<Vec<ModlogEntry>, sqlx::Error> {
    sqlx::query_as::<_, ModlogEntry>(
        r#"
        SELECT serverid, executor, target, action, reason, date FROM modlog
        WHERE action = $1 AND executor = $2 AND target = $3
        ORDER BY date DESC
        "#,
    )
    .bind(ModAction::Ban.as_str())
    .bind(executor)
    .bind(target)
    .fetch_all(pool)
    .await
}

/// Bans a given executor issued against any of the targets, newest first
pub async fn bans_for_targets(
    pool: &PgPool,
    executor: &str,
    targets: &[String],
) -> Result<Vec<ModlogEntry>, sqlx::Error> {
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ModlogEntry>(
        r#"
        SELECT serverid, executor, target, action, reason, date FROM modlog
        WHERE action = $1 AND executor = $2 AND target = ANY($3)
        ORDER BY date DESC
        "#,
    )
    .bind(ModAction::Ban.as_str())
    .bind(executor)
    .bind(targets)
    .fetch_all(pool)
    .await
}
