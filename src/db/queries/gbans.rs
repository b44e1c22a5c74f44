use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::models::GlobalBan;

pub async fn get(pool: &PgPool, target: &str) -> Result<Option<GlobalBan>, sqlx::Error> {
    sqlx::query_as::<_, GlobalBan>(
        "SELECT target, date, reason, unbanned FROM gbans WHERE target = $1",
    )
    .bind(target)
    .fetch_optional(pool)
    .await
}

/// Ledger rows that are still in force, oldest first
pub async fn list_active(pool: &PgPool) -> Result<Vec<GlobalBan>, sqlx::Error> {
    sqlx::query_as::<_, GlobalBan>(
        r#"
        SELECT target, date, reason, unbanned FROM gbans
        WHERE unbanned = false
        ORDER BY date ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Write or overwrite the ledger row for a target. A re-issued ban is active again.
pub async fn upsert(
    pool: &PgPool,
    target: &str,
    reason: &str,
    date: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO gbans (target, date, reason, unbanned)
        VALUES ($1, $2, $3, false)
        ON CONFLICT (target)
        DO UPDATE SET date = EXCLUDED.date, reason = EXCLUDED.reason, unbanned = false
        "#,
    )
    .bind(target)
    .bind(date)
    .bind(reason)
    .execute(pool)
    .await?;

    Ok(())
}

/// Bulk variant of [`upsert`]. Targets must be unique within one call.
pub async fn upsert_many(pool: &PgPool, rows: &[GlobalBan]) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }

    let targets: Vec<String> = rows.iter().map(|r| r.target.clone()).collect();
    let dates: Vec<DateTime<Utc>> = rows.iter().map(|r| r.date).collect();
    let reasons: Vec<String> = rows.iter().map(|r| r.reason.clone()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO gbans (target, date, reason, unbanned)
        SELECT target, date, reason, false
        FROM UNNEST($1::text[], $2::timestamptz[], $3::text[]) AS t(target, date, reason)
        ON CONFLICT (target)
        DO UPDATE SET date = EXCLUDED.date, reason = EXCLUDED.reason, unbanned = false
        "#,
    )
    .bind(&targets)
    .bind(&dates)
    .bind(&reasons)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Flag every listed target as lifted in one statement
pub async fn mark_unbanned(pool: &PgPool, targets: &[String]) -> Result<u64, sqlx::Error> {
    if targets.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("UPDATE gbans SET unbanned = true WHERE target = ANY($1)")
        .bind(targets)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
