use sqlx::PgPool;

use crate::db::models::ServerRecord;

pub async fn get(pool: &PgPool, serverid: &str) -> Result<Option<ServerRecord>, sqlx::Error> {
    sqlx::query_as::<_, ServerRecord>("SELECT serverid, class FROM servers WHERE serverid = $1")
        .bind(serverid)
        .fetch_optional(pool)
        .await
}

/// Insert a record for a newly joined guild, leaving any existing record alone
pub async fn register(pool: &PgPool, serverid: &str, class: i16) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO servers (serverid, class)
        VALUES ($1, $2)
        ON CONFLICT (serverid) DO NOTHING
        "#,
    )
    .bind(serverid)
    .bind(class)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Upsert that only ever raises the class. Returns true if anything changed.
pub async fn raise_class(pool: &PgPool, serverid: &str, class: i16) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO servers (serverid, class)
        VALUES ($1, $2)
        ON CONFLICT (serverid)
        DO UPDATE SET class = EXCLUDED.class
        WHERE servers.class < EXCLUDED.class
        "#,
    )
    .bind(serverid)
    .bind(class)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_class(pool: &PgPool, serverid: &str, class: i16) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO servers (serverid, class)
        VALUES ($1, $2)
        ON CONFLICT (serverid)
        DO UPDATE SET class = EXCLUDED.class
        "#,
    )
    .bind(serverid)
    .bind(class)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete(pool: &PgPool, serverid: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM servers WHERE serverid = $1")
        .bind(serverid)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
