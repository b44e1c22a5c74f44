use sqlx::PgPool;

pub async fn get(pool: &PgPool, serverid: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT channelid FROM logchannels WHERE serverid = $1")
            .bind(serverid)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|r| r.0))
}

pub async fn set(pool: &PgPool, serverid: &str, channelid: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO logchannels (serverid, channelid)
        VALUES ($1, $2)
        ON CONFLICT (serverid)
        DO UPDATE SET channelid = EXCLUDED.channelid
        "#,
    )
    .bind(serverid)
    .bind(channelid)
    .execute(pool)
    .await?;

    Ok(())
}
