//! Visitor session persistence

use chrono::Utc;
use quotes_common::Result;
use sqlx::SqlitePool;

/// Create the session row if needed and refresh its timestamp
pub async fn touch_session(pool: &SqlitePool, session_key: &str) -> Result<()> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO sessions (session_key, last_quote_id, created_at, updated_at)
        VALUES (?, NULL, ?, ?)
        ON CONFLICT(session_key) DO UPDATE SET updated_at = excluded.updated_at
        "#,
    )
    .bind(session_key)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Id of the last quote this session was shown
pub async fn last_shown(pool: &SqlitePool, session_key: &str) -> Result<Option<i64>> {
    let last: Option<Option<i64>> =
        sqlx::query_scalar("SELECT last_quote_id FROM sessions WHERE session_key = ?")
            .bind(session_key)
            .fetch_optional(pool)
            .await?;

    Ok(last.flatten())
}

pub async fn set_last_shown(pool: &SqlitePool, session_key: &str, quote_id: i64) -> Result<()> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO sessions (session_key, last_quote_id, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(session_key) DO UPDATE SET
            last_quote_id = excluded.last_quote_id,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(session_key)
    .bind(quote_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}
