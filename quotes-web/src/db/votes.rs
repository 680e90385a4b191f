//! Vote database operations

use chrono::Utc;
use quotes_common::db::{Vote, VoteValue};
use quotes_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// What a vote request did to the stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    /// First vote from this session on this quote
    Created,
    /// Existing vote switched to the other value
    Flipped,
    /// Same value as the existing vote; nothing changed
    Unchanged,
}

/// Record a vote and keep the quote's like/dislike counters in step
///
/// One row per (quote, session). A repeat with the same value is a no-op;
/// the opposite value flips the row and moves one count across.
///
/// The insert must stay the transaction's first statement: concurrent first
/// votes from one session then queue on the write lock, and the later one
/// sees the stored row.
pub async fn cast_vote(
    pool: &SqlitePool,
    quote_id: i64,
    session_key: &str,
    value: VoteValue,
) -> Result<VoteOutcome> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO votes (quote_id, session_key, value, created_at)
        SELECT ?, ?, ?, ? WHERE EXISTS (SELECT 1 FROM quotes WHERE id = ?)
        ON CONFLICT(quote_id, session_key) DO NOTHING
        "#,
    )
    .bind(quote_id)
    .bind(session_key)
    .bind(value.as_i64())
    .bind(Utc::now())
    .bind(quote_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let outcome = if inserted == 1 {
        let counter_sql = match value {
            VoteValue::Like => "UPDATE quotes SET likes = likes + 1 WHERE id = ?",
            VoteValue::Dislike => "UPDATE quotes SET dislikes = dislikes + 1 WHERE id = ?",
        };
        sqlx::query(counter_sql)
            .bind(quote_id)
            .execute(&mut *tx)
            .await?;

        VoteOutcome::Created
    } else {
        let previous: Option<i64> =
            sqlx::query_scalar("SELECT value FROM votes WHERE quote_id = ? AND session_key = ?")
                .bind(quote_id)
                .bind(session_key)
                .fetch_optional(&mut *tx)
                .await?;

        match previous {
            // Nothing inserted and no prior vote: the quote does not exist
            None => return Err(Error::NotFound(format!("quote {}", quote_id))),
            Some(stored) if stored == value.as_i64() => VoteOutcome::Unchanged,
            Some(_) => {
                sqlx::query("UPDATE votes SET value = ? WHERE quote_id = ? AND session_key = ?")
                    .bind(value.as_i64())
                    .bind(quote_id)
                    .bind(session_key)
                    .execute(&mut *tx)
                    .await?;

                // Counters never go below zero
                let counter_sql = match value {
                    VoteValue::Like => {
                        "UPDATE quotes SET likes = likes + 1, dislikes = MAX(dislikes - 1, 0) WHERE id = ?"
                    }
                    VoteValue::Dislike => {
                        "UPDATE quotes SET likes = MAX(likes - 1, 0), dislikes = dislikes + 1 WHERE id = ?"
                    }
                };
                sqlx::query(counter_sql)
                    .bind(quote_id)
                    .execute(&mut *tx)
                    .await?;

                VoteOutcome::Flipped
            }
        }
    };

    tx.commit().await?;

    Ok(outcome)
}

/// Load the vote a session holds on a quote
pub async fn load_vote(pool: &SqlitePool, quote_id: i64, session_key: &str) -> Result<Option<Vote>> {
    let row = sqlx::query(
        "SELECT id, quote_id, session_key, value, created_at FROM votes WHERE quote_id = ? AND session_key = ?",
    )
    .bind(quote_id)
    .bind(session_key)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let raw: i64 = row.try_get("value")?;
    let value = VoteValue::from_i64(raw)
        .ok_or_else(|| Error::Internal(format!("invalid vote value in database: {}", raw)))?;

    Ok(Some(Vote {
        id: row.try_get("id")?,
        quote_id: row.try_get("quote_id")?,
        session_key: row.try_get("session_key")?,
        value,
        created_at: row.try_get("created_at")?,
    }))
}
