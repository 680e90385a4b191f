//! Like/dislike voting

use quotes_common::db::VoteValue;
use quotes_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::db::votes::VoteOutcome;

/// Counters after a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteSummary {
    pub quote_id: i64,
    pub vote: VoteValue,
    pub outcome: VoteOutcome,
    pub likes: i64,
    pub dislikes: i64,
}

/// Apply a "like"/"dislike" action from a session
pub async fn vote(
    pool: &SqlitePool,
    quote_id: i64,
    session_key: &str,
    action: &str,
) -> Result<VoteSummary> {
    let value = VoteValue::from_action(action)?;

    let outcome = db::votes::cast_vote(pool, quote_id, session_key, value).await?;
    if outcome == VoteOutcome::Flipped {
        info!("Session {} switched vote on quote {} to {:?}", session_key, quote_id, value);
    }

    let quote = db::quotes::load_quote(pool, quote_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("quote {}", quote_id)))?;

    Ok(VoteSummary {
        quote_id,
        vote: value,
        outcome,
        likes: quote.likes,
        dislikes: quote.dislikes,
    })
}
