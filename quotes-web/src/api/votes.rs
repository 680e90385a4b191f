//! Vote endpoint

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::services::{self, VoteSummary};
use crate::session::SessionKey;
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// "like" or "dislike"
    #[serde(default)]
    pub action: String,
}

/// POST /api/quotes/:id/vote
///
/// Repeating the same action is a no-op; the opposite action flips the vote.
pub async fn vote(
    State(state): State<AppState>,
    Extension(session): Extension<SessionKey>,
    Path(quote_id): Path<i64>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<VoteSummary>> {
    let Json(payload) = payload?;
    let summary = services::vote(&state.db, quote_id, session.as_str(), &payload.action).await?;
    Ok(Json(summary))
}
