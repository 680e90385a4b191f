//! Random draw and submission endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use quotes_common::db::Quote;
use serde::Serialize;

use crate::services::{self, SubmitQuote};
use crate::session::SessionKey;
use crate::{ApiResult, AppState};

/// Random draw response; `quote` is null when nothing is active
#[derive(Debug, Serialize)]
pub struct RandomQuoteResponse {
    pub quote: Option<Quote>,
}

/// GET /api/quotes/random
///
/// Weighted draw that avoids repeating the session's previous quote when
/// another one is available. Counts a view for the drawn quote.
pub async fn random_quote(
    State(state): State<AppState>,
    Extension(session): Extension<SessionKey>,
) -> ApiResult<Json<RandomQuoteResponse>> {
    let quote = services::draw_random_quote(&state.db, session.as_str()).await?;
    Ok(Json(RandomQuoteResponse { quote }))
}

/// POST /api/quotes
///
/// **Request:** `{"text", "source_name", "source_kind", "weight"?, "confirmed"?}`
///
/// **Errors:**
/// - 400: malformed body, empty or over-long text or source name, unknown
///   source kind
/// - 409: near-duplicate; resubmit with `"confirmed": true` to accept
/// - 422: exact duplicate, source full, weight outside 1..=10
pub async fn submit_quote(
    State(state): State<AppState>,
    payload: Result<Json<SubmitQuote>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Quote>)> {
    let Json(payload) = payload?;
    let quote = services::submit_quote(&state.db, &state.deduplicator, payload).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}
