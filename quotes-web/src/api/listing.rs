//! Top and search listings

use axum::{
    extract::{Query, State},
    Json,
};
use quotes_common::db::{Quote, SourceKind};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    /// "movie" or "book"; anything else lists all kinds
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopResponse {
    /// Applied kind filter, empty when none
    pub selected_kind: String,
    pub quotes: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub quotes: Vec<Quote>,
}

/// GET /api/quotes/top?kind=movie
pub async fn top_quotes(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Json<TopResponse>> {
    let kind = query
        .kind
        .as_deref()
        .and_then(|k| k.parse::<SourceKind>().ok());

    let quotes = db::quotes::top_quotes(&state.db, kind, state.top_limit).await?;

    Ok(Json(TopResponse {
        selected_kind: kind.map(|k| k.to_string()).unwrap_or_default(),
        quotes,
    }))
}

/// GET /api/quotes/search?q=force
///
/// Case-insensitive substring match over quote text and source name.
pub async fn search_quotes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let quotes = db::quotes::search_quotes(&state.db, &query.q).await?;

    Ok(Json(SearchResponse {
        query: query.q,
        total_results: quotes.len(),
        quotes,
    }))
}
