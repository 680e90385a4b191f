//! quotes-web library
//!
//! JSON HTTP service for submitting, drawing, voting on and ranking quotes.

use axum::Router;
use chrono::{DateTime, Utc};
use quotes_common::Deduplicator;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Submission duplicate/capacity checker
    pub deduplicator: Deduplicator,
    /// Number of entries returned by the top listing
    pub top_limit: i64,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, deduplicator: Deduplicator, top_limit: i64) -> Self {
        Self {
            db,
            deduplicator,
            top_limit,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Quote routes run behind the session middleware; `/health` does not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    let quotes = Router::new()
        .route("/api/quotes", post(api::submit_quote))
        .route("/api/quotes/random", get(api::random_quote))
        .route("/api/quotes/top", get(api::top_quotes))
        .route("/api/quotes/search", get(api::search_quotes))
        .route("/api/quotes/:id/vote", post(api::vote))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ));

    Router::new()
        .merge(quotes)
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
