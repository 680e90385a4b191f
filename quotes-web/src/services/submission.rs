//! Two-phase quote submission
//!
//! A first submit may come back with a near-duplicate rejection; the client
//! shows the matched text and, if the user insists, submits again with
//! `confirmed` set. Exact duplicates, full sources and bad weights are final.

use quotes_common::db::{
    validate_weight, Quote, SourceKind, DEFAULT_WEIGHT, MAX_SOURCE_NAME_CHARS,
};
use quotes_common::{Deduplicator, Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db;
use crate::db::quotes::NewQuote;

/// Quote submission payload
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuote {
    pub text: String,
    pub source_name: String,
    pub source_kind: String,
    /// Defaults to 1 when omitted
    #[serde(default)]
    pub weight: Option<i64>,
    /// Set on the resubmission that accepts a near-duplicate warning
    #[serde(default)]
    pub confirmed: bool,
}

/// Validate and store a new quote
///
/// Source lookup, capacity count, duplicate scan and insert share one
/// transaction, so a rejected submission leaves no new source behind.
pub async fn submit_quote(
    pool: &SqlitePool,
    deduplicator: &Deduplicator,
    request: SubmitQuote,
) -> Result<Quote> {
    let weight = validate_weight(request.weight.unwrap_or(DEFAULT_WEIGHT))?;
    let kind: SourceKind = request.source_kind.trim().parse()?;

    let source_name = request.source_name.trim();
    if source_name.is_empty() {
        return Err(Error::InvalidInput("source name is required".to_string()));
    }
    if source_name.chars().count() > MAX_SOURCE_NAME_CHARS {
        return Err(Error::InvalidInput(format!(
            "source name is longer than {} characters",
            MAX_SOURCE_NAME_CHARS
        )));
    }

    let text = request.text.trim();

    let mut tx = pool.begin().await?;

    let source = db::sources::get_or_create_source(&mut *tx, source_name, kind).await?;
    let source_count = db::sources::count_for_source(&mut *tx, source.id).await?;
    let existing = db::quotes::normalized_texts(&mut *tx).await?;

    let normalized = match deduplicator.check(text, &existing, source_count, request.confirmed) {
        Ok(normalized) => normalized,
        Err(e) => {
            warn!("Rejected quote for {}: {}", source.full_name(), e);
            return Err(e);
        }
    };

    let new_quote = NewQuote {
        text: text.to_string(),
        normalized_text: normalized,
        source_id: source.id,
        weight,
    };
    let id = db::quotes::insert_quote(&mut *tx, &new_quote).await?;

    tx.commit().await?;

    info!(
        "Added quote {} to {} (weight {}, confirmed: {})",
        id,
        source.full_name(),
        weight,
        request.confirmed
    );

    db::quotes::load_quote(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("quote {} missing after insert", id)))
}
