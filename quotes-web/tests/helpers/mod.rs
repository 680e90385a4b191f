//! Shared test utilities: in-memory database and seed data

#![allow(dead_code)]

use quotes_common::db::init::{create_schema, init_database};
use quotes_common::db::Quote;
use quotes_common::Deduplicator;
use quotes_web::services::{submit_quote, SubmitQuote};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Single-connection in-memory database with the full schema
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    create_schema(&pool).await.expect("create schema");

    pool
}

/// File-backed database with a multi-connection pool
///
/// Keep the returned `TempDir` alive for as long as the pool is used.
pub async fn file_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("create temp dir");
    let pool = init_database(&dir.path().join("quotes.db"))
        .await
        .expect("open file database");
    (dir, pool)
}

pub fn submission(text: &str, source_name: &str, kind: &str) -> SubmitQuote {
    SubmitQuote {
        text: text.to_string(),
        source_name: source_name.to_string(),
        source_kind: kind.to_string(),
        weight: None,
        confirmed: false,
    }
}

/// Store a quote through the regular submission path
pub async fn seed_quote(pool: &SqlitePool, text: &str, source_name: &str, kind: &str, weight: i64) -> Quote {
    let mut request = submission(text, source_name, kind);
    request.weight = Some(weight);
    request.confirmed = true;
    submit_quote(pool, &Deduplicator::default(), request)
        .await
        .expect("seed quote")
}

pub async fn set_counters(pool: &SqlitePool, id: i64, likes: i64, views: i64) {
    sqlx::query("UPDATE quotes SET likes = ?, views = ? WHERE id = ?")
        .bind(likes)
        .bind(views)
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn deactivate(pool: &SqlitePool, id: i64) {
    sqlx::query("UPDATE quotes SET is_active = 0 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}
