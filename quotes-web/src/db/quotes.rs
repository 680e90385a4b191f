//! Quote database operations

use chrono::Utc;
use quotes_common::db::{Quote, Source, SourceKind};
use quotes_common::dedup::ExistingText;
use quotes_common::selector::Candidate;
use quotes_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::sources::parse_stored_kind;

/// Quote columns joined with their source
const QUOTE_SELECT: &str = r#"
    SELECT q.id, q.text, q.normalized_text, q.weight, q.is_active,
           q.views, q.likes, q.dislikes, q.created_at, q.updated_at,
           s.id AS source_id, s.name AS source_name,
           s.author AS source_author, s.kind AS source_kind
    FROM quotes q
    JOIN sources s ON s.id = q.source_id
"#;

/// Quotes eligible for drawing and listings
const ACTIVE_FILTER: &str = "q.is_active = 1 AND q.weight > 0";

/// Fields for a new quote row
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub text: String,
    pub normalized_text: String,
    pub source_id: i64,
    pub weight: i64,
}

/// Insert a quote and return its id
pub async fn insert_quote(conn: &mut SqliteConnection, quote: &NewQuote) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO quotes (text, normalized_text, source_id, weight, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&quote.text)
    .bind(&quote.normalized_text)
    .bind(quote.source_id)
    .bind(quote.weight)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// (id, weight) of every active quote, ascending by id
pub async fn active_candidates(pool: &SqlitePool) -> Result<Vec<Candidate>> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT id, weight FROM quotes WHERE is_active = 1 AND weight > 0 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, weight)| Candidate::new(id, weight))
        .collect())
}

/// Normalized text of every stored quote
pub async fn normalized_texts(conn: &mut SqliteConnection) -> Result<Vec<ExistingText>> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, normalized_text FROM quotes ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(id, text)| ExistingText::new(id, text))
        .collect())
}

/// Load one quote with its source
pub async fn load_quote(pool: &SqlitePool, id: i64) -> Result<Option<Quote>> {
    let sql = format!("{} WHERE q.id = ?", QUOTE_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    row.as_ref().map(quote_from_row).transpose()
}

/// Bump the view counter by one
pub async fn increment_views(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE quotes SET views = views + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Most liked active quotes, ties broken by views
pub async fn top_quotes(
    pool: &SqlitePool,
    kind: Option<SourceKind>,
    limit: i64,
) -> Result<Vec<Quote>> {
    let rows = match kind {
        Some(kind) => {
            let sql = format!(
                "{} WHERE {} AND s.kind = ? ORDER BY q.likes DESC, q.views DESC, q.id ASC LIMIT ?",
                QUOTE_SELECT, ACTIVE_FILTER
            );
            sqlx::query(&sql)
                .bind(kind.as_str())
                .bind(limit)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "{} WHERE {} ORDER BY q.likes DESC, q.views DESC, q.id ASC LIMIT ?",
                QUOTE_SELECT, ACTIVE_FILTER
            );
            sqlx::query(&sql).bind(limit).fetch_all(pool).await?
        }
    };

    rows.iter().map(quote_from_row).collect()
}

/// Active quotes whose text or source name contains `query`, newest first
///
/// Matching is case-insensitive over full Unicode, which SQLite's LIKE is
/// not, so the filter runs here. An empty query lists every active quote.
pub async fn search_quotes(pool: &SqlitePool, query: &str) -> Result<Vec<Quote>> {
    let sql = format!(
        "{} WHERE {} ORDER BY q.created_at DESC, q.id DESC",
        QUOTE_SELECT, ACTIVE_FILTER
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    let quotes = rows.iter().map(quote_from_row).collect::<Result<Vec<_>>>()?;

    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(quotes);
    }

    Ok(quotes
        .into_iter()
        .filter(|q| {
            q.text.to_lowercase().contains(&needle)
                || q.source.name.to_lowercase().contains(&needle)
        })
        .collect())
}

fn quote_from_row(row: &SqliteRow) -> Result<Quote> {
    let kind: String = row.try_get("source_kind")?;
    Ok(Quote {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        normalized_text: row.try_get("normalized_text")?,
        source: Source {
            id: row.try_get("source_id")?,
            name: row.try_get("source_name")?,
            author: row.try_get("source_author")?,
            kind: parse_stored_kind(&kind)?,
        },
        weight: row.try_get("weight")?,
        is_active: row.try_get("is_active")?,
        views: row.try_get("views")?,
        likes: row.try_get("likes")?,
        dislikes: row.try_get("dislikes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
