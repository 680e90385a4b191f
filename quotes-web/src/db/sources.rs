//! Source database operations

use quotes_common::db::{Source, SourceKind};
use quotes_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

/// Find a source by name, creating it with `kind` if missing
///
/// The kind of an existing source is left untouched.
pub async fn get_or_create_source(
    conn: &mut SqliteConnection,
    name: &str,
    kind: SourceKind,
) -> Result<Source> {
    sqlx::query("INSERT INTO sources (name, kind) VALUES (?, ?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .bind(kind.as_str())
        .execute(&mut *conn)
        .await?;

    let row = sqlx::query("SELECT id, name, author, kind FROM sources WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    source_from_row(&row)
}

/// Number of quotes attached to a source, active or not
pub async fn count_for_source(conn: &mut SqliteConnection, source_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE source_id = ?")
        .bind(source_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

fn source_from_row(row: &SqliteRow) -> Result<Source> {
    let kind: String = row.try_get("kind")?;
    Ok(Source {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        author: row.try_get("author")?,
        kind: parse_stored_kind(&kind)?,
    })
}

/// Parse a kind read back from the database
pub(crate) fn parse_stored_kind(kind: &str) -> Result<SourceKind> {
    kind.parse()
        .map_err(|_| Error::Internal(format!("unknown source kind in database: {}", kind)))
}
