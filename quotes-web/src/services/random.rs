//! Random quote for a visitor

use quotes_common::db::Quote;
use quotes_common::selector::pick_with_fallback;
use quotes_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db;

/// Draw a weighted random quote, avoiding the visitor's previous one
///
/// The drawn quote becomes the session's last-shown quote and its view
/// counter is bumped. Returns `None` when no active quote exists.
pub async fn draw_random_quote(pool: &SqlitePool, session_key: &str) -> Result<Option<Quote>> {
    let last_shown = db::sessions::last_shown(pool, session_key).await?;
    let candidates = db::quotes::active_candidates(pool).await?;

    let picked = {
        let mut rng = rand::thread_rng();
        pick_with_fallback(&candidates, last_shown, &mut rng)
    };

    let Some(quote_id) = picked else {
        debug!("No active quotes to draw from");
        return Ok(None);
    };

    debug!(
        "Drew quote {} from {} candidates (excluded {:?})",
        quote_id,
        candidates.len(),
        last_shown
    );

    db::sessions::set_last_shown(pool, session_key, quote_id).await?;
    db::quotes::increment_views(pool, quote_id).await?;

    db::quotes::load_quote(pool, quote_id).await
}
