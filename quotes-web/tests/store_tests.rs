//! Store and service behaviour: votes, random draws, listings, sessions

mod helpers;

use helpers::{deactivate, file_pool, seed_quote, set_counters, test_pool};
use quotes_common::db::{SourceKind, VoteValue};
use quotes_common::Error;
use quotes_web::db;
use quotes_web::db::votes::VoteOutcome;
use quotes_web::services::{draw_random_quote, vote};

const SESSION_A: &str = "11111111-1111-4111-8111-111111111111";
const SESSION_B: &str = "22222222-2222-4222-8222-222222222222";

async fn vote_rows(pool: &sqlx::SqlitePool, quote_id: i64, session: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE quote_id = ? AND session_key = ?")
        .bind(quote_id)
        .bind(session)
        .fetch_one(pool)
        .await
        .unwrap()
}

// =============================================================================
// Voting
// =============================================================================

#[tokio::test]
async fn test_like_then_dislike_flips_counters() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Here's looking at you, kid", "Casablanca", "movie", 1).await;

    let liked = vote(&pool, quote.id, SESSION_A, "like").await.unwrap();
    assert_eq!(liked.outcome, VoteOutcome::Created);
    assert_eq!((liked.likes, liked.dislikes), (1, 0));

    let flipped = vote(&pool, quote.id, SESSION_A, "dislike").await.unwrap();
    assert_eq!(flipped.outcome, VoteOutcome::Flipped);
    assert_eq!(flipped.likes, liked.likes - 1);
    assert_eq!(flipped.dislikes, liked.dislikes + 1);

    assert_eq!(vote_rows(&pool, quote.id, SESSION_A).await, 1);
    let stored = db::votes::load_vote(&pool, quote.id, SESSION_A)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, VoteValue::Dislike);
}

#[tokio::test]
async fn test_repeat_vote_is_noop() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Play it again", "Casablanca", "movie", 1).await;

    vote(&pool, quote.id, SESSION_A, "like").await.unwrap();
    let again = vote(&pool, quote.id, SESSION_A, "like").await.unwrap();

    assert_eq!(again.outcome, VoteOutcome::Unchanged);
    assert_eq!((again.likes, again.dislikes), (1, 0));
    assert_eq!(vote_rows(&pool, quote.id, SESSION_A).await, 1);
}

#[tokio::test]
async fn test_sessions_vote_independently() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Round up the usual suspects", "Casablanca", "movie", 1).await;

    vote(&pool, quote.id, SESSION_A, "like").await.unwrap();
    let summary = vote(&pool, quote.id, SESSION_B, "dislike").await.unwrap();

    assert_eq!(summary.outcome, VoteOutcome::Created);
    assert_eq!((summary.likes, summary.dislikes), (1, 1));
}

#[tokio::test]
async fn test_flip_back_and_forth() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "We'll always have Paris", "Casablanca", "movie", 1).await;

    vote(&pool, quote.id, SESSION_A, "dislike").await.unwrap();
    vote(&pool, quote.id, SESSION_A, "like").await.unwrap();
    let last = vote(&pool, quote.id, SESSION_A, "dislike").await.unwrap();

    assert_eq!((last.likes, last.dislikes), (0, 1));
    assert_eq!(vote_rows(&pool, quote.id, SESSION_A).await, 1);
}

#[tokio::test]
async fn test_concurrent_first_votes_from_one_session() {
    let (_dir, pool) = file_pool().await;
    let quote = seed_quote(&pool, "Frankly, my dear", "Gone with the Wind", "movie", 1).await;

    let (a, b) = tokio::join!(
        db::votes::cast_vote(&pool, quote.id, SESSION_A, VoteValue::Like),
        db::votes::cast_vote(&pool, quote.id, SESSION_A, VoteValue::Like),
    );
    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| *o != VoteOutcome::Created);
    assert_eq!(outcomes, vec![VoteOutcome::Created, VoteOutcome::Unchanged]);

    assert_eq!(vote_rows(&pool, quote.id, SESSION_A).await, 1);
    let stored = db::quotes::load_quote(&pool, quote.id).await.unwrap().unwrap();
    assert_eq!((stored.likes, stored.dislikes), (1, 0));
}

#[tokio::test]
async fn test_unknown_quote_not_found_for_session_with_votes() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Mother of dragons", "Fire and Blood", "book", 1).await;

    vote(&pool, quote.id, SESSION_A, "like").await.unwrap();
    // A different quote id with no row must still be reported as unknown
    let err = vote(&pool, quote.id + 100, SESSION_A, "like").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_vote_invalid_action() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Louis, I think", "Casablanca", "movie", 1).await;

    let err = vote(&pool, quote.id, SESSION_A, "love").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(vote_rows(&pool, quote.id, SESSION_A).await, 0);
}

#[tokio::test]
async fn test_vote_unknown_quote() {
    let pool = test_pool().await;
    let err = vote(&pool, 999, SESSION_A, "like").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// =============================================================================
// Random draw
// =============================================================================

#[tokio::test]
async fn test_random_empty_database() {
    let pool = test_pool().await;
    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();
    assert!(draw_random_quote(&pool, SESSION_A).await.unwrap().is_none());
}

#[tokio::test]
async fn test_random_alternates_between_two_quotes() {
    let pool = test_pool().await;
    seed_quote(&pool, "Quote A", "Source A", "movie", 5).await;
    seed_quote(&pool, "Quote B", "Source B", "movie", 5).await;
    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();

    let mut previous = draw_random_quote(&pool, SESSION_A).await.unwrap().unwrap().id;
    for _ in 0..20 {
        let next = draw_random_quote(&pool, SESSION_A).await.unwrap().unwrap().id;
        assert_ne!(next, previous, "last shown quote must be excluded");
        previous = next;
    }
}

#[tokio::test]
async fn test_random_single_quote_repeats() {
    let pool = test_pool().await;
    let only = seed_quote(&pool, "Only one", "Lonely", "book", 2).await;
    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();

    for _ in 0..3 {
        let drawn = draw_random_quote(&pool, SESSION_A).await.unwrap().unwrap();
        assert_eq!(drawn.id, only.id);
    }
}

#[tokio::test]
async fn test_random_counts_views_and_records_last_shown() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Counted", "Views", "book", 1).await;
    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();

    let first = draw_random_quote(&pool, SESSION_A).await.unwrap().unwrap();
    assert_eq!(first.views, 1);
    let second = draw_random_quote(&pool, SESSION_A).await.unwrap().unwrap();
    assert_eq!(second.views, 2);

    assert_eq!(
        db::sessions::last_shown(&pool, SESSION_A).await.unwrap(),
        Some(quote.id)
    );
}

#[tokio::test]
async fn test_random_skips_inactive() {
    let pool = test_pool().await;
    let hidden = seed_quote(&pool, "Hidden", "Source A", "movie", 10).await;
    let visible = seed_quote(&pool, "Visible", "Source B", "movie", 1).await;
    deactivate(&pool, hidden.id).await;
    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();

    for _ in 0..10 {
        let drawn = draw_random_quote(&pool, SESSION_A).await.unwrap().unwrap();
        assert_eq!(drawn.id, visible.id);
    }
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_top_orders_by_likes_then_views() {
    let pool = test_pool().await;
    let a = seed_quote(&pool, "Alpha", "Movie One", "movie", 1).await;
    let b = seed_quote(&pool, "Bravo", "Movie Two", "movie", 1).await;
    let c = seed_quote(&pool, "Charlie", "Book One", "book", 1).await;
    set_counters(&pool, a.id, 5, 1).await;
    set_counters(&pool, b.id, 5, 9).await;
    set_counters(&pool, c.id, 7, 0).await;

    let top = db::quotes::top_quotes(&pool, None, 10).await.unwrap();
    let ids: Vec<i64> = top.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);

    let movies = db::quotes::top_quotes(&pool, Some(SourceKind::Movie), 10).await.unwrap();
    let ids: Vec<i64> = movies.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);

    let limited = db::quotes::top_quotes(&pool, None, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_top_excludes_inactive() {
    let pool = test_pool().await;
    let a = seed_quote(&pool, "Alpha", "Movie One", "movie", 1).await;
    set_counters(&pool, a.id, 100, 0).await;
    deactivate(&pool, a.id).await;

    assert!(db::quotes::top_quotes(&pool, None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_text_and_source_case_insensitive() {
    let pool = test_pool().await;
    let force = seed_quote(&pool, "May the Force be with you", "Star Wars", "movie", 1).await;
    let manuscripts = seed_quote(&pool, "Рукописи не горят", "Мастер и Маргарита", "book", 1).await;

    let by_text = db::quotes::search_quotes(&pool, "FORCE").await.unwrap();
    assert_eq!(by_text.iter().map(|q| q.id).collect::<Vec<_>>(), vec![force.id]);

    let by_source = db::quotes::search_quotes(&pool, "star wars").await.unwrap();
    assert_eq!(by_source.len(), 1);

    let cyrillic = db::quotes::search_quotes(&pool, "МАРГАРИТА").await.unwrap();
    assert_eq!(cyrillic.iter().map(|q| q.id).collect::<Vec<_>>(), vec![manuscripts.id]);

    assert!(db::quotes::search_quotes(&pool, "nothing like this").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_empty_query_lists_active_newest_first() {
    let pool = test_pool().await;
    let first = seed_quote(&pool, "First", "Source A", "movie", 1).await;
    let second = seed_quote(&pool, "Second", "Source B", "movie", 1).await;
    let third = seed_quote(&pool, "Third", "Source C", "movie", 1).await;
    deactivate(&pool, second.id).await;

    let all = db::quotes::search_quotes(&pool, "  ").await.unwrap();
    assert_eq!(all.iter().map(|q| q.id).collect::<Vec<_>>(), vec![third.id, first.id]);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_session_last_shown_round_trip() {
    let pool = test_pool().await;
    let quote = seed_quote(&pool, "Anything", "Somewhere", "book", 1).await;

    assert_eq!(db::sessions::last_shown(&pool, SESSION_A).await.unwrap(), None);

    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();
    assert_eq!(db::sessions::last_shown(&pool, SESSION_A).await.unwrap(), None);

    db::sessions::set_last_shown(&pool, SESSION_A, quote.id).await.unwrap();
    db::sessions::touch_session(&pool, SESSION_A).await.unwrap();
    assert_eq!(
        db::sessions::last_shown(&pool, SESSION_A).await.unwrap(),
        Some(quote.id)
    );
}
