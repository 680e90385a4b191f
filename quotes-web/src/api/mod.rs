//! HTTP API handlers for quotes-web

pub mod health;
pub mod listing;
pub mod quotes;
pub mod votes;

pub use health::health_routes;
pub use listing::{search_quotes, top_quotes};
pub use quotes::{random_quote, submit_quote};
pub use votes::vote;
