//! Database access layer for quotes-web
//!
//! Functions that take a `SqliteConnection` are used inside transactions by
//! the services; plain reads take the pool.

pub mod quotes;
pub mod sessions;
pub mod sources;
pub mod votes;
