//! # Quotes Common Library
//!
//! Shared code for the quote board service including:
//! - Text normalization and submission-time duplicate detection
//! - Weighted random selection
//! - Database models and schema initialization
//! - Configuration loading
//! - Error taxonomy

pub mod config;
pub mod db;
pub mod dedup;
pub mod error;
pub mod normalize;
pub mod selector;

pub use dedup::Deduplicator;
pub use error::{Error, Result, ValidationError};
pub use normalize::normalize_text;
