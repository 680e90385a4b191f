//! Common error types for the quote board

use thiserror::Error;

/// Common result type for quote board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the quote board crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested quote or source does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request parameter (bad vote action, empty text, unknown kind)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Submission rejected by a quote invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reasons a quote submission is refused
///
/// Only [`ValidationError::NearDuplicate`] can be resolved by the caller
/// resubmitting with confirmation; every other variant requires new input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Quote already exists (id {existing_id})")]
    ExactDuplicate { existing_id: i64 },

    #[error("Source already has {count} quotes, the limit is {capacity}")]
    SourceCapacityExceeded { count: i64, capacity: i64 },

    #[error("Quote is {score}% similar to existing quote {existing_id}")]
    NearDuplicate {
        existing_id: i64,
        score: u8,
        matched_text: String,
    },

    #[error("Weight {weight} is outside the allowed range {min}..={max}")]
    WeightOutOfRange { weight: i64, min: i64, max: i64 },
}

impl ValidationError {
    /// True when a confirmed resubmission can get past this rejection
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ValidationError::NearDuplicate { .. })
    }
}
