//! Request-level operations composed from the store and the common core

pub mod random;
pub mod submission;
pub mod voting;

pub use random::draw_random_quote;
pub use submission::{submit_quote, SubmitQuote};
pub use voting::{vote, VoteSummary};
