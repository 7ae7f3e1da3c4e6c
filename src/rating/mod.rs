//! Rating engine: least-squares strengths and sequential rating history
//!
//! This module provides the batch least-squares ranker and the sequential
//! margin-weighted updater that records a snapshot after every match.

pub mod history;
pub mod least_squares;
pub mod sequential;

// Re-export commonly used types
pub use history::{RatingChange, RatingHistory, RatingSnapshot, Standing};
pub use least_squares::{LeastSquaresRanker, StrengthEstimate};
pub use sequential::{MatchOutcome, SequentialRatingUpdater, SkipReason, TeamUpdate};
