//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Callers that need the kind can downcast to [`RatingError`].

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    /// Rosters of different sizes. Recovered locally: the match is skipped.
    #[error("Match {match_index} has imbalanced teams ({team_a} vs {team_b})")]
    ImbalancedTeams {
        match_index: usize,
        team_a: usize,
        team_b: usize,
    },

    #[error("Match {match_index} has degenerate scores {score_a}-{score_b}")]
    DegenerateScoreInput {
        match_index: usize,
        score_a: i64,
        score_b: i64,
    },

    #[error("Match {match_index} references unknown player: {player_id}")]
    UnknownPlayerReference {
        match_index: usize,
        player_id: String,
    },

    #[error("Match {match_index} lists player {player_id} more than once")]
    DuplicateRosterEntry {
        match_index: usize,
        player_id: String,
    },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Least-squares solve failed: {reason}")]
    SolverFailed { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
