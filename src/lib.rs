//! Rating Timeline - team match ratings and their animated history
//!
//! This crate turns a chronological log of team-vs-team results into
//! least-squares strengths, a per-match rating history, and the geometry
//! needed to animate how every player's rating evolved.

pub mod config;
pub mod error;
pub mod rating;
pub mod timeline;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{LeastSquaresRanker, RatingHistory, SequentialRatingUpdater};
pub use timeline::{FrameSampler, PlayerPathBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
