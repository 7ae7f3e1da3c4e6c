//! Configuration management for the rating-timeline crate
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for the rating engine and the
//! animation timeline.

pub mod animation;
pub mod app;
pub mod rating;

// Re-export commonly used types
pub use animation::AnimationConfig;
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use rating::RatingConfig;
