//! Animation timeline configuration

use serde::{Deserialize, Serialize};

/// Frame budget, path resolution and marker sizing for the animated plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames per second of the rendered animation
    pub fps: u32,
    /// Seconds spent sweeping across the matches
    pub total_runtime_secs: u32,
    /// Seconds the final frame is held after the sweep
    pub hold_secs: u32,
    /// Dense samples per match interval, as a multiple of frames per match
    pub resolution_multiplier: usize,
    /// Lower bound on dense samples per match interval
    pub min_segment_resolution: usize,
    /// Marker size at a position the player sat out
    pub base_marker_size: f64,
    /// Extra marker size at full emphasis
    pub max_additional_marker_size: f64,
    /// Only show players active within this many final matches
    pub recency: Option<usize>,
    /// Only animate the last this many matches
    pub past_matches: Option<usize>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            total_runtime_secs: 5,
            hold_secs: 3,
            resolution_multiplier: 3,
            min_segment_resolution: 40,
            base_marker_size: 0.0,
            max_additional_marker_size: 54.0,
            recency: Some(30),
            past_matches: None,
        }
    }
}

impl AnimationConfig {
    /// Create configuration for a single still image of the final state
    pub fn still() -> Self {
        Self {
            total_runtime_secs: 1,
            hold_secs: 0,
            recency: None,
            ..Self::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.fps == 0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "fps must be greater than 0".to_string(),
            }
            .into());
        }

        if self.total_runtime_secs == 0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "total_runtime_secs must be greater than 0".to_string(),
            }
            .into());
        }

        if self.min_segment_resolution == 0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "min_segment_resolution must be greater than 0".to_string(),
            }
            .into());
        }

        if !(self.base_marker_size.is_finite() && self.base_marker_size >= 0.0)
            || !(self.max_additional_marker_size.is_finite()
                && self.max_additional_marker_size >= 0.0)
        {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "Marker sizes must be non-negative".to_string(),
            }
            .into());
        }

        if self.recency == Some(0) {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "recency must be greater than 0 when set".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
