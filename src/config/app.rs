//! Main application configuration
//!
//! This module defines the top-level configuration structure, including
//! environment variable loading, TOML file loading and validation.

use crate::config::{AnimationConfig, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub animation: AnimationConfig,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "rating-timeline".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Parse an optional count where a negative value means "unlimited"
fn parse_optional_count(name: &str, value: &str) -> Result<Option<usize>> {
    let parsed: i64 = value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))?;
    Ok(usize::try_from(parsed).ok())
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(baseline) = env::var("BASELINE_RATING") {
            self.rating.baseline_rating = baseline
                .parse()
                .map_err(|_| anyhow!("Invalid BASELINE_RATING value: {}", baseline))?;
        }
        if let Ok(scale) = env::var("RATING_SCALE") {
            self.rating.scale = scale
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_SCALE value: {}", scale))?;
        }
        if let Ok(increment) = env::var("BASE_INCREMENT") {
            self.rating.base_increment = increment
                .parse()
                .map_err(|_| anyhow!("Invalid BASE_INCREMENT value: {}", increment))?;
        }
        if let Ok(k) = env::var("K_FACTOR") {
            self.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k))?;
        }

        // Animation settings
        if let Ok(fps) = env::var("ANIMATION_FPS") {
            self.animation.fps = fps
                .parse()
                .map_err(|_| anyhow!("Invalid ANIMATION_FPS value: {}", fps))?;
        }
        if let Ok(runtime) = env::var("ANIMATION_RUNTIME_SECONDS") {
            self.animation.total_runtime_secs = runtime
                .parse()
                .map_err(|_| anyhow!("Invalid ANIMATION_RUNTIME_SECONDS value: {}", runtime))?;
        }
        if let Ok(recency) = env::var("RECENCY") {
            self.animation.recency = parse_optional_count("RECENCY", &recency)?;
        }
        if let Ok(past) = env::var("PAST_MATCHES") {
            self.animation.past_matches = parse_optional_count("PAST_MATCHES", &past)?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;
    config.animation.validate()?;

    Ok(())
}
