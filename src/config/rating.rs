//! Rating engine configuration

use serde::{Deserialize, Serialize};

/// Parameters of the sequential update and the least-squares solve
///
/// The increment and margin factor are tuning values, not invariants: the only
/// property relied upon is that a larger winning margin gives a larger change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating every player holds before their first match
    pub baseline_rating: f64,
    /// Divisor of the rating gap in the logistic expectation
    pub scale: f64,
    /// Flat amount added to every participant of a scored match
    pub base_increment: f64,
    /// Multiplier of `magnitude * (actual - expected)`
    pub k_factor: f64,
    /// Relative singular value cutoff for the least-squares solve
    pub lstsq_rcond: Option<f64>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            baseline_rating: 1000.0,
            scale: 500.0,
            base_increment: 0.25,
            k_factor: 10.0,
            lstsq_rcond: None,
        }
    }
}

impl RatingConfig {
    /// Create conservative configuration (slower rating changes)
    pub fn conservative() -> Self {
        Self {
            k_factor: 5.0,
            base_increment: 0.0,
            ..Self::default()
        }
    }

    /// Create aggressive configuration (faster rating changes)
    pub fn aggressive() -> Self {
        Self {
            k_factor: 20.0,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        let finite = [
            ("baseline_rating", self.baseline_rating),
            ("scale", self.scale),
            ("base_increment", self.base_increment),
            ("k_factor", self.k_factor),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(crate::error::RatingError::ConfigurationError {
                    message: format!("{} must be finite", name),
                }
                .into());
            }
        }

        if self.scale <= 0.0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "Scale must be positive".to_string(),
            }
            .into());
        }

        if self.k_factor < 0.0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "K factor must be non-negative".to_string(),
            }
            .into());
        }

        if let Some(rcond) = self.lstsq_rcond {
            if !(rcond.is_finite() && rcond >= 0.0) {
                return Err(crate::error::RatingError::ConfigurationError {
                    message: "Least-squares rcond must be a non-negative number".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}
