//! Per-player animation paths
//!
//! A [`PlayerPath`] turns the sparse per-match ratings of one player into a
//! dense curve for smooth animation, together with the emphasis envelope and
//! per-match marker sizes. Paths are built once from a finished
//! [`RatingHistory`] and never change afterwards.

use crate::config::AnimationConfig;
use crate::error::{RatingError, Result};
use crate::rating::RatingHistory;
use crate::timeline::envelope::envelope;
use crate::timeline::spline::InterpolatingSpline;
use crate::types::{MatchLog, PlayerId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Dense sampling density derived from the frame budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResolution {
    /// Whole frames available per match interval
    pub frames_per_match: usize,
    /// Dense samples per match interval
    pub segment_resolution: usize,
}

impl PathResolution {
    /// Resolution for a log of `match_count` matches
    ///
    /// The sweep spends `fps * total_runtime_secs` frames on `match_count + 1`
    /// intervals; each interval gets a multiple of its frame share, but never
    /// fewer than `min_segment_resolution` samples.
    pub fn for_matches(config: &AnimationConfig, match_count: usize) -> Self {
        let total_frames = config.fps as usize * config.total_runtime_secs as usize;
        let frames_per_match = total_frames / (match_count + 1);
        let segment_resolution = (config.resolution_multiplier * frames_per_match)
            .max(config.min_segment_resolution)
            .max(1);
        Self {
            frames_per_match,
            segment_resolution,
        }
    }
}

/// Precomputed geometry of one player's rating curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPath {
    player_id: PlayerId,
    support: Vec<usize>,
    samples: Vec<f64>,
    active: Vec<bool>,
    marker_sizes: Vec<f64>,
    dense_x: Vec<f64>,
    dense_y: Vec<f64>,
    envelope: Vec<f64>,
    segment_resolution: usize,
}

impl PlayerPath {
    /// Path of a player who never appears in any roster
    pub fn empty(player_id: PlayerId, segment_resolution: usize) -> Self {
        Self {
            player_id,
            support: Vec::new(),
            samples: Vec::new(),
            active: Vec::new(),
            marker_sizes: Vec::new(),
            dense_x: Vec::new(),
            dense_y: Vec::new(),
            envelope: Vec::new(),
            segment_resolution,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Timeline positions with a defined rating, starting one before the debut
    pub fn support(&self) -> &[usize] {
        &self.support
    }

    /// Rating at each support position
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Whether the player took part in the match at each support position
    pub fn active(&self) -> &[bool] {
        &self.active
    }

    pub fn marker_sizes(&self) -> &[f64] {
        &self.marker_sizes
    }

    pub fn dense_x(&self) -> &[f64] {
        &self.dense_x
    }

    pub fn dense_y(&self) -> &[f64] {
        &self.dense_y
    }

    /// Emphasis at each dense sample, in `[0, 1]`
    pub fn envelope(&self) -> &[f64] {
        &self.envelope
    }

    pub fn segment_resolution(&self) -> usize {
        self.segment_resolution
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    /// First position the player played at
    pub fn debut_position(&self) -> Option<usize> {
        self.support.first().map(|&x0| x0 + 1)
    }

    /// Last position the player played at
    pub fn last_active_position(&self) -> Option<usize> {
        self.support
            .iter()
            .zip(&self.active)
            .rev()
            .find(|(_, &active)| active)
            .map(|(&position, _)| position)
    }
}

/// Builds [`PlayerPath`]s from a finished history
#[derive(Debug, Clone)]
pub struct PlayerPathBuilder {
    config: AnimationConfig,
}

impl PlayerPathBuilder {
    /// Create a new path builder
    pub fn new(config: AnimationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn resolution(&self, log: &MatchLog) -> PathResolution {
        PathResolution::for_matches(&self.config, log.matches().len())
    }

    /// Build paths for every player of the log, in player order
    ///
    /// Players are independent, so the work runs on the rayon pool.
    pub fn build(&self, history: &RatingHistory, log: &MatchLog) -> Result<Vec<PlayerPath>> {
        Self::check_inputs(history, log)?;
        let resolution = self.resolution(log);
        debug!(
            "Building paths at {} samples per match ({} frames per match)",
            resolution.segment_resolution, resolution.frames_per_match
        );

        let paths = log
            .players()
            .par_iter()
            .map(|player_id| self.build_with(player_id, history, log, resolution))
            .collect::<Result<Vec<_>>>()?;

        info!("Built animation paths for {} players", paths.len());
        Ok(paths)
    }

    /// Build the path of a single player
    pub fn build_player(
        &self,
        player_id: &str,
        history: &RatingHistory,
        log: &MatchLog,
    ) -> Result<PlayerPath> {
        Self::check_inputs(history, log)?;
        self.build_with(player_id, history, log, self.resolution(log))
    }

    fn check_inputs(history: &RatingHistory, log: &MatchLog) -> Result<()> {
        if history.len() != log.matches().len() + 1 || history.players() != log.players() {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Rating history ({} snapshots) was not produced from this log ({} matches)",
                    history.len(),
                    log.matches().len()
                ),
            }
            .into());
        }
        Ok(())
    }

    fn build_with(
        &self,
        player_id: &str,
        history: &RatingHistory,
        log: &MatchLog,
        resolution: PathResolution,
    ) -> Result<PlayerPath> {
        if log.player_index(player_id).is_none() {
            return Err(RatingError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
            .into());
        }

        let res = resolution.segment_resolution;
        let active_positions = log.active_positions(player_id);
        let Some(&debut) = active_positions.first() else {
            return Ok(PlayerPath::empty(player_id.to_string(), res));
        };

        let support: Vec<usize> = (debut - 1..=log.final_position()).collect();
        let samples: Vec<f64> = support
            .iter()
            .map(|&position| {
                history.rating(player_id, position).ok_or_else(|| {
                    anyhow::Error::from(RatingError::PlayerNotFound {
                        player_id: player_id.to_string(),
                    })
                })
            })
            .collect::<Result<_>>()?;

        let active: Vec<bool> = support
            .iter()
            .map(|position| active_positions.binary_search(position).is_ok())
            .collect();
        let marker_sizes = active
            .iter()
            .map(|&played| {
                if played {
                    self.config.base_marker_size + self.config.max_additional_marker_size
                } else {
                    self.config.base_marker_size
                }
            })
            .collect();

        let knots: Vec<f64> = support.iter().map(|&p| p as f64).collect();
        let spline = InterpolatingSpline::fit(&knots, &samples)?;

        let x0 = knots[0];
        let dense_len = res * (support.len() - 1) + 1;
        let dense_x: Vec<f64> = (0..dense_len)
            .map(|j| x0 + j as f64 / res as f64)
            .collect();
        let dense_y: Vec<f64> = dense_x
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                // Knots carry the sample itself rather than its floating-point echo
                if j % res == 0 {
                    samples[j / res]
                } else {
                    spline.evaluate(x)
                }
            })
            .collect();
        let envelope = dense_x
            .iter()
            .map(|&x| envelope(x, &active_positions))
            .collect();

        Ok(PlayerPath {
            player_id: player_id.to_string(),
            support,
            samples,
            active,
            marker_sizes,
            dense_x,
            dense_y,
            envelope,
            segment_resolution: res,
        })
    }
}
