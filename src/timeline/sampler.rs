//! Read-side frame sampling
//!
//! [`FrameSampler`] answers "what should be visible at time `t`" by slicing
//! the precomputed paths. Time is measured in timeline positions, not wall
//! clock. Nothing is recomputed, so sampling is cheap and can run from many
//! threads against the same sampler.

use crate::config::AnimationConfig;
use crate::error::{RatingError, Result};
use crate::timeline::path::PlayerPath;
use serde::Serialize;

/// Moving dot drawn at the tip of a player's line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadMarker {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub emphasis: f64,
}

/// Visible part of one player's path at a given time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerFrame<'a> {
    pub player_id: &'a str,
    /// Support positions already reached
    pub support: &'a [usize],
    pub samples: &'a [f64],
    pub marker_sizes: &'a [f64],
    pub dense_x: &'a [f64],
    pub dense_y: &'a [f64],
    pub envelope: &'a [f64],
    #[serde(skip)]
    marker: MarkerScale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MarkerScale {
    base: f64,
    additional: f64,
}

impl<'a> PlayerFrame<'a> {
    /// Whether the player's line has not started yet
    ///
    /// Renderers still register a legend entry for such players.
    pub fn is_empty(&self) -> bool {
        self.dense_x.is_empty()
    }

    /// Tip of the visible curve, sized by the current emphasis
    pub fn head(&self) -> Option<HeadMarker> {
        let x = *self.dense_x.last()?;
        let y = *self.dense_y.last()?;
        let emphasis = self.envelope.last().copied().unwrap_or(0.0);
        Some(HeadMarker {
            x,
            y,
            size: self.marker.base + emphasis * self.marker.additional,
            emphasis,
        })
    }
}

/// Everything visible at one time value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<'a> {
    pub time: f64,
    pub players: Vec<PlayerFrame<'a>>,
}

impl<'a> Frame<'a> {
    pub fn player(&self, player_id: &str) -> Option<&PlayerFrame<'a>> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}

/// Slices immutable [`PlayerPath`]s by time
#[derive(Debug, Clone)]
pub struct FrameSampler {
    paths: Vec<PlayerPath>,
    marker: MarkerScale,
}

impl FrameSampler {
    pub fn new(paths: Vec<PlayerPath>, config: &AnimationConfig) -> Self {
        Self {
            paths,
            marker: MarkerScale {
                base: config.base_marker_size,
                additional: config.max_additional_marker_size,
            },
        }
    }

    pub fn paths(&self) -> &[PlayerPath] {
        &self.paths
    }

    pub fn path(&self, player_id: &str) -> Result<&PlayerPath> {
        self.paths
            .iter()
            .find(|p| p.player_id() == player_id)
            .ok_or_else(|| {
                RatingError::PlayerNotFound {
                    player_id: player_id.to_string(),
                }
                .into()
            })
    }

    /// Visible geometry of every player at `time`
    pub fn sample(&self, time: f64) -> Frame<'_> {
        Frame {
            time,
            players: self
                .paths
                .iter()
                .map(|path| self.sample_path(path, time))
                .collect(),
        }
    }

    /// Visible geometry of one player at `time`
    pub fn sample_player(&self, player_id: &str, time: f64) -> Result<PlayerFrame<'_>> {
        let path = self.path(player_id)?;
        Ok(self.sample_path(path, time))
    }

    fn sample_path<'a>(&self, path: &'a PlayerPath, time: f64) -> PlayerFrame<'a> {
        // NaN compares false everywhere and so yields empty prefixes
        let sparse = path
            .support()
            .partition_point(|&position| position as f64 <= time);
        let dense = path.dense_x().partition_point(|&x| x <= time);

        PlayerFrame {
            player_id: path.player_id(),
            support: &path.support()[..sparse],
            samples: &path.samples()[..sparse],
            marker_sizes: &path.marker_sizes()[..sparse],
            dense_x: &path.dense_x()[..dense],
            dense_y: &path.dense_y()[..dense],
            envelope: &path.envelope()[..dense],
            marker: self.marker,
        }
    }
}
