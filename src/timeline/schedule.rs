//! Mapping of animation frames onto timeline positions

use crate::config::AnimationConfig;
use crate::error::Result;
use crate::rating::RatingHistory;
use crate::timeline::path::PlayerPath;
use crate::types::MatchLog;
use crate::utils::padded_bounds;
use serde::{Deserialize, Serialize};

/// Frame schedule and visible window of one animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSchedule {
    pub fps: u32,
    pub total_runtime_secs: u32,
    pub hold_secs: u32,
    /// First timeline position shown on the x axis
    pub start_position: usize,
    pub final_position: usize,
    pub recency: Option<usize>,
}

impl AnimationSchedule {
    pub fn new(config: &AnimationConfig, log: &MatchLog) -> Result<Self> {
        config.validate()?;
        let final_position = log.final_position();
        let start_position = config
            .past_matches
            .map(|past| final_position.saturating_sub(past))
            .unwrap_or(0);

        Ok(Self {
            fps: config.fps,
            total_runtime_secs: config.total_runtime_secs,
            hold_secs: config.hold_secs,
            start_position,
            final_position,
            recency: config.recency,
        })
    }

    /// Frames of the sweep plus the hold on the final state
    pub fn frame_count(&self) -> usize {
        self.fps as usize * (self.total_runtime_secs as usize + self.hold_secs as usize)
    }

    /// Frame numbers, starting at 1
    pub fn frames(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.frame_count()
    }

    /// Timeline position drawn at `frame`
    ///
    /// The sweep covers `final_position + 1 - start_position` positions in
    /// `total_runtime_secs`; frames of the hold run past the final position,
    /// where sampling returns complete paths.
    pub fn time_at_frame(&self, frame: usize) -> f64 {
        let sweep_frames = self.fps as f64 * self.total_runtime_secs as f64;
        let span = (self.final_position + 1 - self.start_position) as f64;
        self.start_position as f64 + frame as f64 / sweep_frames * span
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        (self.start_position as f64, self.final_position as f64)
    }

    /// Rating axis covering every rating from the start position on, padded
    pub fn y_bounds(&self, history: &RatingHistory) -> (f64, f64) {
        let (lo, hi) = history
            .rating_range(self.start_position)
            .unwrap_or((history.baseline(), history.baseline()));
        padded_bounds(lo, hi)
    }

    /// Paths of players recent enough to be drawn
    pub fn visible_players<'a>(&self, paths: &'a [PlayerPath]) -> Vec<&'a PlayerPath> {
        match self.recency {
            None => paths.iter().collect(),
            Some(recency) => paths
                .iter()
                .filter(|path| {
                    path.last_active_position()
                        .is_some_and(|last| self.final_position - last < recency)
                })
                .collect(),
        }
    }
}
