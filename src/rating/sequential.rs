//! Sequential margin-weighted rating updates
//!
//! Matches are folded in order over a running snapshot. The true outcome of a
//! match is the share of points a team scored rather than a win/loss flag, and
//! the size of the adjustment grows with the larger of the two scores.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::rating::history::{RatingChange, RatingHistory, RatingSnapshot};
use crate::types::{MatchLog, MatchRecord, TeamSide};
use crate::utils::mean;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Why a match left every rating untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    ImbalancedTeams { team_a: usize, team_b: usize },
    EmptyRoster,
}

/// Update applied to one side of a scored match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub side: TeamSide,
    /// Mean rating of the roster before the match
    pub average_rating: f64,
    pub expected_score: f64,
    pub actual_score: f64,
    pub changes: Vec<RatingChange>,
}

/// Result of feeding one match through the updater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Scored {
        match_index: usize,
        team_a: TeamUpdate,
        team_b: TeamUpdate,
    },
    Skipped {
        match_index: usize,
        reason: SkipReason,
    },
}

impl MatchOutcome {
    pub fn match_index(&self) -> usize {
        match self {
            MatchOutcome::Scored { match_index, .. } | MatchOutcome::Skipped { match_index, .. } => {
                *match_index
            }
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, MatchOutcome::Scored { .. })
    }
}

/// Elo-family updater producing a full [`RatingHistory`]
#[derive(Debug, Clone)]
pub struct SequentialRatingUpdater {
    config: RatingConfig,
}

impl SequentialRatingUpdater {
    /// Create a new updater
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Logistic expectation of team A's share given both team ratings
    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / self.config.scale))
    }

    /// Share of the total points scored by team A
    ///
    /// Callers must reject a 0-0 score first.
    pub fn actual_score(score_a: i64, score_b: i64) -> f64 {
        let (a, b) = (score_a as f64, score_b as f64);
        a / (a + b)
    }

    /// New rating of one player given their side's actual and expected share
    pub fn adjusted_rating(&self, old_rating: f64, actual: f64, expected: f64, magnitude: f64) -> f64 {
        old_rating + self.config.base_increment + self.config.k_factor * magnitude * (actual - expected)
    }

    /// Apply one match to `ratings` in place
    pub fn rate_match(
        &self,
        match_index: usize,
        record: &MatchRecord,
        log: &MatchLog,
        ratings: &mut RatingSnapshot,
    ) -> Result<MatchOutcome> {
        if record.team_a.is_empty() || record.team_b.is_empty() {
            warn!("Can't score match {} due to an empty roster", match_index);
            return Ok(MatchOutcome::Skipped {
                match_index,
                reason: SkipReason::EmptyRoster,
            });
        }

        if record.team_a.len() != record.team_b.len() {
            let diagnostic = RatingError::ImbalancedTeams {
                match_index,
                team_a: record.team_a.len(),
                team_b: record.team_b.len(),
            };
            warn!("Can't score match: {}", diagnostic);
            return Ok(MatchOutcome::Skipped {
                match_index,
                reason: SkipReason::ImbalancedTeams {
                    team_a: record.team_a.len(),
                    team_b: record.team_b.len(),
                },
            });
        }

        record.validate_scores(match_index)?;

        let columns_a = Self::columns(match_index, &record.team_a, log)?;
        let columns_b = Self::columns(match_index, &record.team_b, log)?;

        let average = |columns: &[usize]| -> f64 {
            let values: Vec<f64> = columns.iter().filter_map(|&c| ratings.get(c)).collect();
            mean(&values).unwrap_or(self.config.baseline_rating)
        };
        let rating_a = average(&columns_a);
        let rating_b = average(&columns_b);

        let expected_a = self.expected_score(rating_a, rating_b);
        let actual_a = Self::actual_score(record.score_a, record.score_b);
        let magnitude = record.max_score() as f64;

        let team_a = self.update_team(
            TeamSide::A,
            record,
            &columns_a,
            rating_a,
            actual_a,
            expected_a,
            magnitude,
            ratings,
        );
        let team_b = self.update_team(
            TeamSide::B,
            record,
            &columns_b,
            rating_b,
            1.0 - actual_a,
            1.0 - expected_a,
            magnitude,
            ratings,
        );

        debug!(
            match_index,
            expected_a, actual_a, magnitude, "Scored match {}-{}", record.score_a, record.score_b
        );

        Ok(MatchOutcome::Scored {
            match_index,
            team_a,
            team_b,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn update_team(
        &self,
        side: TeamSide,
        record: &MatchRecord,
        columns: &[usize],
        average_rating: f64,
        actual: f64,
        expected: f64,
        magnitude: f64,
        ratings: &mut RatingSnapshot,
    ) -> TeamUpdate {
        let changes = record
            .roster(side)
            .iter()
            .zip(columns)
            .map(|(player_id, &column)| {
                let old_rating = ratings.ratings()[column];
                let new_rating = self.adjusted_rating(old_rating, actual, expected, magnitude);
                ratings.set(column, new_rating);
                RatingChange {
                    player_id: player_id.clone(),
                    old_rating,
                    new_rating,
                }
            })
            .collect();

        TeamUpdate {
            side,
            average_rating,
            expected_score: expected,
            actual_score: actual,
            changes,
        }
    }

    fn columns(match_index: usize, roster: &[String], log: &MatchLog) -> Result<Vec<usize>> {
        roster
            .iter()
            .map(|player_id| {
                log.player_index(player_id).ok_or_else(|| {
                    anyhow::Error::from(RatingError::UnknownPlayerReference {
                        match_index,
                        player_id: player_id.clone(),
                    })
                })
            })
            .collect()
    }

    /// Run every match of the log and collect the history
    pub fn run(&self, log: &MatchLog) -> Result<RatingHistory> {
        let mut history = RatingHistory::new(log.players().to_vec(), self.config.baseline_rating);
        let mut ratings = RatingSnapshot::baseline(log.players().len(), self.config.baseline_rating);

        for (match_index, record) in log.matches().iter().enumerate() {
            let outcome = self.rate_match(match_index, record, log, &mut ratings)?;
            let participants = record
                .team_a
                .iter()
                .chain(&record.team_b)
                .filter_map(|p| log.player_index(p))
                .collect();
            history.push(ratings.clone(), outcome, participants);
        }

        let skipped = history.outcomes().iter().filter(|o| !o.is_scored()).count();
        info!(
            "Rated {} matches for {} players ({} skipped)",
            log.matches().len(),
            log.players().len(),
            skipped
        );

        Ok(history)
    }
}
