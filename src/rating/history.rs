//! Rating snapshots and the full per-match history
//!
//! A [`RatingHistory`] holds one snapshot before any match plus one after
//! every match, skipped or not, so snapshot `n` is the state after the `n`-th
//! match of the log.

use crate::error::{RatingError, Result};
use crate::rating::sequential::MatchOutcome;
use crate::types::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ratings of every player at one point of the match sequence
///
/// Values are aligned with the player order of the [`crate::types::MatchLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    ratings: Vec<f64>,
}

impl RatingSnapshot {
    /// Snapshot with every one of `player_count` players at `baseline`
    pub fn baseline(player_count: usize, baseline: f64) -> Self {
        Self {
            ratings: vec![baseline; player_count],
        }
    }

    pub fn get(&self, player_index: usize) -> Option<f64> {
        self.ratings.get(player_index).copied()
    }

    pub(crate) fn set(&mut self, player_index: usize, rating: f64) {
        self.ratings[player_index] = rating;
    }

    pub fn ratings(&self) -> &[f64] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// Rating change information for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub new_rating: f64,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// One row of a ranking table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based place
    pub rank: usize,
    pub player_id: PlayerId,
    pub rating: f64,
}

/// Sort `(player, value)` pairs descending and number them from 1
///
/// Ties keep the player order they came in with.
pub fn rank_descending<'a, I>(entries: I) -> Vec<Standing>
where
    I: IntoIterator<Item = (&'a PlayerId, f64)>,
{
    let mut entries: Vec<(&PlayerId, f64)> = entries.into_iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (player_id, rating))| Standing {
            rank: i + 1,
            player_id: player_id.clone(),
            rating,
        })
        .collect()
}

/// Complete sequence of snapshots produced by the sequential updater
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingHistory {
    players: Vec<PlayerId>,
    index: HashMap<PlayerId, usize>,
    baseline: f64,
    snapshots: Vec<RatingSnapshot>,
    outcomes: Vec<MatchOutcome>,
    /// Player indices listed in each match, scoreable or not
    participants: Vec<Vec<usize>>,
}

impl RatingHistory {
    pub(crate) fn new(players: Vec<PlayerId>, baseline: f64) -> Self {
        let index = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let initial = RatingSnapshot::baseline(players.len(), baseline);
        Self {
            players,
            index,
            baseline,
            snapshots: vec![initial],
            outcomes: Vec::new(),
            participants: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        snapshot: RatingSnapshot,
        outcome: MatchOutcome,
        participants: Vec<usize>,
    ) {
        self.snapshots.push(snapshot);
        self.outcomes.push(outcome);
        self.participants.push(participants);
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Rating every player started from
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Number of snapshots, always one more than the number of matches
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the baseline snapshot always exists
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the last snapshot, equal to the number of matches
    pub fn final_index(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn snapshot(&self, index: usize) -> Option<&RatingSnapshot> {
        self.snapshots.get(index)
    }

    pub fn snapshots(&self) -> &[RatingSnapshot] {
        &self.snapshots
    }

    /// Per-match outcomes in sequence order
    pub fn outcomes(&self) -> &[MatchOutcome] {
        &self.outcomes
    }

    /// Rating of a player after `index` matches
    pub fn rating(&self, player_id: &str, index: usize) -> Option<f64> {
        let column = *self.index.get(player_id)?;
        self.snapshots.get(index)?.get(column)
    }

    /// Rating of a player after the last match
    pub fn final_rating(&self, player_id: &str) -> Option<f64> {
        self.rating(player_id, self.final_index())
    }

    /// Players ranked by final rating, best first
    pub fn standings(&self) -> Vec<Standing> {
        let last = &self.snapshots[self.final_index()];
        rank_descending(self.players.iter().zip(last.ratings().iter().copied()))
    }

    /// Points of the per-player history plot
    ///
    /// Starts at `(0, baseline)` followed by `(n, rating after match n)` for
    /// every match the player was listed in, skipped matches included.
    pub fn played_points(&self, player_id: &str) -> Result<Vec<(usize, f64)>> {
        let column = *self
            .index
            .get(player_id)
            .ok_or_else(|| RatingError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;

        let mut points = vec![(0, self.baseline)];
        for (match_index, listed) in self.participants.iter().enumerate() {
            if listed.contains(&column) {
                let position = match_index + 1;
                let rating = self.snapshots[position].ratings()[column];
                points.push((position, rating));
            }
        }
        Ok(points)
    }

    /// Smallest and largest rating held by anyone from snapshot `from` onward
    pub fn rating_range(&self, from: usize) -> Option<(f64, f64)> {
        self.snapshots
            .iter()
            .skip(from)
            .flat_map(|s| s.ratings().iter().copied())
            .fold(None, |acc, r| match acc {
                None => Some((r, r)),
                Some((lo, hi)) => Some((lo.min(r), hi.max(r))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::sequential::SkipReason;

    fn players() -> Vec<PlayerId> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[test]
    fn test_new_history_has_baseline_snapshot() {
        let history = RatingHistory::new(players(), 1000.0);

        assert_eq!(history.len(), 1);
        assert_eq!(history.final_index(), 0);
        for p in players() {
            assert_eq!(history.rating(&p, 0), Some(1000.0));
            assert_eq!(history.final_rating(&p), Some(1000.0));
        }
        assert_eq!(history.rating("zed", 0), None);
        assert_eq!(history.rating("a", 1), None);
    }

    #[test]
    fn test_standings_and_played_points() {
        let mut history = RatingHistory::new(players(), 1000.0);

        let mut snapshot = history.snapshot(0).unwrap().clone();
        snapshot.set(0, 1010.0);
        snapshot.set(1, 990.0);
        history.push(
            snapshot.clone(),
            MatchOutcome::Skipped {
                match_index: 0,
                reason: SkipReason::EmptyRoster,
            },
            vec![0, 1],
        );
        history.push(
            snapshot,
            MatchOutcome::Skipped {
                match_index: 1,
                reason: SkipReason::EmptyRoster,
            },
            vec![2],
        );

        let standings = history.standings();
        assert_eq!(standings[0].player_id, "a");
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[1].player_id, "c");
        assert_eq!(standings[2].player_id, "b");

        assert_eq!(
            history.played_points("a").unwrap(),
            vec![(0, 1000.0), (1, 1010.0)]
        );
        assert_eq!(
            history.played_points("c").unwrap(),
            vec![(0, 1000.0), (2, 1000.0)]
        );
        assert!(history.played_points("zed").is_err());

        assert_eq!(history.rating_range(0), Some((990.0, 1010.0)));
    }

    #[test]
    fn test_rating_change_delta() {
        let change = RatingChange {
            player_id: "a".to_string(),
            old_rating: 1000.0,
            new_rating: 1012.5,
        };
        assert_eq!(change.delta(), 12.5);
    }
}
