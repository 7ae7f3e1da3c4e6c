//! Common types used throughout the rating engine

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Unique identifier for players
pub type PlayerId = String;

/// One of the two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

/// A single normalized match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub score_a: i64,
    pub score_b: i64,
}

impl MatchRecord {
    pub fn new<A, B>(team_a: A, team_b: B, score_a: i64, score_b: i64) -> Self
    where
        A: IntoIterator,
        A::Item: Into<PlayerId>,
        B: IntoIterator,
        B::Item: Into<PlayerId>,
    {
        Self {
            team_a: team_a.into_iter().map(Into::into).collect(),
            team_b: team_b.into_iter().map(Into::into).collect(),
            score_a,
            score_b,
        }
    }

    /// Roster of the given side
    pub fn roster(&self, side: TeamSide) -> &[PlayerId] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    /// Score of the given side
    pub fn score(&self, side: TeamSide) -> i64 {
        match side {
            TeamSide::A => self.score_a,
            TeamSide::B => self.score_b,
        }
    }

    /// Whether the rosters are non-empty and of equal size
    pub fn is_scoreable(&self) -> bool {
        !self.team_a.is_empty() && self.team_a.len() == self.team_b.len()
    }

    /// Whether the player is listed on either side
    pub fn involves(&self, player_id: &str) -> bool {
        self.team_a.iter().chain(&self.team_b).any(|p| p == player_id)
    }

    /// Larger of the two scores
    pub fn max_score(&self) -> i64 {
        self.score_a.max(self.score_b)
    }

    /// Reject score pairs the outcome arithmetic cannot handle
    pub fn validate_scores(&self, match_index: usize) -> Result<()> {
        if self.score_a < 0 || self.score_b < 0 || (self.score_a == 0 && self.score_b == 0) {
            return Err(RatingError::DegenerateScoreInput {
                match_index,
                score_a: self.score_a,
                score_b: self.score_b,
            }
            .into());
        }
        Ok(())
    }

    fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.team_a.iter().chain(&self.team_b)
    }
}

/// Serialized form of a match log, as handed over by the ingestion side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchLogInput {
    /// Declared player set; derived from the rosters when absent
    #[serde(default)]
    pub players: Option<Vec<PlayerId>>,
    pub matches: Vec<MatchRecord>,
}

/// Validated, ordered match log with its deduplicated player set
#[derive(Debug, Clone)]
pub struct MatchLog {
    players: Vec<PlayerId>,
    index: HashMap<PlayerId, usize>,
    matches: Vec<MatchRecord>,
}

impl MatchLog {
    /// Build a log whose player set is every name appearing in a roster
    pub fn new(matches: Vec<MatchRecord>) -> Result<Self> {
        let players: BTreeSet<PlayerId> = matches
            .iter()
            .flat_map(|m| m.players().cloned())
            .collect();
        Self::with_players(players, matches)
    }

    /// Build a log against a declared player set
    ///
    /// Every roster entry must be declared. Negative scores are rejected.
    ///
    /// A player may appear only once per match: listing the same id on both
    /// rosters, or twice on one, fails with
    /// [`RatingError::DuplicateRosterEntry`], an error kind of its own next to
    /// the unknown-player and score checks.
    pub fn with_players<I>(players: I, matches: Vec<MatchRecord>) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<PlayerId>,
    {
        let players: Vec<PlayerId> = players
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<PlayerId, usize> = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        for (match_index, record) in matches.iter().enumerate() {
            if record.score_a < 0 || record.score_b < 0 {
                return Err(RatingError::DegenerateScoreInput {
                    match_index,
                    score_a: record.score_a,
                    score_b: record.score_b,
                }
                .into());
            }

            let mut seen = HashSet::new();
            for player_id in record.players() {
                if !index.contains_key(player_id) {
                    return Err(RatingError::UnknownPlayerReference {
                        match_index,
                        player_id: player_id.clone(),
                    }
                    .into());
                }
                if !seen.insert(player_id) {
                    return Err(RatingError::DuplicateRosterEntry {
                        match_index,
                        player_id: player_id.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(Self {
            players,
            index,
            matches,
        })
    }

    /// Sorted, deduplicated player set
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Column of a player in snapshots and in the least-squares system
    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.index.get(player_id).copied()
    }

    /// Timeline position of the last match (0 for an empty log)
    pub fn final_position(&self) -> usize {
        self.matches.len()
    }

    /// Timeline positions (`match index + 1`) of every match listing the player
    pub fn active_positions(&self, player_id: &str) -> Vec<usize> {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.involves(player_id))
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl TryFrom<MatchLogInput> for MatchLog {
    type Error = anyhow::Error;

    fn try_from(input: MatchLogInput) -> Result<Self> {
        match input.players {
            Some(players) => MatchLog::with_players(players, input.matches),
            None => MatchLog::new(input.matches),
        }
    }
}
