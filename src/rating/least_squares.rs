//! Batch least-squares strength estimation
//!
//! Every scoreable match becomes one row of an incidence system: `+1` for each
//! team A member, `-1` for each team B member, target `score_a - score_b`. The
//! system is solved with an SVD pseudo-inverse, which yields the minimum-norm
//! solution when the match graph leaves strengths under-determined.
//!
//! Strengths are only identified up to a constant within each connected
//! component of the match graph, so comparisons across components carry no
//! meaning. [`StrengthEstimate::components`] exposes the grouping.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::rating::history::{rank_descending, Standing};
use crate::types::{MatchLog, PlayerId};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Static per-player strengths from one solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthEstimate {
    players: Vec<PlayerId>,
    strengths: Vec<f64>,
    /// Number of incidence rows (scoreable matches)
    pub rows: usize,
    /// Numerical rank of the incidence matrix
    pub rank: usize,
    components: Vec<Vec<PlayerId>>,
}

impl StrengthEstimate {
    pub fn strength(&self, player_id: &str) -> Option<f64> {
        self.players
            .iter()
            .position(|p| p == player_id)
            .map(|i| self.strengths[i])
    }

    /// `(player, strength)` pairs in player order
    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, f64)> {
        self.players.iter().zip(self.strengths.iter().copied())
    }

    /// Players ranked by strength, strongest first
    pub fn ranked(&self) -> Vec<Standing> {
        rank_descending(self.iter())
    }

    /// Whether the strengths are not uniquely determined by the matches
    ///
    /// Every row sums to zero, so this holds for any log with players: each
    /// component always leaves at least its additive constant free.
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.players.len()
    }

    /// Whether strengths fall into more than one incomparable group
    pub fn is_disconnected(&self) -> bool {
        self.components.len() > 1
    }

    /// Groups of players linked through scoreable matches
    pub fn components(&self) -> &[Vec<PlayerId>] {
        &self.components
    }
}

/// Minimum-norm least-squares ranker
#[derive(Debug, Clone, Default)]
pub struct LeastSquaresRanker {
    rcond: Option<f64>,
}

impl LeastSquaresRanker {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            rcond: config.lstsq_rcond,
        }
    }

    /// Incidence matrix and margin vector over the scoreable matches
    pub fn incidence_system(&self, log: &MatchLog) -> (DMatrix<f64>, DVector<f64>) {
        let scoreable: Vec<_> = log.matches().iter().filter(|m| m.is_scoreable()).collect();

        let mut matrix = DMatrix::zeros(scoreable.len(), log.players().len());
        let mut margins = DVector::zeros(scoreable.len());

        for (row, record) in scoreable.iter().enumerate() {
            for (roster, sign) in [(&record.team_a, 1.0), (&record.team_b, -1.0)] {
                for player_id in roster {
                    if let Some(column) = log.player_index(player_id) {
                        matrix[(row, column)] = sign;
                    }
                }
            }
            margins[row] = (record.score_a - record.score_b) as f64;
        }

        (matrix, margins)
    }

    /// Solve for a strength per player
    pub fn rank(&self, log: &MatchLog) -> Result<StrengthEstimate> {
        let (matrix, margins) = self.incidence_system(log);
        let (rows, cols) = matrix.shape();
        let components = connected_components(log);

        if rows == 0 || cols == 0 {
            debug!("No scoreable matches, all strengths are zero");
            return Ok(StrengthEstimate {
                players: log.players().to_vec(),
                strengths: vec![0.0; cols],
                rows,
                rank: 0,
                components,
            });
        }

        let rcond = self
            .rcond
            .unwrap_or(f64::EPSILON * rows.max(cols) as f64);

        let svd = matrix.svd(true, true);
        let sigma_max = svd.singular_values.max();
        let eps = rcond * sigma_max;
        let rank = svd.rank(eps);

        let solution = svd
            .solve(&margins, eps)
            .map_err(|reason| RatingError::SolverFailed {
                reason: reason.to_string(),
            })?;

        if components.len() > 1 {
            info!(
                "Least-squares strengths split into groups (rank {} for {} players, {} components)",
                rank,
                cols,
                components.len()
            );
        }

        Ok(StrengthEstimate {
            players: log.players().to_vec(),
            strengths: solution.iter().copied().collect(),
            rows,
            rank,
            components,
        })
    }
}

/// Union-find over players joined by scoreable matches
fn connected_components(log: &MatchLog) -> Vec<Vec<PlayerId>> {
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    let mut parent: Vec<usize> = (0..log.players().len()).collect();
    for record in log.matches().iter().filter(|m| m.is_scoreable()) {
        let columns: Vec<usize> = record
            .team_a
            .iter()
            .chain(&record.team_b)
            .filter_map(|p| log.player_index(p))
            .collect();
        if let Some((&first, rest)) = columns.split_first() {
            for &other in rest {
                let a = find(&mut parent, first);
                let b = find(&mut parent, other);
                if a != b {
                    parent[b] = a;
                }
            }
        }
    }

    let mut groups: Vec<Vec<PlayerId>> = Vec::new();
    let mut root_to_group = std::collections::HashMap::new();
    for (i, player_id) in log.players().iter().enumerate() {
        let root = find(&mut parent, i);
        let group = *root_to_group.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(player_id.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchRecord;

    fn ranker() -> LeastSquaresRanker {
        LeastSquaresRanker::new(&RatingConfig::default())
    }

    #[test]
    fn test_incidence_system_skips_imbalanced() {
        let log = MatchLog::new(vec![
            MatchRecord::new(["a"], ["b"], 10, 5),
            MatchRecord::new(["a", "c"], ["b"], 10, 5),
            MatchRecord::new(["b", "c"], ["a", "d"], 3, 7),
        ])
        .unwrap();

        let (matrix, margins) = ranker().incidence_system(&log);
        assert_eq!(matrix.shape(), (2, 4));
        assert_eq!(matrix.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, -1.0, 0.0, 0.0]);
        assert_eq!(matrix.row(1).iter().copied().collect::<Vec<_>>(), vec![-1.0, 1.0, 1.0, -1.0]);
        assert_eq!(margins.as_slice(), &[5.0, -4.0]);
    }

    #[test]
    fn test_single_match_minimum_norm() {
        let log = MatchLog::with_players(
            ["A", "B", "C"],
            vec![MatchRecord::new(["A"], ["B"], 10, 5)],
        )
        .unwrap();
        let estimate = ranker().rank(&log).unwrap();

        assert!((estimate.strength("A").unwrap() - 2.5).abs() < 1e-9);
        assert!((estimate.strength("B").unwrap() + 2.5).abs() < 1e-9);
        assert!(estimate.strength("C").unwrap().abs() < 1e-9);
        assert_eq!(estimate.rank, 1);
        assert_eq!(estimate.rows, 1);
        assert!(estimate.is_rank_deficient());
        assert_eq!(estimate.components().len(), 2);
        assert_eq!(estimate.ranked()[0].player_id, "A");
    }

    #[test]
    fn test_consistent_chain() {
        let log = MatchLog::new(vec![
            MatchRecord::new(["a"], ["b"], 5, 2),
            MatchRecord::new(["b"], ["c"], 4, 2),
            MatchRecord::new(["a"], ["c"], 6, 1),
        ])
        .unwrap();
        let estimate = ranker().rank(&log).unwrap();

        // Differences are exact; the free constant is fixed by the minimum norm
        assert!((estimate.strength("a").unwrap() - 8.0 / 3.0).abs() < 1e-9);
        assert!((estimate.strength("b").unwrap() + 1.0 / 3.0).abs() < 1e-9);
        assert!((estimate.strength("c").unwrap() + 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(estimate.rank, 2);
        assert_eq!(estimate.components().len(), 1);

        // A fully connected log still leaves the shared constant free
        assert!(estimate.is_rank_deficient());
        assert!(!estimate.is_disconnected());
    }

    #[test]
    fn test_disconnected_graph_is_not_an_error() {
        let log = MatchLog::new(vec![
            MatchRecord::new(["a"], ["b"], 3, 1),
            MatchRecord::new(["c"], ["d"], 1, 3),
        ])
        .unwrap();
        let estimate = ranker().rank(&log).unwrap();

        assert_eq!(estimate.components().len(), 2);
        assert!(estimate.is_rank_deficient());
        assert!(estimate.is_disconnected());
        assert!((estimate.strength("a").unwrap() - 1.0).abs() < 1e-9);
        assert!((estimate.strength("d").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_scoreable_matches() {
        let log = MatchLog::new(vec![MatchRecord::new(["a", "b"], ["c"], 3, 1)]).unwrap();
        let estimate = ranker().rank(&log).unwrap();

        assert_eq!(estimate.rows, 0);
        assert!(estimate.iter().all(|(_, s)| s == 0.0));
        assert_eq!(estimate.components().len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let log = MatchLog::new(vec![
            MatchRecord::new(["a", "b"], ["c", "d"], 10, 7),
            MatchRecord::new(["a", "c"], ["b", "d"], 4, 10),
            MatchRecord::new(["a"], ["e"], 10, 9),
        ])
        .unwrap();
        let first = ranker().rank(&log).unwrap();
        let second = ranker().rank(&log).unwrap();
        assert_eq!(first.ranked(), second.ranked());
    }
}
