//! Test fixtures shared by the integration suites

#![allow(dead_code)]

use rating_timeline::config::{AnimationConfig, RatingConfig};
use rating_timeline::rating::{RatingHistory, SequentialRatingUpdater};
use rating_timeline::timeline::{FrameSampler, PlayerPath, PlayerPathBuilder};
use rating_timeline::types::{MatchLog, MatchRecord};

/// A small league with doubles, singles, an imbalanced match and a late joiner
pub fn league_matches() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new(["alice", "bob"], ["carol", "dave"], 10, 7),
        MatchRecord::new(["alice"], ["carol"], 10, 4),
        MatchRecord::new(["bob", "carol"], ["alice", "dave"], 8, 10),
        MatchRecord::new(["alice", "bob"], ["dave"], 10, 3),
        MatchRecord::new(["dave"], ["bob"], 10, 9),
        MatchRecord::new(["erin", "carol"], ["alice", "bob"], 10, 6),
        MatchRecord::new(["erin"], ["dave"], 5, 10),
    ]
}

pub fn league_log() -> MatchLog {
    MatchLog::new(league_matches()).unwrap()
}

pub fn run_history(log: &MatchLog) -> RatingHistory {
    SequentialRatingUpdater::new(RatingConfig::default())
        .unwrap()
        .run(log)
        .unwrap()
}

pub fn build_paths(log: &MatchLog, history: &RatingHistory) -> Vec<PlayerPath> {
    PlayerPathBuilder::new(AnimationConfig::default())
        .unwrap()
        .build(history, log)
        .unwrap()
}

/// Full pipeline from matches to a sampler
pub fn sampler_for(matches: Vec<MatchRecord>) -> (MatchLog, RatingHistory, FrameSampler) {
    let log = MatchLog::new(matches).unwrap();
    let history = run_history(&log);
    let paths = build_paths(&log, &history);
    let sampler = FrameSampler::new(paths, &AnimationConfig::default());
    (log, history, sampler)
}
