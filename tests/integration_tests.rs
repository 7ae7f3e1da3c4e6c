//! Integration tests for the rating timeline
//!
//! These tests run the whole pipeline: match log validation, the least-squares
//! ranker, the sequential updater, path building and frame sampling.

mod fixtures;

use rating_timeline::config::{AnimationConfig, RatingConfig};
use rating_timeline::rating::{
    LeastSquaresRanker, MatchOutcome, SequentialRatingUpdater, SkipReason,
};
use rating_timeline::timeline::AnimationSchedule;
use rating_timeline::types::{MatchLog, MatchLogInput, MatchRecord};
use rating_timeline::RatingError;

use fixtures::{build_paths, league_log, run_history, sampler_for};

#[test]
fn test_history_length_and_baseline() {
    let log = league_log();
    let history = run_history(&log);

    assert_eq!(history.len(), log.matches().len() + 1);
    for player in log.players() {
        assert_eq!(history.rating(player, 0), Some(1000.0));
    }
}

#[test]
fn test_snapshots_only_change_for_participants() {
    let log = league_log();
    let history = run_history(&log);

    for (match_index, record) in log.matches().iter().enumerate() {
        for player in log.players() {
            if record.involves(player) {
                continue;
            }
            assert_eq!(
                history.rating(player, match_index),
                history.rating(player, match_index + 1),
                "{} changed in match {}",
                player,
                match_index
            );
        }
    }
}

#[test]
fn test_three_player_scenario() {
    let log = MatchLog::with_players(
        ["A", "B", "C"],
        vec![MatchRecord::new(["A"], ["B"], 10, 5)],
    )
    .unwrap();
    let history = run_history(&log);

    let s = 10.0 / 15.0;
    let a = 1000.0 + 0.25 + 10.0 * 10.0 * (s - 0.5);
    let b = 1000.0 + 0.25 + 10.0 * 10.0 * ((1.0 - s) - 0.5);

    assert!((history.rating("A", 1).unwrap() - a).abs() < 1e-9);
    assert!((history.rating("B", 1).unwrap() - b).abs() < 1e-9);
    assert_eq!(history.rating("C", 1), Some(1000.0));
    for p in ["A", "B", "C"] {
        assert_eq!(history.rating(p, 0), Some(1000.0));
    }
}

#[test]
fn test_imbalanced_match_scenario() {
    let log = league_log();
    let history = run_history(&log);

    // Match 3 is 2v1
    assert_eq!(history.snapshot(3), history.snapshot(4));
    assert_eq!(
        history.outcomes()[3],
        MatchOutcome::Skipped {
            match_index: 3,
            reason: SkipReason::ImbalancedTeams {
                team_a: 2,
                team_b: 1
            }
        }
    );

    let ranker = LeastSquaresRanker::new(&RatingConfig::default());
    let (matrix, margins) = ranker.incidence_system(&log);
    assert_eq!(matrix.nrows(), log.matches().len() - 1);
    assert_eq!(margins.len(), log.matches().len() - 1);
    // The 2v1 margin (+7) never shows up as a target
    assert!(margins.iter().all(|&m| m != 7.0));
}

#[test]
fn test_even_match_moves_by_base_increment_only() {
    let log = MatchLog::new(vec![MatchRecord::new(["x"], ["y"], 5, 5)]).unwrap();
    let history = run_history(&log);

    match &history.outcomes()[0] {
        MatchOutcome::Scored { team_a, team_b, .. } => {
            assert_eq!(team_a.expected_score, 0.5);
            assert_eq!(team_a.actual_score, 0.5);
            assert_eq!(team_a.changes[0].delta(), 0.25);
            assert_eq!(team_b.changes[0].delta(), 0.25);
        }
        other => panic!("expected a scored match, got {:?}", other),
    }
}

#[test]
fn test_fatal_inputs_abort_the_run() {
    let unknown = MatchLog::with_players(
        ["alice"],
        vec![MatchRecord::new(["alice"], ["zoe"], 3, 1)],
    )
    .unwrap_err();
    assert!(matches!(
        unknown.downcast_ref::<RatingError>(),
        Some(RatingError::UnknownPlayerReference { .. })
    ));

    let log = MatchLog::new(vec![
        MatchRecord::new(["a"], ["b"], 3, 1),
        MatchRecord::new(["a"], ["b"], 0, 0),
        MatchRecord::new(["a"], ["b"], 3, 1),
    ])
    .unwrap();
    let err = SequentialRatingUpdater::new(RatingConfig::default())
        .unwrap()
        .run(&log)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RatingError>(),
        Some(RatingError::DegenerateScoreInput { match_index: 1, .. })
    ));
}

#[test]
fn test_zero_zero_imbalanced_match_is_only_skipped() {
    // The score arithmetic is never reached for an unscoreable match
    let log = MatchLog::new(vec![
        MatchRecord::new(["a", "c"], ["b"], 0, 0),
        MatchRecord::new(["a"], ["b"], 3, 1),
    ])
    .unwrap();
    let history = run_history(&log);
    assert_eq!(history.len(), 3);
    assert!(!history.outcomes()[0].is_scored());
}

#[test]
fn test_least_squares_orders_dominant_player_first() {
    let log = MatchLog::new(vec![
        MatchRecord::new(["ace"], ["mid"], 10, 2),
        MatchRecord::new(["mid"], ["low"], 10, 3),
        MatchRecord::new(["ace"], ["low"], 10, 0),
        MatchRecord::new(["ace", "low"], ["mid", "low2"], 10, 4),
        MatchRecord::new(["low2"], ["low"], 6, 5),
    ])
    .unwrap();
    let estimate = LeastSquaresRanker::new(&RatingConfig::default())
        .rank(&log)
        .unwrap();

    let ids: Vec<String> = estimate.ranked().into_iter().map(|s| s.player_id).collect();
    assert_eq!(ids, vec!["ace", "mid", "low2", "low"]);
    assert!(estimate.strength("ace") > estimate.strength("mid"));
    assert!(estimate.strength("mid") > estimate.strength("low"));

    // One component of four players leaves only the shared constant free
    assert_eq!(estimate.rank, 3);
    assert_eq!(estimate.components().len(), 1);
    assert!(!estimate.is_disconnected());
}

#[test]
fn test_paths_follow_history() {
    let log = league_log();
    let history = run_history(&log);
    let paths = build_paths(&log, &history);

    assert_eq!(paths.len(), log.players().len());
    for path in &paths {
        let res = path.segment_resolution();
        assert_eq!(*path.support().last().unwrap(), log.final_position());
        for (i, (&position, &rating)) in path.support().iter().zip(path.samples()).enumerate() {
            assert_eq!(history.rating(path.player_id(), position), Some(rating));
            assert!((path.dense_y()[i * res] - rating).abs() < 1e-9);
        }
        assert!(path.envelope().iter().all(|&e| (0.0..=1.0).contains(&e)));
    }

    // erin debuts in match 5 (position 6), support starts at 5
    let erin = paths.iter().find(|p| p.player_id() == "erin").unwrap();
    assert_eq!(erin.support(), &[5, 6, 7]);
    assert_eq!(erin.samples()[0], 1000.0);
}

#[test]
fn test_sampling_through_schedule() {
    let (log, history, sampler) = sampler_for(fixtures::league_matches());
    let schedule = AnimationSchedule::new(&AnimationConfig::default(), &log).unwrap();

    let mut lengths = vec![0usize; sampler.paths().len()];
    for frame_number in schedule.frames() {
        let frame = sampler.sample(schedule.time_at_frame(frame_number));
        for (i, player) in frame.players.iter().enumerate() {
            assert!(player.dense_x.len() >= lengths[i]);
            lengths[i] = player.dense_x.len();
        }
    }

    // The hold frames end on the complete paths
    for (length, path) in lengths.iter().zip(sampler.paths()) {
        assert_eq!(*length, path.dense_x().len());
    }

    let last = sampler.sample(schedule.time_at_frame(schedule.frame_count()));
    let alice = last.player("alice").unwrap();
    assert_eq!(
        alice.samples.last().copied(),
        history.final_rating("alice")
    );
}

#[test]
fn test_json_match_log_pipeline() {
    let json = r#"{
        "players": ["p1", "p2", "p3", "p4"],
        "matches": [
            {"team_a": ["p1", "p2"], "team_b": ["p3", "p4"], "score_a": 10, "score_b": 8},
            {"team_a": ["p1"], "team_b": ["p4"], "score_a": 2, "score_b": 10}
        ]
    }"#;
    let input: MatchLogInput = serde_json::from_str(json).unwrap();
    let log = MatchLog::try_from(input).unwrap();
    let history = run_history(&log);

    let outcomes = serde_json::to_value(history.outcomes()).unwrap();
    assert_eq!(outcomes.as_array().unwrap().len(), 2);
    assert!(history.final_rating("p4").unwrap() > 1000.0);
    assert_eq!(history.standings()[0].player_id, "p4");
}
