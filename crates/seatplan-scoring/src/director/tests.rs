use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seatplan_core::{Assignment, SeatingScore, ValidationError};
use seatplan_test::{scenarios, WeddingBuilder};

use super::*;
use crate::scorer::{breakdown, breakdown_of};

fn table_vector(director: &ScoreDirector<'_>) -> Vec<Option<usize>> {
    (0..director.model().guest_count())
        .map(|g| director.table_of(g))
        .collect()
}

fn assert_in_sync(director: &ScoreDirector<'_>) {
    let full = breakdown_of(director.model(), &table_vector(director));
    assert_eq!(director.breakdown(), full);
}

#[test]
fn test_empty_director_scores_contradictions_only() {
    let model = ConstraintModel::from_snapshot(scenarios::contradiction_chain()).unwrap();
    let director = ScoreDirector::new(&model);
    assert_eq!(director.score(), SeatingScore::of(1, 0));
    assert_eq!(director.placed_count(), 0);
    assert!(!director.is_complete());
}

#[test]
fn test_assign_tracks_capacity() {
    let model = ConstraintModel::from_snapshot(scenarios::overbooked()).unwrap();
    let mut director = ScoreDirector::new(&model);
    for g in 0..5 {
        director.assign(g, 1);
    }
    assert_eq!(director.overflow(1), 4);
    assert_eq!(director.remaining_capacity(1), -4);
    assert_eq!(director.score().hard_violations(), 4);

    director.relocate(0, 0);
    director.relocate(1, 0);
    director.relocate(2, 0);
    assert_eq!(director.max_overflow(), 1);
    assert_eq!(director.guests_at(1), &[3, 4]);
    assert_in_sync(&director);
}

#[test]
fn test_block_spread_and_majority() {
    let model = ConstraintModel::from_snapshot(scenarios::oversized_family()).unwrap();
    let mut director = ScoreDirector::new(&model);
    director.assign(0, 1);
    director.assign(1, 0);
    assert!(director.is_block_split(0));
    // 1-1 tie goes to the lower table index
    assert_eq!(director.majority_table(0), Some(0));

    director.assign(2, 1);
    assert_eq!(director.majority_table(0), Some(1));
    assert_eq!(director.block_count_at(0, 1), 2);
    assert_eq!(director.block_placed(0), 3);
    assert_eq!(director.breakdown().split, 1);
}

#[test]
fn test_apart_counted_once_per_table() {
    let model = ConstraintModel::from_snapshot(scenarios::couples_and_feud()).unwrap();
    let c = model.guest_index(&"C".into()).unwrap();
    let d = model.guest_index(&"D".into()).unwrap();
    let mut director = ScoreDirector::new(&model);
    director.assign(c, 0);
    assert_eq!(director.apart_conflicts_at(model.block_of(d), 0), 1);
    director.assign(d, 0);
    assert_eq!(director.breakdown().apart, 1);

    director.relocate(d, 1);
    assert_eq!(director.breakdown().apart, 0);
}

#[test]
fn test_soft_gain_at() {
    let model = ConstraintModel::from_snapshot(scenarios::soft_only()).unwrap();
    let mut director = ScoreDirector::new(&model);
    director.assign(0, 0);
    director.assign(2, 1);
    // x with w earns 10; y is not x's neighbour
    assert_eq!(director.soft_gain_at(1, 0), 10);
    assert_eq!(director.soft_gain_at(1, 1), 0);
    // y apart from w earns 3
    assert_eq!(director.breakdown().soft, 3);
}

#[test]
fn test_swap_exchanges_seats() {
    let model = ConstraintModel::from_snapshot(scenarios::soft_only()).unwrap();
    let mut director = ScoreDirector::new(&model);
    director.assign(0, 0);
    director.assign(2, 0);
    director.assign(1, 1);
    director.assign(3, 1);
    assert_eq!(director.score(), SeatingScore::of(0, 0));

    director.swap(2, 1);
    assert_eq!(director.guests_at(0), &[0, 1]);
    assert_eq!(director.guests_at(1), &[2, 3]);
    assert_eq!(director.score(), SeatingScore::of(0, 20));

    // same table: nothing moves
    director.swap(0, 1);
    assert_eq!(director.guests_at(0), &[0, 1]);
}

#[test]
fn test_from_assignment_keeps_seat_order() {
    let model = ConstraintModel::from_snapshot(scenarios::couples_and_feud()).unwrap();
    let mut plan = Assignment::new();
    plan.place("C", "t1", 5);
    plan.place("A", "t1", 9);
    plan.place("B", "t1", 7);
    plan.place("D", "t2", 0);

    let director = ScoreDirector::from_assignment(&model, &plan).unwrap();
    assert_eq!(director.guests_at(0), &[2, 1, 0]);
    assert_eq!(director.score(), breakdown(&model, &plan).to_score());

    let exported = director.to_assignment();
    assert_eq!(exported.get(&"C".into()).map(|p| p.seat), Some(0));
    assert_eq!(exported.get(&"A".into()).map(|p| p.seat), Some(2));
}

#[test]
fn test_from_assignment_rejects_unknown_table() {
    let model = ConstraintModel::from_snapshot(scenarios::couples_and_feud()).unwrap();
    let mut plan = Assignment::new();
    plan.place("A", "patio", 0);
    let err = ScoreDirector::from_assignment(&model, &plan).unwrap_err();
    assert_eq!(err, ValidationError::UnknownTable("patio".into()));
}

#[test]
fn test_recording_undo_restores_plan_and_score() {
    let model = ConstraintModel::from_snapshot(scenarios::couples_and_feud()).unwrap();
    let mut director = ScoreDirector::new(&model);
    for g in 0..6 {
        director.assign(g, g % 2);
    }
    let seating = director.seating().to_vec();
    let score = director.score();

    let mut recording = RecordingScoreDirector::new(&mut director);
    recording.swap(0, 1);
    recording.relocate_block(0, 1);
    recording.relocate(4, 0);
    assert!(!recording.is_empty());
    recording.undo_changes();
    assert!(recording.is_empty());

    assert_eq!(director.seating(), seating.as_slice());
    assert_eq!(director.score(), score);
    assert_in_sync(&director);
}

#[test]
fn test_recording_commit_keeps_changes() {
    let model = ConstraintModel::from_snapshot(scenarios::soft_only()).unwrap();
    let mut director = ScoreDirector::new(&model);
    director.assign(0, 0);
    director.assign(1, 1);

    let mut recording = RecordingScoreDirector::new(&mut director);
    recording.relocate(1, 0);
    recording.commit();
    recording.undo_changes();
    assert_eq!(director.table_of(1), Some(0));
}

#[test]
fn test_random_moves_match_full_rescore() {
    let snapshot = WeddingBuilder::new(30).table_capacity(6).feuds(6).seed(11).build();
    let model = ConstraintModel::from_snapshot(snapshot).unwrap();
    let tables = model.table_count();
    let guests = model.guest_count();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut director = ScoreDirector::new(&model);
    for g in 0..guests {
        director.assign(g, rng.random_range(0..tables));
    }
    assert_in_sync(&director);

    for step in 0..2_000 {
        let mut recording = RecordingScoreDirector::new(&mut director);
        match step % 3 {
            0 => recording.swap(rng.random_range(0..guests), rng.random_range(0..guests)),
            1 => recording.relocate(rng.random_range(0..guests), rng.random_range(0..tables)),
            _ => recording.relocate_block(
                rng.random_range(0..model.blocks().len()),
                rng.random_range(0..tables),
            ),
        }
        let keep = rng.random_bool(0.5);
        if keep {
            recording.commit();
        } else {
            recording.undo_changes();
        }
        assert_in_sync(&director);
    }
}
