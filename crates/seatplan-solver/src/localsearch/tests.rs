use std::sync::atomic::AtomicBool;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seatplan_core::{Assignment, SeatingScore};
use seatplan_scoring::{score, ConstraintModel, ScoreDirector};
use seatplan_test::{guests, scenarios, tables, WeddingBuilder};

use super::*;
use crate::construction::{build_initial, InitialAssignmentBuilder};
use crate::termination::TerminationReason;

fn model(snapshot: seatplan_core::Snapshot) -> ConstraintModel {
    ConstraintModel::from_snapshot(snapshot).unwrap()
}

/// A deliberately bad plan for the soft-only scenario: every pair that
/// wants to sit together is split, and w sits with y.
fn scrambled_soft_only() -> Assignment {
    let mut plan = Assignment::new();
    plan.place("w", "t1", 0);
    plan.place("y", "t1", 1);
    plan.place("x", "t2", 0);
    plan.place("z", "t2", 1);
    plan
}

#[test]
fn test_acceptor_hard_levels_dominate() {
    let acceptor = SimulatedAnnealingAcceptor::new(1.0, 0.01, 0.99);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let last = SeatingScore::of(2, 50);
    assert!(acceptor.is_accepted(last, SeatingScore::of(1, 0), &mut rng));
    assert!(!acceptor.is_accepted(last, SeatingScore::of(3, 500), &mut rng));
    assert!(acceptor.is_accepted(last, SeatingScore::of(2, 51), &mut rng));
    assert!(acceptor.is_accepted(last, SeatingScore::of(2, 50), &mut rng));
}

#[test]
fn test_acceptor_cold_rejects_soft_losses() {
    let mut acceptor = SimulatedAnnealingAcceptor::new(1.0, 1e-9, 1e-3);
    acceptor.step_ended();
    acceptor.step_ended();
    assert!(acceptor.temperature() < 1e-5);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    // exp(-100 / 1e-6) is zero
    for _ in 0..100 {
        assert!(!acceptor.is_accepted(SeatingScore::of(0, 100), SeatingScore::of(0, 0), &mut rng));
    }
}

#[test]
fn test_acceptor_temperature_floor() {
    let mut acceptor = SimulatedAnnealingAcceptor::new(1.0, 0.5, 0.1);
    acceptor.step_ended();
    acceptor.step_ended();
    assert_eq!(acceptor.temperature(), 0.5);
    acceptor.phase_started();
    assert_eq!(acceptor.temperature(), 1.0);
}

#[test]
fn test_sampler_kinds() {
    let couples = model(scenarios::couples_and_feud());
    let sampler = MoveSampler::new(&couples);
    assert_eq!(
        sampler.kinds(),
        &[MoveKind::Swap, MoveKind::RelocateBlock, MoveKind::RelocateGuest]
    );

    let soft = model(scenarios::soft_only());
    assert_eq!(
        MoveSampler::new(&soft).kinds(),
        &[MoveKind::Swap, MoveKind::RelocateGuest]
    );

    let one_table = model(seatplan_core::Snapshot::new(
        guests(&["a", "b"]),
        tables(&[("t1", 2)]),
        Vec::new(),
    ));
    assert!(!MoveSampler::new(&one_table).has_moves());
}

#[test]
fn test_sampler_never_breaks_whole_blocks() {
    let m = model(scenarios::couples_and_feud());
    let mut director = InitialAssignmentBuilder::new(&m).build();
    let sampler = MoveSampler::new(&m);
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let a = m.guest_index(&"A".into()).unwrap();
    let b = m.guest_index(&"B".into()).unwrap();

    for _ in 0..500 {
        match sampler.sample(&director, &mut rng) {
            Some(SeatingMove::Swap { a: x, b: y }) => {
                assert!(![a, b].contains(&x) && ![a, b].contains(&y));
            }
            Some(SeatingMove::RelocateGuest { guest, .. }) => {
                assert!(guest != a && guest != b);
            }
            _ => {}
        }
    }
    // with the block split, its members become movable on their own
    director.relocate(b, 1 - director.table_of(a).unwrap_or(0));
    assert!(director.is_block_split(m.block_of(a)));
}

#[test]
fn test_sampler_respects_capacity_tolerance() {
    let m = model(scenarios::soft_only());
    let director = ScoreDirector::from_assignment(&m, &scrambled_soft_only()).unwrap();
    let sampler = MoveSampler::new(&m);
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    // both tables are full, so only swaps are candidates
    for _ in 0..200 {
        if let Some(candidate) = sampler.sample(&director, &mut rng) {
            assert_eq!(candidate.kind(), MoveKind::Swap);
        }
    }
}

#[test]
fn test_search_finds_soft_optimum() {
    let m = model(scenarios::soft_only());
    let mut director = ScoreDirector::from_assignment(&m, &scrambled_soft_only()).unwrap();
    assert_eq!(director.score(), SeatingScore::of(0, 0));

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let outcome = LocalSearchPhase::new(Budget::iterations(5_000)).solve(&mut director, &mut rng);

    assert_eq!(outcome.best_score, SeatingScore::of(0, 20));
    assert_eq!(outcome.reason, TerminationReason::BestScoreReached);
    assert_eq!(outcome.end_state, SearchState::Converged);
    assert!(outcome.improvements >= 1);
    assert!(outcome.iterations < 5_000);
}

#[test]
fn test_search_repairs_split_block() {
    let m = model(scenarios::couples_and_feud());
    let mut plan = Assignment::new();
    plan.place("A", "t1", 0);
    plan.place("C", "t1", 1);
    plan.place("B", "t2", 0);
    plan.place("D", "t2", 1);
    plan.place("E", "t2", 2);
    plan.place("F", "t1", 2);
    let initial = score(&m, &plan);
    assert_eq!(initial.hard_violations(), 1);

    let best = optimize(&m, &plan, Budget::iterations(2_000), 5).unwrap();
    assert!(score(&m, &best).is_feasible());
    assert_eq!(best.table_of(&"A".into()), best.table_of(&"B".into()));
}

#[test]
fn test_zero_budget_returns_initial() {
    let m = model(scenarios::soft_only());
    let initial = scrambled_soft_only();
    let best = optimize(&m, &initial, Budget::iterations(0), 9).unwrap();
    assert_eq!(best, initial);
}

#[test]
fn test_no_moves_converges_immediately() {
    let m = model(seatplan_core::Snapshot::new(
        guests(&["a", "b"]),
        tables(&[("t1", 2)]),
        Vec::new(),
    ));
    let mut director = InitialAssignmentBuilder::new(&m).build();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let outcome = LocalSearchPhase::new(Budget::iterations(100)).solve(&mut director, &mut rng);
    assert_eq!(outcome.reason, TerminationReason::NoMoves);
    assert_eq!(outcome.end_state, SearchState::Converged);
    assert_eq!(outcome.iterations, 0);
}

#[test]
fn test_external_flag_expires_budget() {
    let m = model(WeddingBuilder::new(20).seed(2).build());
    let mut director = InitialAssignmentBuilder::new(&m).build();
    let before = director.score();
    let flag = AtomicBool::new(true);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let outcome = LocalSearchPhase::new(Budget::iterations(1_000))
        .with_best_score_limit(None)
        .solve_with_flag(&mut director, &mut rng, Some(&flag));
    assert_eq!(outcome.reason, TerminationReason::Cancelled);
    assert_eq!(outcome.end_state, SearchState::BudgetExpired);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.best_score, before);
}

#[test]
fn test_stall_window_converges() {
    let m = model(WeddingBuilder::new(30).seed(8).build());
    let mut director = InitialAssignmentBuilder::new(&m).build();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let outcome = LocalSearchPhase::new(Budget::iterations(1_000_000))
        .with_stall_window(Some(300))
        .solve(&mut director, &mut rng);
    assert!(matches!(
        outcome.reason,
        TerminationReason::StallWindow | TerminationReason::BestScoreReached
    ));
    assert_eq!(outcome.end_state, SearchState::Converged);
    assert!(outcome.iterations < 1_000_000);
}

#[test]
fn test_best_never_worse_than_initial() {
    for seed in 0..5 {
        let m = model(WeddingBuilder::new(25).feuds(5).seed(seed).build());
        let initial = build_initial(&m);
        let before = score(&m, &initial);
        let best = optimize(&m, &initial, Budget::iterations(3_000), seed).unwrap();
        assert!(score(&m, &best) >= before);
    }
}

#[test]
fn test_same_seed_same_result() {
    let m = model(WeddingBuilder::new(25).feuds(4).seed(3).build());
    let initial = build_initial(&m);
    let first = optimize(&m, &initial, Budget::iterations(4_000), 77).unwrap();
    let second = optimize(&m, &initial, Budget::iterations(4_000), 77).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_state_lifecycle() {
    let s = SearchState::Initializing;
    let s = s.advance(None);
    assert_eq!(s, SearchState::Searching);
    let ended = s.advance(Some(TerminationReason::TimeLimit));
    assert_eq!(ended, SearchState::BudgetExpired);
    assert!(ended.advance(None).is_terminal());
    assert_eq!(
        SearchState::Searching.advance(Some(TerminationReason::StallWindow)),
        SearchState::Converged
    );
    assert_eq!(SearchState::Done.advance(None), SearchState::Done);
}
