use std::sync::atomic::AtomicBool;

use seatplan_config::SeatingConfig;
use seatplan_core::{
    Assignment, GuestId, RawSnapshot, Snapshot, Table, TableId, ValidationError,
};
use seatplan_test::{guests, scenarios, WeddingBuilder};

use super::*;
use crate::report::ConflictKind;
use crate::termination::TerminationReason;

fn request(snapshot: Snapshot) -> SeatingRequest {
    SeatingRequest::new(snapshot)
        .with_budget(Budget::iterations(2_000))
        .with_seed(42)
}

fn id(s: &str) -> GuestId {
    GuestId::from(s)
}

#[test]
fn test_couples_and_feud_is_feasible() {
    let plan = SeatingSolver::default()
        .solve(request(scenarios::couples_and_feud()))
        .unwrap();

    assert!(plan.is_feasible());
    assert!(plan.report.is_feasible());
    assert_eq!(plan.assignment.len(), 6);
    assert_eq!(plan.records.len(), 6);
    assert!(plan.assignment.seated_together(&id("A"), &id("B")));
    assert!(!plan.assignment.seated_together(&id("C"), &id("D")));
    for t in ["t1", "t2"] {
        assert!(plan.assignment.occupancy(&TableId::from(t)) <= 3);
    }
}

#[test]
fn test_oversized_family_reports_separated_guests() {
    let plan = SeatingSolver::default()
        .solve(request(scenarios::oversized_family()))
        .unwrap();

    assert_eq!(plan.assignment.len(), 5);
    assert_eq!(plan.score.hard_violations(), 2);
    assert_eq!(plan.statistics.forced_splits, 1);

    assert_eq!(plan.report.len(), 1);
    let split = &plan.report.conflicts()[0];
    assert_eq!(split.kind, ConflictKind::BlockSplit);
    assert_eq!(split.weight, 2);
    assert_eq!(split.guests.len(), 2);
    let minority = plan.assignment.table_of(&split.guests[0]).unwrap();
    assert_eq!(plan.assignment.occupancy(minority), 2);
}

#[test]
fn test_invalid_snapshot_fails_before_solving() {
    let snapshot = Snapshot::new(
        guests(&["a"]),
        vec![Table::new("t1", 0)],
        Vec::new(),
    );
    let err = SeatingSolver::default().solve(request(snapshot)).unwrap_err();
    assert!(matches!(
        err,
        SolverError::Validation(ValidationError::NonPositiveCapacity { .. })
    ));
}

#[test]
fn test_warm_start_keeps_seated_guests() {
    let mut current = Assignment::new();
    current.place("A", "t2", 0);
    current.place("C", "t1", 0);

    let plan = SeatingSolver::default()
        .solve(
            SeatingRequest::new(scenarios::couples_and_feud())
                .with_budget(Budget::iterations(0))
                .with_warm_start(current),
        )
        .unwrap();

    let t1 = TableId::from("t1");
    let t2 = TableId::from("t2");
    assert_eq!(plan.assignment.table_of(&id("A")), Some(&t2));
    assert_eq!(plan.assignment.table_of(&id("B")), Some(&t2));
    assert_eq!(plan.assignment.table_of(&id("C")), Some(&t1));
    assert_eq!(plan.assignment.len(), 6);
    assert!(plan.is_feasible());
}

#[test]
fn test_warm_start_with_unknown_guest() {
    let mut current = Assignment::new();
    current.place("nobody", "t1", 0);
    let err = SeatingSolver::default()
        .solve(request(scenarios::couples_and_feud()).with_warm_start(current))
        .unwrap_err();
    assert!(matches!(
        err,
        SolverError::Validation(ValidationError::UnknownAssignedGuest(_))
    ));
}

#[test]
fn test_same_input_same_plan() {
    let snapshot = WeddingBuilder::new(20).feuds(3).seed(4).build();
    let solver = SeatingSolver::default();
    let first = solver
        .solve(request(snapshot.clone()).with_seed(11))
        .unwrap();
    let second = solver.solve(request(snapshot).with_seed(11)).unwrap();

    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.report, second.report);
    assert_eq!(first.records, second.records);
    assert_eq!(first.score, second.score);
}

#[test]
fn test_cancelled_solve_returns_complete_plan() {
    let flag = AtomicBool::new(true);
    let snapshot = WeddingBuilder::new(15).seed(9).build();
    let guests = snapshot.guests.len();
    let plan = SeatingSolver::default()
        .solve_with_flag(request(snapshot), &flag)
        .unwrap();
    assert_eq!(
        plan.statistics.termination,
        Some(TerminationReason::Cancelled)
    );
    assert_eq!(plan.statistics.iterations, 0);
    assert_eq!(plan.assignment.len(), guests);
}

#[test]
fn test_configured_score_target_stops_search() {
    let config = SeatingConfig::from_toml_str(
        r#"
        [termination]
        iteration_limit = 100000
        best_score_limit = "-1000hard/0soft"
        "#,
    )
    .unwrap();
    let solver = SeatingSolver::new(config).unwrap();
    let plan = solver
        .solve(SeatingRequest::new(WeddingBuilder::new(20).seed(5).build()))
        .unwrap();
    assert_eq!(
        plan.statistics.termination,
        Some(TerminationReason::BestScoreReached)
    );
    assert_eq!(plan.statistics.iterations, 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = SeatingConfig::default();
    config.annealing.starting_temperature = -1.0;
    assert!(matches!(
        SeatingSolver::new(config),
        Err(SolverError::Config(_))
    ));
}

#[test]
fn test_statistics_are_filled() {
    let plan = SeatingSolver::default()
        .solve(request(scenarios::couples_and_feud()))
        .unwrap();
    let stats = &plan.statistics;
    assert_eq!(stats.guest_count, 6);
    assert_eq!(stats.table_count, 2);
    assert_eq!(stats.block_count, 5);
    assert!(stats.initial_score.is_some());
    assert_eq!(stats.final_score, Some(plan.score));
    assert!(stats.final_score >= stats.initial_score);
}

#[test]
fn test_solve_from_raw_records() {
    let raw = RawSnapshot::from_json_str(
        r#"{
            "guests": [{"id": "a", "name": "Ann"}, {"id": "b"}, {"id": "c", "plusOne": true}],
            "tables": [{"id": "t1", "capacity": 2, "shape": "round"}, {"id": "t2", "capacity": 2}],
            "preferences": [
                {"guestA": "a", "guestB": "b", "kind": "must_together"},
                {"guestA": "a", "guestB": "c", "kind": "prefer_apart", "weight": 4}
            ]
        }"#,
    )
    .unwrap();
    let request = SeatingRequest::from_raw(raw)
        .unwrap()
        .with_budget(Budget::iterations(500));
    let plan = SeatingSolver::default().solve(request).unwrap();
    assert!(plan.is_feasible());
    assert!(plan.assignment.seated_together(&id("a"), &id("b")));
    assert_eq!(plan.score.soft_score(), 4);
    assert!(plan.report.is_empty());
}

#[test]
fn test_solve_convenience() {
    let plan = solve(scenarios::soft_only(), Budget::iterations(5_000), 1).unwrap();
    assert_eq!(plan.score.soft_score(), 20);
    assert_eq!(plan.records.len(), 4);
}

#[test]
fn test_tight_families_sit_together() {
    for seed in [1, 7, 42] {
        let plan = solve(scenarios::tight_families(), Budget::iterations(50_000), seed).unwrap();
        assert!(plan.is_feasible(), "seed {seed}: {:?}", plan.report);
        assert_eq!(plan.statistics.forced_splits, 0);
        for family in [["a1", "a4"], ["b1", "b3"], ["c1", "c3"]] {
            assert!(plan.assignment.seated_together(&id(family[0]), &id(family[1])));
        }
    }
}
