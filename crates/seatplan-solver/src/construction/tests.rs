use seatplan_core::{
    Assignment, GuestId, SeatingPreference, SeatingScore, Snapshot, TableId, ValidationError,
};
use seatplan_scoring::{score, ConstraintModel};
use seatplan_test::{guests, scenarios, tables, WeddingBuilder};

use super::*;
use crate::report::{report, ConflictKind};

fn model(snapshot: Snapshot) -> ConstraintModel {
    ConstraintModel::from_snapshot(snapshot).unwrap()
}

fn table_of(plan: &Assignment, guest: &str) -> String {
    plan.table_of(&guest.into())
        .map(|t| t.as_str().to_owned())
        .unwrap_or_default()
}

#[test]
fn test_feasible_instance_builds_without_violations() {
    let m = model(scenarios::couples_and_feud());
    let plan = build_initial(&m);
    assert_eq!(plan.len(), 6);
    assert_eq!(table_of(&plan, "A"), table_of(&plan, "B"));
    assert_ne!(table_of(&plan, "C"), table_of(&plan, "D"));
    assert!(score(&m, &plan).is_feasible());
}

#[test]
fn test_oversized_block_is_force_split() {
    let m = model(scenarios::oversized_family());
    let mut builder = InitialAssignmentBuilder::new(&m);
    let director = builder.build();
    assert_eq!(builder.forced_splits(), 1);
    assert!(director.is_complete());
    assert_eq!(director.occupancy(0), 3);
    assert_eq!(director.occupancy(1), 2);
    // two members away from the majority table
    assert_eq!(director.score(), SeatingScore::of(2, 0));
}

#[test]
fn test_tight_packing_avoids_needless_split() {
    let m = model(scenarios::tight_families());
    let mut builder = InitialAssignmentBuilder::new(&m);
    let director = builder.build();
    let plan = director.to_assignment();

    assert_eq!(builder.forced_splits(), 0);
    assert_eq!(table_of(&plan, "a1"), "small");
    for g in ["b1", "b2", "b3", "c1", "c2", "c3"] {
        assert_eq!(table_of(&plan, g), "big", "{g}");
    }
    assert_eq!(director.score(), SeatingScore::of(0, 0));
}

#[test]
fn test_apart_tables_force_split_of_fitting_block() {
    // c fits t1 and t2 by size, but a and b sit there and c must avoid both
    let m = model(Snapshot::new(
        guests(&["a1", "a2", "a3", "b1", "b2", "b3", "c1", "c2", "c3"]),
        tables(&[("t1", 6), ("t2", 6), ("t3", 2)]),
        vec![
            SeatingPreference::must_together("a1", "a2"),
            SeatingPreference::must_together("a2", "a3"),
            SeatingPreference::must_together("b1", "b2"),
            SeatingPreference::must_together("b2", "b3"),
            SeatingPreference::must_together("c1", "c2"),
            SeatingPreference::must_together("c2", "c3"),
            SeatingPreference::must_apart("a1", "b1"),
            SeatingPreference::must_apart("c1", "a1"),
            SeatingPreference::must_apart("c1", "b1"),
        ],
    ));
    let mut builder = InitialAssignmentBuilder::new(&m);
    let director = builder.build();
    let plan = director.to_assignment();

    assert!(builder.forced_splits() > 0);
    assert!(director.is_complete());
    assert_eq!(director.max_overflow(), 0);
    assert_eq!(table_of(&plan, "c1"), "t3");
    assert_eq!(table_of(&plan, "c2"), "t3");

    let conflicts = report(&m, &plan);
    let split = conflicts
        .iter()
        .find(|c| c.kind == ConflictKind::BlockSplit)
        .unwrap();
    assert_eq!(split.guests, vec![GuestId::from("c3")]);
    assert_eq!(split.weight, 1);
    assert!(conflicts
        .iter()
        .any(|c| c.kind == ConflictKind::MustApartViolated));
    assert_eq!(conflicts.hard_total(), 2);
    assert_eq!(score(&m, &plan), SeatingScore::of(2, 0));
}

#[test]
fn test_overbooked_places_everyone() {
    let m = model(scenarios::overbooked());
    let plan = build_initial(&m);
    assert_eq!(plan.len(), 5);
    assert_eq!(plan.occupancy(&TableId::from("small")), 1);
    assert_eq!(plan.occupancy(&TableId::from("big")), 4);
    assert_eq!(score(&m, &plan).hard_violations(), 1);
}

#[test]
fn test_contradiction_still_builds() {
    let m = model(scenarios::contradiction_chain());
    let plan = build_initial(&m);
    assert_eq!(plan.len(), 4);
    assert_eq!(table_of(&plan, "A"), table_of(&plan, "C"));
    assert_eq!(score(&m, &plan), SeatingScore::of(1, 0));
}

#[test]
fn test_singletons_follow_soft_preferences() {
    let m = model(scenarios::soft_only());
    let plan = build_initial(&m);
    assert_eq!(table_of(&plan, "w"), table_of(&plan, "x"));
    assert_eq!(table_of(&plan, "y"), table_of(&plan, "z"));
    assert_eq!(score(&m, &plan), SeatingScore::of(0, 20));
}

#[test]
fn test_apart_blocks_land_at_different_tables() {
    let m = model(Snapshot::new(
        guests(&["a1", "a2", "b1", "b2"]),
        tables(&[("t1", 4), ("t2", 2)]),
        vec![
            SeatingPreference::must_together("a1", "a2"),
            SeatingPreference::must_together("b1", "b2"),
            SeatingPreference::must_apart("a1", "b2"),
        ],
    ));
    let plan = build_initial(&m);
    assert_eq!(table_of(&plan, "a1"), "t1");
    assert_eq!(table_of(&plan, "b1"), "t2");
    assert!(score(&m, &plan).is_feasible());
}

#[test]
fn test_empty_model_builds_empty_plan() {
    let m = ConstraintModel::build(Vec::new(), Vec::new(), Vec::new()).unwrap();
    assert!(build_initial(&m).is_empty());
}

#[test]
fn test_warm_start_keeps_existing_seats() {
    let m = model(scenarios::couples_and_feud());
    let mut warm = Assignment::new();
    warm.place("C", "t1", 0);
    warm.place("A", "t2", 0);

    let mut builder = InitialAssignmentBuilder::new(&m);
    let director = builder.build_from(&warm).unwrap();
    let plan = director.to_assignment();

    assert_eq!(table_of(&plan, "C"), "t1");
    assert_eq!(table_of(&plan, "A"), "t2");
    // the rest of A's block joins A
    assert_eq!(table_of(&plan, "B"), "t2");
    assert_eq!(table_of(&plan, "D"), "t2");
    assert_eq!(plan.len(), 6);
    assert!(director.score().is_feasible());
}

#[test]
fn test_warm_start_rejects_unknown_guest() {
    let m = model(scenarios::couples_and_feud());
    let mut warm = Assignment::new();
    warm.place("Z", "t1", 0);
    let err = InitialAssignmentBuilder::new(&m).build_from(&warm).unwrap_err();
    assert_eq!(err, ValidationError::UnknownAssignedGuest("Z".into()));
}

#[test]
fn test_generated_wedding_respects_capacity() {
    let snapshot = WeddingBuilder::new(60).table_capacity(8).spare_tables(2).seed(5).build();
    let m = model(snapshot);
    let director = InitialAssignmentBuilder::new(&m).build();
    assert!(director.is_complete());
    assert_eq!(director.max_overflow(), 0);
}

#[test]
fn test_construction_is_deterministic() {
    let snapshot = WeddingBuilder::new(40).seed(9).build();
    let m = model(snapshot);
    assert_eq!(build_initial(&m), build_initial(&m));
}
