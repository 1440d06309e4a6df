use seatplan_core::{Assignment, GuestId, SeatingPreference, Snapshot, TableId};
use seatplan_scoring::{score, ConstraintModel};
use seatplan_test::{guests, scenarios, tables};

use super::*;

fn model(snapshot: Snapshot) -> ConstraintModel {
    ConstraintModel::from_snapshot(snapshot).unwrap()
}

fn ids(names: &[&str]) -> Vec<GuestId> {
    names.iter().map(|n| GuestId::from(*n)).collect()
}

fn plan(rows: &[(&str, &str)]) -> Assignment {
    rows.iter()
        .enumerate()
        .fold(Assignment::new(), |mut plan, (i, (g, t))| {
            plan.place(*g, *t, i as u32);
            plan
        })
}

#[test]
fn test_clean_plan_reports_nothing() {
    let m = model(scenarios::couples_and_feud());
    let p = plan(&[("A", "t1"), ("B", "t1"), ("C", "t1"), ("D", "t2"), ("E", "t2"), ("F", "t2")]);
    let r = report(&m, &p);
    assert!(r.is_empty());
    assert!(r.is_feasible());
}

#[test]
fn test_hard_conflicts_in_family_order() {
    let m = model(scenarios::couples_and_feud());
    let p = plan(&[("A", "t1"), ("B", "t2"), ("C", "t1"), ("D", "t1"), ("E", "t1"), ("F", "t2")]);
    let r = report(&m, &p);

    let kinds: Vec<ConflictKind> = r.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConflictKind::OverCapacity,
            ConflictKind::MustApartViolated,
            ConflictKind::BlockSplit,
        ]
    );

    let over = &r.conflicts()[0];
    assert_eq!(over.tables, vec![TableId::from("t1")]);
    assert_eq!(over.guests, ids(&["A", "C", "D", "E"]));
    assert_eq!(over.weight, 1);

    let apart = &r.conflicts()[1];
    assert_eq!(apart.guests, ids(&["C", "D"]));
    assert_eq!(apart.preference, Some(1));

    // 1-1 split: t1 counts as the majority, B is the one separated
    let split = &r.conflicts()[2];
    assert_eq!(split.guests, ids(&["B"]));
    assert_eq!(split.tables, vec![TableId::from("t1"), TableId::from("t2")]);

    assert_eq!(r.hard_total(), score(&m, &p).hard_violations());
}

#[test]
fn test_oversized_family_split_weight() {
    let m = model(scenarios::oversized_family());
    let p = plan(&[("P", "t2"), ("Q", "t1"), ("R", "t2"), ("S", "t1"), ("T", "t2")]);
    let r = report(&m, &p);
    assert_eq!(r.len(), 1);
    let split = &r.conflicts()[0];
    assert_eq!(split.kind, ConflictKind::BlockSplit);
    assert_eq!(split.weight, 2);
    assert_eq!(split.guests, ids(&["Q", "S"]));
    assert_eq!(split.tables[0], TableId::from("t2"));
}

#[test]
fn test_contradiction_reported_even_when_seated_together() {
    let m = model(scenarios::contradiction_chain());
    let p = plan(&[("A", "t1"), ("B", "t1"), ("C", "t1"), ("D", "t2")]);
    let r = report(&m, &p);
    assert_eq!(r.len(), 1);
    let c = &r.conflicts()[0];
    assert_eq!(c.kind, ConflictKind::IntraBlockContradiction);
    assert_eq!(c.guests, ids(&["A", "C"]));
    assert_eq!(c.preference, Some(2));
    assert_eq!(r.hard_total(), score(&m, &p).hard_violations());
}

#[test]
fn test_soft_conflicts_by_weight_above_threshold() {
    let m = model(scenarios::soft_only());
    // w with y, x with z: every soft preference unmet
    let p = plan(&[("w", "t1"), ("y", "t1"), ("x", "t2"), ("z", "t2")]);

    let r = ConflictReporter::new(5).report(&m, &p);
    let weights: Vec<u64> = r.soft().map(|c| c.weight).collect();
    assert_eq!(weights, vec![10, 7]);
    assert!(r.is_feasible());

    let r = ConflictReporter::new(1).report(&m, &p);
    let weights: Vec<u64> = r.soft().map(|c| c.weight).collect();
    assert_eq!(weights, vec![10, 7, 3]);
    assert!(r.iter().all(|c| c.severity == Severity::Soft));
}

#[test]
fn test_soft_ties_keep_input_order() {
    let m = model(Snapshot::new(
        guests(&["a", "b", "c", "d"]),
        tables(&[("t1", 2), ("t2", 2)]),
        vec![
            SeatingPreference::prefer_together("c", "d", 4),
            SeatingPreference::prefer_together("a", "b", 4),
        ],
    ));
    let p = plan(&[("a", "t1"), ("c", "t1"), ("b", "t2"), ("d", "t2")]);
    let r = ConflictReporter::new(1).report(&m, &p);
    let first: Vec<&GuestId> = r.iter().map(|c| &c.guests[0]).collect();
    assert_eq!(first, vec![&GuestId::from("c"), &GuestId::from("a")]);
}

#[test]
fn test_overbooked_table_lists_guests_in_seat_order() {
    let m = model(scenarios::overbooked());
    let p = plan(&[("c", "big"), ("a", "big"), ("b", "big"), ("d", "big"), ("e", "small")]);
    let r = report(&m, &p);
    assert_eq!(r.len(), 1);
    assert_eq!(r.conflicts()[0].guests, ids(&["c", "a", "b", "d"]));
    assert_eq!(
        r.conflicts()[0].to_string(),
        "table big is over capacity by 1"
    );
}

#[test]
fn test_report_serializes_snake_case_kinds() {
    let m = model(scenarios::contradiction_chain());
    let p = plan(&[("A", "t1"), ("B", "t1"), ("C", "t1"), ("D", "t2")]);
    let json = serde_json::to_value(report(&m, &p)).unwrap();
    assert_eq!(json["conflicts"][0]["kind"], "intra_block_contradiction");
    assert_eq!(json["conflicts"][0]["severity"], "hard");
    assert_eq!(json["conflicts"][0]["guests"][1], "C");
}
