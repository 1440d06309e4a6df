//! Small seating problems with known expected outcomes.

use seatplan_core::{SeatingPreference, Snapshot};

use crate::{guests, tables};

/// 6 guests, 2 tables of 3. A and B must sit together, C and D must not.
///
/// A plan with zero hard violations exists.
pub fn couples_and_feud() -> Snapshot {
    Snapshot::new(
        guests(&["A", "B", "C", "D", "E", "F"]),
        tables(&[("t1", 3), ("t2", 3)]),
        vec![
            SeatingPreference::must_together("A", "B"),
            SeatingPreference::must_apart("C", "D"),
        ],
    )
}

/// 5 guests who must all sit together, but no table seats more than 3.
///
/// The block has to be force-split; 2 guests end up separated.
pub fn oversized_family() -> Snapshot {
    let ids = ["P", "Q", "R", "S", "T"];
    let mut preferences = Vec::new();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            preferences.push(SeatingPreference::must_together(*a, *b));
        }
    }
    Snapshot::new(guests(&ids), tables(&[("t1", 3), ("t2", 3)]), preferences)
}

/// 5 guests, 4 seats. Some table must overflow.
pub fn overbooked() -> Snapshot {
    Snapshot::new(
        guests(&["a", "b", "c", "d", "e"]),
        tables(&[("big", 3), ("small", 1)]),
        Vec::new(),
    )
}

/// A-B and B-C must sit together, yet A and C must sit apart.
///
/// The contradiction only exists through the chain, so validation accepts it
/// and the report has to flag it.
pub fn contradiction_chain() -> Snapshot {
    Snapshot::new(
        guests(&["A", "B", "C", "D"]),
        tables(&[("t1", 4), ("t2", 4)]),
        vec![
            SeatingPreference::must_together("A", "B"),
            SeatingPreference::must_together("B", "C"),
            SeatingPreference::must_apart("A", "C"),
        ],
    )
}

/// Only soft preferences: 4 guests, 2 tables of 2.
///
/// The best plan seats {w, x} and {y, z} for a soft score of 10 + 7 + 3.
pub fn soft_only() -> Snapshot {
    Snapshot::new(
        guests(&["w", "x", "y", "z"]),
        tables(&[("t1", 2), ("t2", 2)]),
        vec![
            SeatingPreference::prefer_together("w", "x", 10),
            SeatingPreference::prefer_together("y", "z", 7),
            SeatingPreference::prefer_apart("w", "y", 3),
        ],
    )
}

/// Three families of 4, 3 and 3 guests; tables of 6 and 4.
///
/// Seating the family of 4 at the bigger table strands the third family.
/// The plan with both families of 3 at `big` and the 4 at `small` is
/// feasible.
pub fn tight_families() -> Snapshot {
    Snapshot::new(
        guests(&["a1", "a2", "a3", "a4", "b1", "b2", "b3", "c1", "c2", "c3"]),
        tables(&[("big", 6), ("small", 4)]),
        vec![
            SeatingPreference::must_together("a1", "a2"),
            SeatingPreference::must_together("a2", "a3"),
            SeatingPreference::must_together("a3", "a4"),
            SeatingPreference::must_together("b1", "b2"),
            SeatingPreference::must_together("b2", "b3"),
            SeatingPreference::must_together("c1", "c2"),
            SeatingPreference::must_together("c2", "c3"),
        ],
    )
}
