//! Full score recomputation.
//!
//! This is the reference the incremental [`ScoreDirector`](crate::ScoreDirector)
//! must agree with after every applied move.

use seatplan_core::{Assignment, SeatingScore};

use crate::model::ConstraintModel;

/// Score split by constraint family.
///
/// The hard families sum to [`SeatingScore::hard_violations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Guests seated beyond table capacity, summed over tables.
    pub over_capacity: u64,
    /// Pairs of must_apart blocks sharing a table, counted per table.
    pub apart: u64,
    /// Seated block members away from their block's majority table.
    pub split: u64,
    /// must_apart pairs that sit inside one must_together block.
    pub contradictions: u64,
    /// Sum of satisfied soft preference weights.
    pub soft: u64,
}

impl ScoreBreakdown {
    pub fn hard(&self) -> u64 {
        self.over_capacity + self.apart + self.split + self.contradictions
    }

    pub fn to_score(&self) -> SeatingScore {
        SeatingScore::of(self.hard(), self.soft)
    }
}

/// Scores an assignment from scratch.
///
/// Entries naming unknown guests or tables are ignored; callers validate
/// assignments with [`ConstraintModel::validate_assignment`] first.
pub fn score(model: &ConstraintModel, assignment: &Assignment) -> SeatingScore {
    breakdown(model, assignment).to_score()
}

/// Scores an assignment from scratch, by constraint family.
pub fn breakdown(model: &ConstraintModel, assignment: &Assignment) -> ScoreBreakdown {
    let mut table_of = vec![None; model.guest_count()];
    for (guest, placement) in assignment {
        if let (Some(g), Some(t)) = (
            model.guest_index(guest),
            model.table_index(&placement.table),
        ) {
            table_of[g] = Some(t);
        }
    }
    breakdown_of(model, &table_of)
}

/// Scores a guest-index to table-index mapping.
pub(crate) fn breakdown_of(model: &ConstraintModel, table_of: &[Option<usize>]) -> ScoreBreakdown {
    let tables = model.table_count();
    let mut result = ScoreBreakdown {
        contradictions: model.contradictions().len() as u64,
        ..ScoreBreakdown::default()
    };

    let mut occupancy = vec![0u64; tables];
    for t in table_of.iter().flatten() {
        occupancy[*t] += 1;
    }
    for (t, &seated) in occupancy.iter().enumerate() {
        result.over_capacity += seated.saturating_sub(u64::from(model.capacity(t)));
    }

    // block -> members per table
    let mut counts = vec![vec![0u64; tables]; model.blocks().len()];
    for (b, block) in model.blocks().iter().enumerate() {
        for &g in block.members() {
            if let Some(t) = table_of[g] {
                counts[b][t] += 1;
            }
        }
        let placed: u64 = counts[b].iter().sum();
        let majority = counts[b].iter().copied().max().unwrap_or(0);
        result.split += placed - majority;
    }

    for edge in model.apart_edges() {
        let (x, y) = edge.blocks;
        result.apart += (0..tables)
            .filter(|&t| counts[x][t] > 0 && counts[y][t] > 0)
            .count() as u64;
    }

    for pref in model.soft_preferences() {
        if let (Some(a), Some(b)) = (table_of[pref.first], table_of[pref.second]) {
            result.soft += pref.reward(a == b);
        }
    }

    result
}
