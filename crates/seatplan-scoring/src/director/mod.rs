//! Working seating plan with incremental score upkeep.
//!
//! # Score Director Types
//!
//! - [`ScoreDirector`] - owns the working plan and keeps every constraint
//!   family's running total current as guests move
//! - [`RecordingScoreDirector`] - try-and-undo wrapper used to evaluate
//!   candidate moves without cloning the plan
//!
//! All moves decompose into two primitives, detaching a guest from its
//! table and seating it at a position. Each primitive only touches the
//! terms that involve the moved guest: its table's overflow, its block's
//! spread and the block's apart neighbours at that table, and the soft
//! edges incident to the guest. A move therefore costs
//! O(degree + block spread) rather than a full rescore.

pub mod recording;

#[cfg(test)]
mod tests;

use seatplan_core::{Assignment, SeatingScore, ValidationError};
use smallvec::SmallVec;

use crate::model::ConstraintModel;
use crate::scorer::ScoreBreakdown;

pub use recording::RecordingScoreDirector;

/// Primitive change, in the order it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Removed { guest: usize, table: usize, seat: usize },
    Inserted { guest: usize },
}

/// Per-block placement: `(table, members seated there)`, nonzero counts only.
type Spread = SmallVec<[(usize, u32); 2]>;

/// The working plan plus running totals for each constraint family.
///
/// Guests and tables are addressed by their model indices. Seat order at a
/// table is insertion order; exported seat numbers derive from it.
#[derive(Debug, Clone)]
pub struct ScoreDirector<'m> {
    model: &'m ConstraintModel,
    table_of: Vec<Option<usize>>,
    seats: Vec<Vec<usize>>,
    spread: Vec<Spread>,
    placed: Vec<u32>,
    over_capacity: i64,
    apart: i64,
    split: i64,
    soft: i64,
}

impl<'m> ScoreDirector<'m> {
    /// Creates a director with nobody seated.
    pub fn new(model: &'m ConstraintModel) -> Self {
        Self {
            model,
            table_of: vec![None; model.guest_count()],
            seats: vec![Vec::new(); model.table_count()],
            spread: vec![Spread::new(); model.blocks().len()],
            placed: vec![0; model.blocks().len()],
            over_capacity: 0,
            apart: 0,
            split: 0,
            soft: 0,
        }
    }

    /// Loads an existing assignment, keeping its seat order per table.
    ///
    /// # Errors
    ///
    /// Fails if the assignment names a guest or table the model lacks.
    pub fn from_assignment(
        model: &'m ConstraintModel,
        assignment: &Assignment,
    ) -> Result<Self, ValidationError> {
        model.validate_assignment(assignment)?;
        let mut rows: Vec<(usize, u32, usize)> = Vec::with_capacity(assignment.len());
        for (guest, placement) in assignment {
            if let (Some(g), Some(t)) = (
                model.guest_index(guest),
                model.table_index(&placement.table),
            ) {
                rows.push((t, placement.seat, g));
            }
        }
        // Assignment iterates by guest id, so equal seats keep id order.
        rows.sort_by_key(|&(t, seat, _)| (t, seat));

        let mut director = Self::new(model);
        for (t, _, g) in rows {
            let end = director.seats[t].len();
            director.insert(g, t, end);
        }
        Ok(director)
    }

    /// Loads a per-table seating given as guest indices in seat order.
    pub fn from_seating(model: &'m ConstraintModel, seating: &[Vec<usize>]) -> Self {
        let mut director = Self::new(model);
        for (t, guests) in seating.iter().enumerate() {
            for &g in guests {
                let end = director.seats[t].len();
                director.insert(g, t, end);
            }
        }
        director
    }

    pub fn model(&self) -> &'m ConstraintModel {
        self.model
    }

    /// Current score from the running totals.
    pub fn score(&self) -> SeatingScore {
        self.breakdown().to_score()
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            over_capacity: self.over_capacity as u64,
            apart: self.apart as u64,
            split: self.split as u64,
            contradictions: self.model.contradictions().len() as u64,
            soft: self.soft as u64,
        }
    }

    // ---- queries ----

    #[inline]
    pub fn table_of(&self, guest: usize) -> Option<usize> {
        self.table_of[guest]
    }

    /// Guests at `table`, in seat order.
    #[inline]
    pub fn guests_at(&self, table: usize) -> &[usize] {
        &self.seats[table]
    }

    /// Every table's guests, in seat order.
    pub fn seating(&self) -> &[Vec<usize>] {
        &self.seats
    }

    pub fn placed_count(&self) -> usize {
        self.seats.iter().map(Vec::len).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.table_of.iter().all(Option::is_some)
    }

    #[inline]
    pub fn occupancy(&self, table: usize) -> u32 {
        self.seats[table].len() as u32
    }

    /// Free seats at `table`; negative when it is over capacity.
    #[inline]
    pub fn remaining_capacity(&self, table: usize) -> i64 {
        i64::from(self.model.capacity(table)) - self.seats[table].len() as i64
    }

    #[inline]
    pub fn overflow(&self, table: usize) -> u32 {
        self.occupancy(table)
            .saturating_sub(self.model.capacity(table))
    }

    /// Largest overflow at any table.
    pub fn max_overflow(&self) -> u32 {
        (0..self.seats.len())
            .map(|t| self.overflow(t))
            .max()
            .unwrap_or(0)
    }

    /// Members of `block` seated at `table`.
    #[inline]
    pub fn block_count_at(&self, block: usize, table: usize) -> u32 {
        self.spread[block]
            .iter()
            .find(|(t, _)| *t == table)
            .map_or(0, |&(_, n)| n)
    }

    /// Tables holding members of `block`, with counts.
    pub fn block_spread(&self, block: usize) -> &[(usize, u32)] {
        &self.spread[block]
    }

    pub fn block_placed(&self, block: usize) -> u32 {
        self.placed[block]
    }

    /// Returns true when the block's seated members use more than one table.
    #[inline]
    pub fn is_block_split(&self, block: usize) -> bool {
        self.spread[block].len() > 1
    }

    /// Table holding most of the block's members; ties go to the lower index.
    pub fn majority_table(&self, block: usize) -> Option<usize> {
        self.spread[block]
            .iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|&(t, _)| t)
    }

    /// Number of blocks seated at `table` that must sit apart from `block`.
    pub fn apart_conflicts_at(&self, block: usize, table: usize) -> u32 {
        self.model
            .apart_blocks(block)
            .iter()
            .filter(|&&other| self.block_count_at(other, table) > 0)
            .count() as u32
    }

    /// Soft reward the guest's edges to seated guests would earn at `table`.
    pub fn soft_gain_at(&self, guest: usize, table: usize) -> i64 {
        self.model
            .soft_edges(guest)
            .iter()
            .filter_map(|e| self.table_of[e.other].map(|t| e.reward(t == table)))
            .sum()
    }

    /// Current plan as an [`Assignment`], seats numbered from 0 per table.
    pub fn to_assignment(&self) -> Assignment {
        assignment_from_seating(self.model, &self.seats)
    }

    // ---- moves ----

    /// Seats an unseated guest at the end of `table`, or moves it there.
    pub fn assign(&mut self, guest: usize, table: usize) {
        self.relocate_logged(guest, table, None);
    }

    /// Moves a guest to the end of `table`. No-op if it already sits there.
    pub fn relocate(&mut self, guest: usize, table: usize) {
        self.relocate_logged(guest, table, None);
    }

    /// Moves every member of `block` to `table`.
    pub fn relocate_block(&mut self, block: usize, table: usize) {
        self.relocate_block_logged(block, table, None);
    }

    /// Exchanges the seats of two guests at different tables.
    ///
    /// Guests sharing a table keep their seats.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.swap_logged(a, b, None);
    }

    /// Removes a guest from the plan.
    pub fn unassign(&mut self, guest: usize) {
        self.remove_logged(guest, None);
    }

    pub(crate) fn relocate_logged(
        &mut self,
        guest: usize,
        table: usize,
        mut log: Option<&mut Vec<Change>>,
    ) {
        if self.table_of[guest] == Some(table) {
            return;
        }
        self.remove_logged(guest, log.as_deref_mut());
        let end = self.seats[table].len();
        self.insert_logged(guest, table, end, log);
    }

    pub(crate) fn relocate_block_logged(
        &mut self,
        block: usize,
        table: usize,
        mut log: Option<&mut Vec<Change>>,
    ) {
        let model = self.model;
        for &g in model.block(block).members() {
            self.relocate_logged(g, table, log.as_deref_mut());
        }
    }

    pub(crate) fn swap_logged(&mut self, a: usize, b: usize, mut log: Option<&mut Vec<Change>>) {
        if a == b {
            return;
        }
        let (ta, tb) = (self.table_of[a], self.table_of[b]);
        if ta == tb {
            // same table or both unseated: no score term changes
            return;
        }
        let from_a = self.remove_logged(a, log.as_deref_mut());
        let from_b = self.remove_logged(b, log.as_deref_mut());
        if let Some((t, seat)) = from_b {
            self.insert_logged(a, t, seat, log.as_deref_mut());
        }
        if let Some((t, seat)) = from_a {
            self.insert_logged(b, t, seat, log);
        }
    }

    /// Replays a change log backwards.
    pub(crate) fn revert(&mut self, log: &mut Vec<Change>) {
        while let Some(change) = log.pop() {
            match change {
                Change::Inserted { guest } => {
                    self.remove(guest);
                }
                Change::Removed { guest, table, seat } => {
                    if self.table_of[guest].is_some() {
                        self.remove(guest);
                    }
                    self.insert(guest, table, seat);
                }
            }
        }
    }

    fn remove_logged(
        &mut self,
        guest: usize,
        log: Option<&mut Vec<Change>>,
    ) -> Option<(usize, usize)> {
        let removed = self.remove(guest);
        if let (Some((table, seat)), Some(log)) = (removed, log) {
            log.push(Change::Removed { guest, table, seat });
        }
        removed
    }

    fn insert_logged(
        &mut self,
        guest: usize,
        table: usize,
        seat: usize,
        log: Option<&mut Vec<Change>>,
    ) {
        self.insert(guest, table, seat);
        if let Some(log) = log {
            log.push(Change::Inserted { guest });
        }
    }

    // ---- primitives ----

    /// Seats an unseated guest at position `seat` of `table`.
    fn insert(&mut self, guest: usize, table: usize, seat: usize) {
        debug_assert!(self.table_of[guest].is_none());

        if self.seats[table].len() as u32 >= self.model.capacity(table) {
            self.over_capacity += 1;
        }

        let block = self.model.block_of(guest);
        let before = self.split_of(block);
        let entered = match self.spread[block].iter_mut().find(|(t, _)| *t == table) {
            Some(entry) => {
                entry.1 += 1;
                false
            }
            None => {
                self.spread[block].push((table, 1));
                true
            }
        };
        self.placed[block] += 1;
        if entered {
            self.apart += i64::from(self.apart_conflicts_at(block, table));
        }
        self.split += self.split_of(block) - before;

        self.soft += self.soft_gain_at(guest, table);

        self.table_of[guest] = Some(table);
        let seat = seat.min(self.seats[table].len());
        self.seats[table].insert(seat, guest);
    }

    /// Unseats a guest; returns where it sat.
    fn remove(&mut self, guest: usize) -> Option<(usize, usize)> {
        let table = self.table_of[guest]?;
        let seat = self.seats[table].iter().position(|&g| g == guest)?;
        self.seats[table].remove(seat);
        self.table_of[guest] = None;

        if self.seats[table].len() as u32 >= self.model.capacity(table) {
            self.over_capacity -= 1;
        }

        let block = self.model.block_of(guest);
        let before = self.split_of(block);
        let mut left = false;
        if let Some(i) = self.spread[block].iter().position(|(t, _)| *t == table) {
            self.spread[block][i].1 -= 1;
            if self.spread[block][i].1 == 0 {
                self.spread[block].swap_remove(i);
                left = true;
            }
        }
        self.placed[block] -= 1;
        if left {
            self.apart -= i64::from(self.apart_conflicts_at(block, table));
        }
        self.split += self.split_of(block) - before;

        self.soft -= self.soft_gain_at(guest, table);

        Some((table, seat))
    }

    fn split_of(&self, block: usize) -> i64 {
        let majority = self.spread[block].iter().map(|&(_, n)| n).max().unwrap_or(0);
        i64::from(self.placed[block] - majority)
    }
}

/// Builds an [`Assignment`] from per-table guest indices in seat order.
pub fn assignment_from_seating(model: &ConstraintModel, seating: &[Vec<usize>]) -> Assignment {
    seating
        .iter()
        .enumerate()
        .flat_map(|(t, guests)| {
            guests.iter().enumerate().map(move |(seat, &g)| {
                (
                    model.guest(g).id.clone(),
                    seatplan_core::SeatPlacement {
                        table: model.table(t).id.clone(),
                        seat: seat as u32,
                    },
                )
            })
        })
        .collect()
}
