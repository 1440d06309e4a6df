//! Initial assignment builder.
//!
//! Greedy construction over blocks:
//!
//! 1. Blocks of two or more guests, largest first, each into the table with
//!    the most remaining capacity that holds the whole block without seating
//!    it next to a block it must stay apart from.
//! 2. If that leaves a block no table can take whole, the blocks are packed
//!    again tightest fit first (the smallest room that still holds the
//!    block), and the packing with fewer splits wins.
//! 3. A block neither packing can seat whole is force-split: the best table
//!    with free seats takes as many members as fit and the rest is placed
//!    again as a smaller block.
//! 4. Singletons last, most apart-constrained first, each into the table
//!    adding the fewest hard violations, ties broken by soft reward with the
//!    guests already there.
//!
//! Construction always places every guest. When the room is simply not there
//! the remaining guests go to the table that overflows least, and the
//! violation shows up in the score and the conflict report.

use std::cmp::Reverse;

use seatplan_core::{Assignment, ValidationError};
use seatplan_scoring::{ConstraintModel, ScoreDirector};
use tracing::{debug, warn};

/// How a whole block picks among the tables that can hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    /// Most remaining capacity; spreads the room left for singletons.
    MostRoom,
    /// Least remaining capacity that still holds the block.
    Tightest,
}

/// A block split that construction could not avoid.
#[derive(Debug, Clone, Copy)]
struct ForcedSplit {
    block: usize,
    table: usize,
    seated: usize,
    remaining: usize,
}

/// Greedy builder for the first complete plan.
#[derive(Debug)]
pub struct InitialAssignmentBuilder<'m> {
    model: &'m ConstraintModel,
    forced_splits: u64,
}

impl<'m> InitialAssignmentBuilder<'m> {
    pub fn new(model: &'m ConstraintModel) -> Self {
        Self {
            model,
            forced_splits: 0,
        }
    }

    /// Number of block splits forced so far.
    pub fn forced_splits(&self) -> u64 {
        self.forced_splits
    }

    /// Builds a complete plan from scratch.
    pub fn build(&mut self) -> ScoreDirector<'m> {
        let mut director = ScoreDirector::new(self.model);
        self.complete(&mut director);
        director
    }

    /// Keeps the guests a warm start already seats and places the rest.
    ///
    /// # Errors
    ///
    /// Fails if the warm start names a guest or table the model lacks.
    pub fn build_from(&mut self, warm_start: &Assignment) -> Result<ScoreDirector<'m>, ValidationError> {
        let mut director = ScoreDirector::from_assignment(self.model, warm_start)?;
        self.complete(&mut director);
        Ok(director)
    }

    /// Seats every guest the director does not seat yet.
    pub fn complete(&mut self, director: &mut ScoreDirector<'m>) {
        let model = self.model;
        if model.table_count() == 0 {
            return;
        }

        let mut blocks: Vec<usize> = (0..model.blocks().len())
            .filter(|&b| !model.block(b).is_singleton())
            .collect();
        // stable: equal sizes keep block order
        blocks.sort_by_key(|&b| Reverse(model.block(b).len()));

        let mut packed = director.clone();
        let mut splits = self.place_blocks(&mut packed, &blocks, Fit::MostRoom);
        if !splits.is_empty() {
            let mut tight = director.clone();
            let tight_splits = self.place_blocks(&mut tight, &blocks, Fit::Tightest);
            debug!(
                event = "repack_blocks",
                most_room_splits = splits.len(),
                tightest_splits = tight_splits.len(),
            );
            if tight_splits.len() < splits.len() {
                packed = tight;
                splits = tight_splits;
            }
        }
        *director = packed;

        for split in &splits {
            warn!(
                event = "forced_split",
                block = split.block,
                table = %model.table(split.table).id,
                seated = split.seated,
                remaining = split.remaining,
            );
        }
        self.forced_splits += splits.len() as u64;

        let mut singletons: Vec<usize> = (0..model.blocks().len())
            .filter(|&b| model.block(b).is_singleton())
            .map(|b| model.block(b).members()[0])
            .filter(|&g| director.table_of(g).is_none())
            .collect();
        singletons.sort_by_key(|&g| Reverse(model.apart_blocks(model.block_of(g)).len()));

        for guest in singletons {
            let table = self.best_table_for_guest(director, guest);
            director.assign(guest, table);
        }

        debug!(
            event = "construction_complete",
            placed = director.placed_count(),
            forced_splits = self.forced_splits,
            score = %director.score(),
        );
    }

    /// Seats the unseated members of every block in `blocks` order.
    fn place_blocks(&self, director: &mut ScoreDirector<'m>, blocks: &[usize], fit: Fit) -> Vec<ForcedSplit> {
        let mut splits = Vec::new();
        for &block in blocks {
            let pending: Vec<usize> = self
                .model
                .block(block)
                .members()
                .iter()
                .copied()
                .filter(|&g| director.table_of(g).is_none())
                .collect();
            if !pending.is_empty() {
                self.place_block(director, block, pending, fit, &mut splits);
            }
        }
        splits
    }

    fn place_block(
        &self,
        director: &mut ScoreDirector<'m>,
        block: usize,
        mut pending: Vec<usize>,
        fit: Fit,
        splits: &mut Vec<ForcedSplit>,
    ) {
        // a warm start may already seat part of the block
        if let Some(table) = director.majority_table(block) {
            if director.remaining_capacity(table) >= pending.len() as i64
                && director.apart_conflicts_at(block, table) == 0
            {
                for g in pending {
                    director.assign(g, table);
                }
                return;
            }
        }

        while !pending.is_empty() {
            if let Some(table) = self.whole_block_table(director, block, pending.len(), fit) {
                for g in pending.drain(..) {
                    director.assign(g, table);
                }
                return;
            }

            let Some(table) = self.split_table(director, block, &pending) else {
                // no free seat anywhere
                let table = self.least_overflow_table(director, block);
                for g in pending.drain(..) {
                    director.assign(g, table);
                }
                return;
            };

            let free = director.remaining_capacity(table).max(0) as usize;
            let take = free.min(pending.len());
            let rest = pending.split_off(take);
            for g in pending {
                director.assign(g, table);
            }
            pending = rest;

            if !pending.is_empty() {
                splits.push(ForcedSplit {
                    block,
                    table,
                    seated: take,
                    remaining: pending.len(),
                });
            }
        }
    }

    /// Apart-free table with room for `size` more members, chosen by `fit`.
    fn whole_block_table(
        &self,
        director: &ScoreDirector<'m>,
        block: usize,
        size: usize,
        fit: Fit,
    ) -> Option<usize> {
        let candidates = (0..self.model.table_count())
            .filter(|&t| director.remaining_capacity(t) >= size as i64)
            .filter(|&t| director.apart_conflicts_at(block, t) == 0);
        match fit {
            Fit::MostRoom => candidates.max_by_key(|&t| (director.remaining_capacity(t), Reverse(t))),
            Fit::Tightest => candidates.min_by_key(|&t| (director.remaining_capacity(t), t)),
        }
    }

    /// Table with free seats that best takes part of a block: fewest apart
    /// conflicts, then most room, then soft reward.
    fn split_table(&self, director: &ScoreDirector<'m>, block: usize, pending: &[usize]) -> Option<usize> {
        (0..self.model.table_count())
            .filter(|&t| director.remaining_capacity(t) > 0)
            .max_by_key(|&t| {
                let soft: i64 = pending.iter().map(|&g| director.soft_gain_at(g, t)).sum();
                (
                    Reverse(director.apart_conflicts_at(block, t)),
                    director.remaining_capacity(t),
                    soft,
                    Reverse(t),
                )
            })
    }

    /// Table that overflows least, for when every table is full.
    fn least_overflow_table(&self, director: &ScoreDirector<'m>, block: usize) -> usize {
        (0..self.model.table_count())
            .max_by_key(|&t| {
                (
                    director.remaining_capacity(t),
                    Reverse(director.apart_conflicts_at(block, t)),
                    Reverse(t),
                )
            })
            .unwrap_or(0)
    }

    fn best_table_for_guest(&self, director: &ScoreDirector<'m>, guest: usize) -> usize {
        let block = self.model.block_of(guest);
        (0..self.model.table_count())
            .max_by_key(|&t| {
                let remaining = director.remaining_capacity(t);
                let new_hard = director.apart_conflicts_at(block, t) + u32::from(remaining <= 0);
                (
                    remaining > 0,
                    Reverse(new_hard),
                    director.soft_gain_at(guest, t),
                    remaining,
                    Reverse(t),
                )
            })
            .unwrap_or(0)
    }
}

/// Builds a complete first plan for the model.
///
/// Always returns every guest seated, even when the input is infeasible.
pub fn build_initial(model: &ConstraintModel) -> Assignment {
    InitialAssignmentBuilder::new(model).build().to_assignment()
}

#[cfg(test)]
mod tests;
