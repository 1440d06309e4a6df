//! Neighbourhood moves and the sampler that draws them.

use std::fmt;

use rand::Rng;
use seatplan_scoring::{ConstraintModel, RecordingScoreDirector, ScoreDirector};

/// Attempts per iteration before giving up on finding a candidate.
const MAX_SAMPLE_ATTEMPTS: usize = 16;

/// A change to the working plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatingMove {
    /// Exchange two guests sitting at different tables.
    Swap { a: usize, b: usize },
    /// Move every member of a block to one table.
    RelocateBlock { block: usize, to: usize },
    /// Move one guest to another table.
    RelocateGuest { guest: usize, to: usize },
}

impl SeatingMove {
    pub fn do_move(&self, director: &mut RecordingScoreDirector<'_, '_>) {
        match *self {
            SeatingMove::Swap { a, b } => director.swap(a, b),
            SeatingMove::RelocateBlock { block, to } => director.relocate_block(block, to),
            SeatingMove::RelocateGuest { guest, to } => director.relocate(guest, to),
        }
    }

    pub fn kind(&self) -> MoveKind {
        match self {
            SeatingMove::Swap { .. } => MoveKind::Swap,
            SeatingMove::RelocateBlock { .. } => MoveKind::RelocateBlock,
            SeatingMove::RelocateGuest { .. } => MoveKind::RelocateGuest,
        }
    }
}

impl fmt::Display for SeatingMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatingMove::Swap { a, b } => write!(f, "swap({a}, {b})"),
            SeatingMove::RelocateBlock { block, to } => write!(f, "block {block} -> {to}"),
            SeatingMove::RelocateGuest { guest, to } => write!(f, "guest {guest} -> {to}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Swap,
    RelocateBlock,
    RelocateGuest,
}

/// Draws candidate moves uniformly at random.
///
/// A move kind is picked uniformly among the kinds the model can produce,
/// then a move of that kind is sampled and checked against the current plan.
/// Samples that are not candidates are redrawn a bounded number of times.
///
/// Candidates:
/// - guest-level moves only touch guests whose block is a singleton or is
///   already split, so a block seated together is never broken up
/// - a relocation may not push the target table's overflow past the
///   largest overflow currently in the plan
#[derive(Debug, Clone)]
pub struct MoveSampler {
    kinds: Vec<MoveKind>,
    movable_blocks: Vec<usize>,
    guest_count: usize,
    table_count: usize,
}

impl MoveSampler {
    pub fn new(model: &ConstraintModel) -> Self {
        let guest_count = model.guest_count();
        let table_count = model.table_count();
        let movable_blocks: Vec<usize> = (0..model.blocks().len())
            .filter(|&b| !model.block(b).is_singleton())
            .collect();

        let mut kinds = Vec::with_capacity(3);
        if table_count >= 2 && guest_count > 0 {
            if guest_count >= 2 {
                kinds.push(MoveKind::Swap);
            }
            if !movable_blocks.is_empty() {
                kinds.push(MoveKind::RelocateBlock);
            }
            kinds.push(MoveKind::RelocateGuest);
        }

        Self {
            kinds,
            movable_blocks,
            guest_count,
            table_count,
        }
    }

    /// Returns false when the model admits no move at all.
    pub fn has_moves(&self) -> bool {
        !self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &[MoveKind] {
        &self.kinds
    }

    /// Samples one candidate move, or `None` if every attempt missed.
    pub fn sample<R: Rng>(&self, director: &ScoreDirector<'_>, rng: &mut R) -> Option<SeatingMove> {
        if self.kinds.is_empty() {
            return None;
        }
        let tolerance = director.max_overflow();
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let kind = self.kinds[rng.random_range(0..self.kinds.len())];
            let candidate = match kind {
                MoveKind::Swap => self.sample_swap(director, rng),
                MoveKind::RelocateBlock => self.sample_block(director, rng, tolerance),
                MoveKind::RelocateGuest => self.sample_guest(director, rng, tolerance),
            };
            if candidate.is_some() {
                return candidate;
            }
        }
        None
    }

    fn sample_swap<R: Rng>(&self, director: &ScoreDirector<'_>, rng: &mut R) -> Option<SeatingMove> {
        let a = rng.random_range(0..self.guest_count);
        let b = rng.random_range(0..self.guest_count);
        if !is_loose(director, a) || !is_loose(director, b) {
            return None;
        }
        match (director.table_of(a), director.table_of(b)) {
            (Some(ta), Some(tb)) if ta != tb => Some(SeatingMove::Swap { a, b }),
            _ => None,
        }
    }

    fn sample_block<R: Rng>(
        &self,
        director: &ScoreDirector<'_>,
        rng: &mut R,
        tolerance: u32,
    ) -> Option<SeatingMove> {
        let block = self.movable_blocks[rng.random_range(0..self.movable_blocks.len())];
        let to = rng.random_range(0..self.table_count);
        let arriving = director.block_placed(block) - director.block_count_at(block, to);
        if arriving == 0 {
            return None;
        }
        fits(director, to, arriving, tolerance).then_some(SeatingMove::RelocateBlock { block, to })
    }

    fn sample_guest<R: Rng>(
        &self,
        director: &ScoreDirector<'_>,
        rng: &mut R,
        tolerance: u32,
    ) -> Option<SeatingMove> {
        let guest = rng.random_range(0..self.guest_count);
        let to = rng.random_range(0..self.table_count);
        if !is_loose(director, guest) || director.table_of(guest) == Some(to) {
            return None;
        }
        fits(director, to, 1, tolerance).then_some(SeatingMove::RelocateGuest { guest, to })
    }
}

/// A guest that may move on its own: its block is a singleton or already split.
fn is_loose(director: &ScoreDirector<'_>, guest: usize) -> bool {
    let block = director.model().block_of(guest);
    director.model().block(block).is_singleton() || director.is_block_split(block)
}

fn fits(director: &ScoreDirector<'_>, table: usize, arriving: u32, tolerance: u32) -> bool {
    let after = director.occupancy(table) + arriving;
    after.saturating_sub(director.model().capacity(table)) <= tolerance
}
