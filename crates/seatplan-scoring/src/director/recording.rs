//! Try-and-undo wrapper around a [`ScoreDirector`].
//!
//! ```
//! use seatplan_core::{SeatingPreference, Snapshot, Table, Guest};
//! use seatplan_scoring::{ConstraintModel, RecordingScoreDirector, ScoreDirector};
//!
//! let model = ConstraintModel::from_snapshot(Snapshot::new(
//!     vec![Guest::new("a", "Ann"), Guest::new("b", "Bob")],
//!     vec![Table::new("t1", 2), Table::new("t2", 2)],
//!     vec![SeatingPreference::prefer_together("a", "b", 4)],
//! ))
//! .unwrap();
//!
//! let mut director = ScoreDirector::new(&model);
//! director.assign(0, 0);
//! director.assign(1, 1);
//!
//! let mut recording = RecordingScoreDirector::new(&mut director);
//! recording.relocate(1, 0);
//! assert_eq!(recording.score().soft_score(), 4);
//!
//! recording.undo_changes();
//! assert_eq!(recording.score().soft_score(), 0);
//! assert_eq!(director.table_of(1), Some(1));
//! ```

use std::ops::Deref;

use seatplan_core::SeatingScore;

use super::{Change, ScoreDirector};

/// Records every change applied through it so they can be undone.
///
/// Changes that are neither undone nor committed stay applied when the
/// wrapper is dropped.
pub struct RecordingScoreDirector<'a, 'm> {
    inner: &'a mut ScoreDirector<'m>,
    log: Vec<Change>,
}

impl<'a, 'm> RecordingScoreDirector<'a, 'm> {
    pub fn new(inner: &'a mut ScoreDirector<'m>) -> Self {
        Self {
            inner,
            log: Vec::with_capacity(16),
        }
    }

    pub fn relocate(&mut self, guest: usize, table: usize) {
        self.inner.relocate_logged(guest, table, Some(&mut self.log));
    }

    pub fn relocate_block(&mut self, block: usize, table: usize) {
        self.inner
            .relocate_block_logged(block, table, Some(&mut self.log));
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.inner.swap_logged(a, b, Some(&mut self.log));
    }

    pub fn score(&self) -> SeatingScore {
        self.inner.score()
    }

    /// Reverts every recorded change, newest first.
    pub fn undo_changes(&mut self) {
        self.inner.revert(&mut self.log);
    }

    /// Keeps the recorded changes and clears the log for reuse.
    pub fn commit(&mut self) {
        self.log.clear();
    }

    /// Number of primitive changes recorded since the last undo or commit.
    pub fn change_count(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl<'m> Deref for RecordingScoreDirector<'_, 'm> {
    type Target = ScoreDirector<'m>;

    fn deref(&self) -> &Self::Target {
        self.inner
    }
}
