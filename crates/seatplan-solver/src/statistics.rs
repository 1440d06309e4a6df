//! Solve statistics.
//!
//! Counters for one solve: how construction went, how many moves the local
//! search evaluated and accepted, and why it stopped.

use std::time::Duration;

use seatplan_core::SeatingScore;
use serde::Serialize;

use crate::termination::TerminationReason;

/// Statistics for one solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolveStatistics {
    /// Guests in the snapshot.
    pub guest_count: usize,
    /// Tables in the snapshot.
    pub table_count: usize,
    /// must_together blocks, singletons included.
    pub block_count: usize,
    /// Times construction had to split a block across tables.
    pub forced_splits: u64,
    /// Local search iterations, including ones without a candidate move.
    pub iterations: u64,
    /// Candidate moves scored.
    pub moves_evaluated: u64,
    /// Candidate moves kept.
    pub moves_accepted: u64,
    /// Times the best score improved during local search.
    pub improvements: u64,
    pub construction_duration: Duration,
    pub search_duration: Duration,
    /// Score of the constructed plan.
    pub initial_score: Option<SeatingScore>,
    /// Score of the returned plan.
    pub final_score: Option<SeatingScore>,
    pub termination: Option<TerminationReason>,
}

impl SolveStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }

    /// Returns evaluated moves per second of search.
    pub fn moves_per_second(&self) -> u64 {
        let secs = self.search_duration.as_secs_f64();
        if secs > 0.0 {
            (self.moves_evaluated as f64 / secs) as u64
        } else {
            0
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.construction_duration + self.search_duration
    }
}
