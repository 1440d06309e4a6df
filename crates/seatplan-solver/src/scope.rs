//! Search-level scope.

use std::time::{Duration, Instant};

use seatplan_core::SeatingScore;

/// Progress of one local search run, as seen by terminations.
#[derive(Debug, Clone)]
pub struct SearchScope {
    start_time: Instant,
    iteration_count: u64,
    unimproved_count: u64,
    best_score: SeatingScore,
}

impl SearchScope {
    /// Starts the clock with the initial plan's score as best.
    pub fn new(initial_score: SeatingScore) -> Self {
        Self {
            start_time: Instant::now(),
            iteration_count: 0,
            unimproved_count: 0,
            best_score: initial_score,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Iterations run so far, including ones that found no candidate move.
    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    /// Consecutive iterations since the last new best score.
    pub fn unimproved_count(&self) -> u64 {
        self.unimproved_count
    }

    pub fn best_score(&self) -> SeatingScore {
        self.best_score
    }

    /// Counts one iteration; `best` carries the new best score if it found one.
    pub fn complete_iteration(&mut self, best: Option<SeatingScore>) {
        self.iteration_count += 1;
        match best {
            Some(score) => {
                self.best_score = score;
                self.unimproved_count = 0;
            }
            None => self.unimproved_count += 1,
        }
    }
}
