//! Best score termination.

use seatplan_core::SeatingScore;

use super::{Termination, TerminationReason};
use crate::scope::SearchScope;

/// Terminates when the best score reaches a target.
#[derive(Debug, Clone)]
pub struct BestScoreTermination {
    target: SeatingScore,
}

impl BestScoreTermination {
    pub fn new(target: SeatingScore) -> Self {
        Self { target }
    }

    /// Target meaning nothing is left to gain: no hard violation and every
    /// soft preference met.
    pub fn perfect(soft_ceiling: u64) -> Self {
        Self::new(SeatingScore::of(0, soft_ceiling))
    }
}

impl Termination for BestScoreTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.best_score() >= self.target
    }

    fn reason(&self) -> TerminationReason {
        TerminationReason::BestScoreReached
    }
}
