//! Iteration count termination.

use super::{Termination, TerminationReason};
use crate::scope::SearchScope;

/// Terminates after a number of iterations.
///
/// # Example
///
/// ```
/// use seatplan_solver::termination::StepCountTermination;
///
/// let term = StepCountTermination::new(1000);
/// ```
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.iteration_count() >= self.limit
    }

    fn reason(&self) -> TerminationReason {
        TerminationReason::IterationLimit
    }
}
