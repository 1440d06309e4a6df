//! Termination based on lack of improvement.

use super::{Termination, TerminationReason};
use crate::scope::SearchScope;

/// Terminates once the best score has not improved for a number of
/// consecutive iterations.
///
/// This is the stall window: a plateaued search is unlikely to find a
/// better plan, so it stops as converged.
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    window: u64,
}

impl UnimprovedStepCountTermination {
    pub fn new(window: u64) -> Self {
        Self { window }
    }
}

impl Termination for UnimprovedStepCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.unimproved_count() >= self.window
    }

    fn reason(&self) -> TerminationReason {
        TerminationReason::StallWindow
    }
}
