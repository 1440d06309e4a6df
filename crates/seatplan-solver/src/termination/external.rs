//! External termination via AtomicBool flag.

use std::sync::atomic::{AtomicBool, Ordering};

use super::{Termination, TerminationReason};
use crate::scope::SearchScope;

/// Terminates when an external flag is set.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use seatplan_solver::termination::ExternalTermination;
///
/// let flag = AtomicBool::new(false);
/// let term = ExternalTermination::new(&flag);
///
/// // from another thread:
/// flag.store(true, Ordering::SeqCst);
/// ```
#[derive(Debug)]
pub struct ExternalTermination<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ExternalTermination<'a> {
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }
}

impl Termination for ExternalTermination<'_> {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn reason(&self) -> TerminationReason {
        TerminationReason::Cancelled
    }
}
