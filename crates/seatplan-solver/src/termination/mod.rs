//! Termination conditions for the local search.
//!
//! Every condition knows why it stops the search: budget conditions (time,
//! iterations, external cancellation) end it as budget-expired, convergence
//! conditions (stall window, target score) end it as converged.

mod best_score;
mod composite;
mod external;
mod step_count;
mod time;
mod unimproved;

use std::fmt::{self, Debug};
use std::time::Duration;

use serde::Serialize;

use crate::scope::SearchScope;

pub use best_score::BestScoreTermination;
pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    TimeLimit,
    IterationLimit,
    Cancelled,
    StallWindow,
    BestScoreReached,
    /// The model admits no move at all (fewer than two tables, or no guests).
    NoMoves,
}

impl TerminationReason {
    /// Returns true for reasons that mean the budget ran out.
    pub fn is_budget(self) -> bool {
        matches!(
            self,
            TerminationReason::TimeLimit
                | TerminationReason::IterationLimit
                | TerminationReason::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TerminationReason::TimeLimit => "time_limit",
            TerminationReason::IterationLimit => "iteration_limit",
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::StallWindow => "stall_window",
            TerminationReason::BestScoreReached => "best_score_reached",
            TerminationReason::NoMoves => "no_moves",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if searching should stop.
    fn is_terminated(&self, scope: &SearchScope) -> bool;

    /// Reason reported when this condition fires.
    fn reason(&self) -> TerminationReason;

    /// Returns the reason if this condition fires now.
    fn check(&self, scope: &SearchScope) -> Option<TerminationReason> {
        self.is_terminated(scope).then(|| self.reason())
    }
}

/// An absent condition never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }

    fn reason(&self) -> TerminationReason {
        match self {
            Some(t) => t.reason(),
            None => TerminationReason::IterationLimit,
        }
    }

    fn check(&self, scope: &SearchScope) -> Option<TerminationReason> {
        self.as_ref().and_then(|t| t.check(scope))
    }
}

/// Optimization budget: a deadline and/or an iteration cap, whichever
/// triggers first.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use seatplan_solver::Budget;
///
/// let budget = Budget::iterations(5_000).with_time_limit(Duration::from_millis(200));
/// assert_eq!(budget.iteration_limit, Some(5_000));
/// assert!(!budget.is_unbounded());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    pub time_limit: Option<Duration>,
    pub iteration_limit: Option<u64>,
}

impl Budget {
    pub fn iterations(limit: u64) -> Self {
        Self {
            time_limit: None,
            iteration_limit: Some(limit),
        }
    }

    pub fn time(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
            iteration_limit: None,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    /// Returns true when neither limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.time_limit.is_none() && self.iteration_limit.is_none()
    }

    /// Budget from the termination section of a config.
    pub fn from_config(config: &seatplan_config::TerminationConfig) -> Self {
        Self {
            time_limit: config.time_limit(),
            iteration_limit: config.iteration_limit,
        }
    }
}
