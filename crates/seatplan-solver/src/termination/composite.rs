//! Composite termination.
//!
//! Uses macro-generated tuple implementations, no boxing.

use super::{Termination, TerminationReason};
use crate::scope::SearchScope;

/// Combines terminations with OR logic; the first child that fires, in
/// tuple order, supplies the reason.
///
/// # Examples
///
/// ```
/// use seatplan_solver::termination::{
///     OrTermination, StepCountTermination, TimeTermination, UnimprovedStepCountTermination,
/// };
///
/// let termination = OrTermination((
///     UnimprovedStepCountTermination::new(500),
///     StepCountTermination::new(10_000),
///     TimeTermination::millis(250),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_or_termination {
    ($first_idx:tt: $First:ident $(, $idx:tt: $T:ident)*) => {
        impl<$First: Termination $(, $T: Termination)*> Termination
            for OrTermination<($First, $($T,)*)>
        {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                self.check(scope).is_some()
            }

            fn reason(&self) -> TerminationReason {
                (self.0).$first_idx.reason()
            }

            fn check(&self, scope: &SearchScope) -> Option<TerminationReason> {
                (self.0).$first_idx.check(scope)
                    $(.or_else(|| (self.0).$idx.check(scope)))*
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
