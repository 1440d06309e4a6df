use serde::{Deserialize, Serialize};

use super::GuestId;

/// A guest that needs a seat.
///
/// Guests are immutable for the duration of one optimization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    /// Group or household tag, e.g. "Bride's family".
    pub household: Option<String>,
    pub plus_one: bool,
}

impl Guest {
    /// Creates a guest without household tag or plus-one.
    pub fn new(id: impl Into<GuestId>, name: impl Into<String>) -> Self {
        Guest {
            id: id.into(),
            name: name.into(),
            household: None,
            plus_one: false,
        }
    }

    pub fn with_household(mut self, household: impl Into<String>) -> Self {
        self.household = Some(household.into());
        self
    }

    pub fn with_plus_one(mut self, plus_one: bool) -> Self {
        self.plus_one = plus_one;
        self
    }
}
