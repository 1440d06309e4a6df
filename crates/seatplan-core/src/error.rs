//! Error types for seatplan input validation

use thiserror::Error;

use crate::domain::{GuestId, TableId};

/// Malformed or contradictory input, detected before any optimization starts.
///
/// Every variant names the offending guests, tables or preferences so the
/// caller can show an actionable message. Preference positions are indices
/// into the preference list as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The same guest id appears twice in the guest list.
    #[error("guest `{0}` appears more than once in the guest list")]
    DuplicateGuest(GuestId),

    /// The same table id appears twice in the table list.
    #[error("table `{0}` appears more than once in the table list")]
    DuplicateTable(TableId),

    /// A table record without any capacity.
    #[error("table `{0}` has no capacity")]
    MissingCapacity(TableId),

    /// A table whose capacity is zero or negative.
    #[error("table `{table}` has non-positive capacity {capacity}")]
    NonPositiveCapacity { table: TableId, capacity: i64 },

    /// A preference naming a guest that is not part of the snapshot.
    #[error("preference #{index} references unknown guest `{guest}`")]
    UnknownGuest { index: usize, guest: GuestId },

    /// A preference pairing a guest with itself.
    #[error("preference #{index} pairs guest `{guest}` with itself")]
    SelfPreference { index: usize, guest: GuestId },

    /// A soft preference with a zero or negative priority weight.
    #[error("preference #{index} has non-positive weight {weight}")]
    NonPositiveWeight { index: usize, weight: i64 },

    /// A raw preference whose kind string is not recognised.
    #[error("preference #{index} has unknown kind `{kind}`")]
    UnknownPreferenceKind { index: usize, kind: String },

    /// A pair marked both `must_together` and `must_apart`.
    #[error(
        "guests `{first}` and `{second}` are marked must_together (preference #{together}) \
         and must_apart (preference #{apart})"
    )]
    ContradictoryPreference {
        first: GuestId,
        second: GuestId,
        together: usize,
        apart: usize,
    },

    /// Guests were supplied but there is nowhere to seat them.
    #[error("{guests} guests cannot be seated without any tables")]
    NoTables { guests: usize },

    /// A warm-start assignment names a guest that is not part of the snapshot.
    #[error("assignment references unknown guest `{0}`")]
    UnknownAssignedGuest(GuestId),

    /// A warm-start assignment names a table that is not part of the snapshot.
    #[error("assignment references unknown table `{0}`")]
    UnknownTable(TableId),
}

/// Result type alias for seatplan validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
