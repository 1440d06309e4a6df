//! Domain model for a seating problem
//!
//! These types describe one immutable snapshot handed to the engine:
//! - `Guest`: someone who needs a seat
//! - `Table`: somewhere with a fixed number of seats
//! - `SeatingPreference`: a pairwise hard constraint or weighted wish
//! - `Snapshot`: all of the above, as loaded from the storage collaborator
//!
//! The `Raw*` records mirror the persistence layer's nullable shape and are
//! converted into the typed forms before the engine ever sees them.

mod guest;
mod ids;
mod preference;
mod snapshot;
mod table;

pub use guest::Guest;
pub use ids::{GuestId, LayoutId, TableId};
pub use preference::{PreferenceKind, SeatingPreference};
pub use snapshot::{RawGuest, RawPreference, RawSnapshot, RawTable, Snapshot};
pub use table::{Table, TableShape};
