//! seatplan Core - Core types for the seating assignment engine
//!
//! This crate provides the fundamental abstractions for seatplan:
//! - Domain types for guests, tables and pairwise seating preferences
//! - The typed snapshot boundary for loosely-typed persistence records
//! - The lexicographic `SeatingScore`
//! - `Assignment`, the guest to (table, seat) mapping produced by the solver

pub mod assignment;
pub mod domain;
pub mod error;
pub mod score;

pub use assignment::{Assignment, SeatPlacement};
pub use domain::{
    Guest, GuestId, LayoutId, PreferenceKind, RawGuest, RawPreference, RawSnapshot, RawTable,
    SeatingPreference, Snapshot, Table, TableId, TableShape,
};
pub use error::{Result, ValidationError};
pub use score::{ScoreDelta, ScoreParseError, SeatingScore};
