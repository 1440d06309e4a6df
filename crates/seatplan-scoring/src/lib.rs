//! Constraint model and incremental scoring for seatplan
//!
//! This crate turns a validated snapshot into the internal graph the solver
//! works on, and scores seating plans against it:
//!
//! - [`ConstraintModel`]: guests, tables, must_together blocks, block-level
//!   must_apart adjacency and soft preference edges
//! - [`score`]: full recomputation of a plan's [`SeatingScore`]
//! - [`ScoreDirector`]: working plan with incremental score upkeep
//! - [`RecordingScoreDirector`]: try-and-undo wrapper for move evaluation
//!
//! [`SeatingScore`]: seatplan_core::SeatingScore

pub mod director;
pub mod model;
pub mod scorer;

pub use director::{assignment_from_seating, RecordingScoreDirector, ScoreDirector};
pub use model::{
    ApartEdge, Block, ConstraintModel, Contradiction, SoftEdge, SoftPreference,
};
pub use scorer::{breakdown, score, ScoreBreakdown};
