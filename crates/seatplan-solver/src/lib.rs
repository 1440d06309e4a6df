//! seatplan Solver Engine
//!
//! This crate turns a validated snapshot into a seating plan:
//! - Initial assignment builder (blocks first, then singletons)
//! - Simulated annealing local search over swap and relocate moves
//! - Termination conditions (time, iterations, stall window, score target)
//! - Conflict reporter and plan exporter
//! - `SeatingSolver`, which runs all of the above for one request

pub mod construction;
pub mod error;
pub mod export;
pub mod localsearch;
pub mod report;
pub mod scope;
pub mod solver;
pub mod statistics;
pub mod termination;

pub use construction::{build_initial, InitialAssignmentBuilder};
pub use error::SolverError;
pub use export::{export, import, SeatAssignmentRecord};
pub use localsearch::{
    optimize, LocalSearchPhase, MoveKind, SearchOutcome, SearchState, SeatingMove,
    SimulatedAnnealingAcceptor,
};
pub use report::{
    report, Conflict, ConflictKind, ConflictReport, ConflictReporter, Severity,
};
pub use scope::SearchScope;
pub use solver::{solve, SeatingPlan, SeatingRequest, SeatingSolver};
pub use statistics::SolveStatistics;
pub use termination::{Budget, Termination, TerminationReason};
