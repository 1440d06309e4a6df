//! seatplan - Wedding seating assignment engine
//!
//! Give it guests, tables and pairwise seating preferences; get back a plan
//! that seats everyone, honours the hard constraints whenever they can be
//! honoured, and scores as well as the budget allows on the soft ones.
//!
//! # Example
//!
//! ```rust
//! use seatplan::prelude::*;
//!
//! let snapshot = Snapshot::new(
//!     vec![Guest::new("ann", "Ann"), Guest::new("bob", "Bob"), Guest::new("cy", "Cy")],
//!     vec![Table::new("t1", 2), Table::new("t2", 2)],
//!     vec![
//!         SeatingPreference::must_together("ann", "bob"),
//!         SeatingPreference::prefer_apart("ann", "cy", 5),
//!     ],
//! );
//!
//! let plan = seatplan::solve(snapshot, Budget::iterations(2_000), 42).unwrap();
//! assert!(plan.is_feasible());
//! assert!(plan.report.is_empty());
//! ```

// Domain and score types
pub use seatplan_core::{
    Assignment, Guest, GuestId, LayoutId, PreferenceKind, RawGuest, RawPreference, RawSnapshot,
    RawTable, SeatPlacement, SeatingPreference, SeatingScore, Snapshot, Table, TableId, TableShape,
    ValidationError,
};

// Configuration
pub use seatplan_config::{
    AnnealingConfig, ConfigError, ReportConfig, SeatingConfig, TerminationConfig,
};

// Model and scoring
pub use seatplan_scoring::{score, ConstraintModel, ScoreBreakdown};

// Solver pipeline
pub use seatplan_solver::{
    build_initial, export, import, optimize, report, solve, Budget, Conflict, ConflictKind,
    ConflictReport, ConflictReporter, SeatAssignmentRecord, SeatingPlan, SeatingRequest,
    SeatingSolver, Severity, SolveStatistics, SolverError, TerminationReason,
};

mod service;
pub use service::{InMemoryStore, SeatingService, SeatingStore, ServiceError, StoreError};

pub mod prelude {
    pub use super::{
        Assignment, Budget, ConflictReport, Guest, GuestId, LayoutId, SeatingConfig,
        SeatingPlan, SeatingPreference, SeatingRequest, SeatingScore, SeatingSolver, Snapshot,
        Table, TableId,
    };
    pub use super::{InMemoryStore, SeatingService, SeatingStore};
}
