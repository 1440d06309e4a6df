//! Seating solver entry point.
//!
//! One call takes a snapshot from validation through construction and local
//! search to the conflict report and the exported seat records.
//!
//! # Exclusivity
//!
//! A solve shares no state with other solves, so any number may run in
//! parallel. Two solves of the *same layout* must not, though: each ends in
//! a save that replaces the layout's seats, and the later save would silently
//! overwrite the earlier one. Callers serialize recomputes per layout id
//! (the `seatplan` crate's `SeatingService` does so with a per-layout lock).

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seatplan_config::SeatingConfig;
use seatplan_core::{Assignment, RawSnapshot, SeatingScore, Snapshot, ValidationError};
use seatplan_scoring::{assignment_from_seating, ConstraintModel};
use tracing::info;

use crate::construction::InitialAssignmentBuilder;
use crate::error::SolverError;
use crate::export::{export, SeatAssignmentRecord};
use crate::localsearch::LocalSearchPhase;
use crate::report::{ConflictReport, ConflictReporter};
use crate::statistics::SolveStatistics;
use crate::termination::Budget;

#[cfg(test)]
mod tests;

/// Input of one solve.
#[derive(Debug, Clone)]
pub struct SeatingRequest {
    pub snapshot: Snapshot,
    /// Overrides the configured time and iteration limits.
    pub budget: Option<Budget>,
    /// Overrides the configured random seed.
    pub seed: Option<u64>,
    /// Current layout; guests seated here keep their tables.
    pub warm_start: Option<Assignment>,
}

impl SeatingRequest {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            budget: None,
            seed: None,
            warm_start: None,
        }
    }

    /// Creates a request from storage records.
    ///
    /// # Errors
    ///
    /// Fails on records the typed snapshot cannot represent.
    pub fn from_raw(raw: RawSnapshot) -> Result<Self, ValidationError> {
        Snapshot::try_from(raw).map(Self::new)
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_warm_start(mut self, assignment: Assignment) -> Self {
        self.warm_start = Some(assignment);
        self
    }
}

/// Output of one solve.
#[derive(Debug, Clone)]
pub struct SeatingPlan {
    pub assignment: Assignment,
    pub report: ConflictReport,
    /// Seat records ready for the store, see [`export`].
    pub records: Vec<SeatAssignmentRecord>,
    pub score: SeatingScore,
    pub statistics: SolveStatistics,
}

impl SeatingPlan {
    /// Returns true when the plan breaks no hard constraint.
    pub fn is_feasible(&self) -> bool {
        self.score.is_feasible()
    }
}

/// Runs seating solves with one configuration.
///
/// # Example
///
/// ```
/// use seatplan_core::{Guest, SeatingPreference, Snapshot, Table};
/// use seatplan_solver::{Budget, SeatingRequest, SeatingSolver};
///
/// let snapshot = Snapshot::new(
///     vec![Guest::new("ann", "Ann"), Guest::new("bob", "Bob")],
///     vec![Table::new("t1", 2), Table::new("t2", 2)],
///     vec![SeatingPreference::must_together("ann", "bob")],
/// );
/// let request = SeatingRequest::new(snapshot)
///     .with_budget(Budget::iterations(1_000))
///     .with_seed(7);
///
/// let plan = SeatingSolver::default().solve(request).unwrap();
/// assert!(plan.is_feasible());
/// assert_eq!(plan.records.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeatingSolver {
    config: SeatingConfig,
}

impl SeatingSolver {
    /// Creates a solver after checking the configuration.
    ///
    /// # Errors
    ///
    /// Fails on out-of-range configuration values.
    pub fn new(config: SeatingConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SeatingConfig {
        &self.config
    }

    /// Solves a request within its budget.
    ///
    /// # Errors
    ///
    /// Fails before any optimization when the snapshot or warm start is
    /// invalid. Hard constraints that cannot be met are not errors.
    pub fn solve(&self, request: SeatingRequest) -> Result<SeatingPlan, SolverError> {
        self.run(request, None)
    }

    /// Like [`solve`](Self::solve), also stopping once `terminate` is set.
    ///
    /// The best plan found so far is still returned.
    pub fn solve_with_flag(
        &self,
        request: SeatingRequest,
        terminate: &AtomicBool,
    ) -> Result<SeatingPlan, SolverError> {
        self.run(request, Some(terminate))
    }

    fn run(
        &self,
        request: SeatingRequest,
        terminate: Option<&AtomicBool>,
    ) -> Result<SeatingPlan, SolverError> {
        let SeatingRequest {
            snapshot,
            budget,
            seed,
            warm_start,
        } = request;
        let budget = budget.unwrap_or_else(|| Budget::from_config(&self.config.termination));
        let seed = seed.unwrap_or_else(|| self.config.seed());
        let best_score_limit = self.config.termination.best_score_limit()?;

        let model = ConstraintModel::from_snapshot(snapshot)?;
        let mut statistics = SolveStatistics {
            guest_count: model.guest_count(),
            table_count: model.table_count(),
            block_count: model.blocks().len(),
            ..SolveStatistics::default()
        };

        info!(
            event = "solve_start",
            guests = model.guest_count(),
            tables = model.table_count(),
            preferences = model.preferences().len(),
            blocks = model.blocks().len(),
            seats = model.total_capacity(),
            seed = seed,
            warm_start = warm_start.is_some(),
        );

        // Construction
        let started = Instant::now();
        info!(
            event = "phase_start",
            phase = "Construction Heuristic",
            phase_index = 0,
        );
        let mut builder = InitialAssignmentBuilder::new(&model);
        let mut director = match &warm_start {
            Some(plan) => builder.build_from(plan)?,
            None => builder.build(),
        };
        statistics.forced_splits = builder.forced_splits();
        statistics.construction_duration = started.elapsed();
        statistics.initial_score = Some(director.score());
        info!(
            event = "phase_end",
            phase = "Construction Heuristic",
            phase_index = 0,
            duration_ms = statistics.construction_duration.as_millis() as u64,
            forced_splits = statistics.forced_splits,
            score = %director.score(),
        );

        // Local search
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut phase = LocalSearchPhase::with_annealing(budget, &self.config.annealing)
            .with_stall_window(self.config.termination.stall_iteration_limit)
            .with_best_score_limit(best_score_limit);
        let outcome = phase.solve_with_flag(&mut director, &mut rng, terminate);

        let assignment = assignment_from_seating(&model, &outcome.best_seating);
        let report = ConflictReporter::new(self.config.report.notable_weight)
            .report(&model, &assignment);
        let records = export(&assignment);

        statistics.iterations = outcome.iterations;
        statistics.moves_evaluated = outcome.moves_evaluated;
        statistics.moves_accepted = outcome.moves_accepted;
        statistics.improvements = outcome.improvements;
        statistics.search_duration = outcome.duration;
        statistics.final_score = Some(outcome.best_score);
        statistics.termination = Some(outcome.reason);

        info!(
            event = "solve_end",
            score = %outcome.best_score,
            feasible = outcome.best_score.is_feasible(),
            conflicts = report.len(),
            reason = %outcome.reason,
            iterations = statistics.iterations,
            duration_ms = statistics.total_duration().as_millis() as u64,
            acceptance_rate = statistics.acceptance_rate(),
        );

        Ok(SeatingPlan {
            assignment,
            report,
            records,
            score: outcome.best_score,
            statistics,
        })
    }
}

/// Solves `snapshot` with the default configuration, `budget` and `seed`.
///
/// # Errors
///
/// Fails when the snapshot is invalid.
pub fn solve(snapshot: Snapshot, budget: Budget, seed: u64) -> Result<SeatingPlan, SolverError> {
    SeatingSolver::default().solve(
        SeatingRequest::new(snapshot)
            .with_budget(budget)
            .with_seed(seed),
    )
}
