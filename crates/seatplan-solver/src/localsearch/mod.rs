//! Local search optimizer.
//!
//! Simulated annealing over swap and relocate moves, evaluated through the
//! incremental score director. The search keeps the best plan it has seen
//! and returns that, so its result is never worse than where it started.

mod acceptor;
mod moves;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seatplan_config::AnnealingConfig;
use seatplan_core::{Assignment, SeatingScore, ValidationError};
use seatplan_scoring::{
    assignment_from_seating, ConstraintModel, RecordingScoreDirector, ScoreDirector,
};
use tracing::{debug, info, trace};

use crate::scope::SearchScope;
use crate::termination::{
    BestScoreTermination, Budget, ExternalTermination, OrTermination, StepCountTermination,
    Termination, TerminationReason, TimeTermination, UnimprovedStepCountTermination,
};

pub use acceptor::SimulatedAnnealingAcceptor;
pub use moves::{MoveKind, MoveSampler, SeatingMove};

/// Stall window applied when the budget sets no limit at all.
pub const DEFAULT_STALL_WINDOW: u64 = 20_000;

/// Lifecycle of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchState {
    Initializing,
    Searching,
    Converged,
    BudgetExpired,
    Done,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        self == SearchState::Done
    }

    /// Next state. Transitions outside the lifecycle leave the state unchanged.
    fn advance(self, reason: Option<TerminationReason>) -> SearchState {
        match (self, reason) {
            (SearchState::Initializing, None) => SearchState::Searching,
            (SearchState::Initializing | SearchState::Searching, Some(reason)) => {
                if reason.is_budget() {
                    SearchState::BudgetExpired
                } else {
                    SearchState::Converged
                }
            }
            (SearchState::Converged | SearchState::BudgetExpired, _) => SearchState::Done,
            (state, _) => state,
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchState::Initializing => "initializing",
            SearchState::Searching => "searching",
            SearchState::Converged => "converged",
            SearchState::BudgetExpired => "budget_expired",
            SearchState::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a finished search hands back.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best plan seen, per table in seat order.
    pub best_seating: Vec<Vec<usize>>,
    pub best_score: SeatingScore,
    pub initial_score: SeatingScore,
    pub reason: TerminationReason,
    /// `Converged` or `BudgetExpired`, the state before `Done`.
    pub end_state: SearchState,
    pub iterations: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    pub improvements: u64,
    pub duration: Duration,
}

/// Settings of one local search run.
#[derive(Debug, Clone)]
pub struct LocalSearchPhase {
    budget: Budget,
    stall_window: Option<u64>,
    best_score_limit: Option<SeatingScore>,
    acceptor: SimulatedAnnealingAcceptor,
}

impl LocalSearchPhase {
    /// Creates a phase with the default annealing schedule for this budget.
    pub fn new(budget: Budget) -> Self {
        Self::with_annealing(budget, &AnnealingConfig::default())
    }

    pub fn with_annealing(budget: Budget, annealing: &AnnealingConfig) -> Self {
        let acceptor = SimulatedAnnealingAcceptor::new(
            annealing.starting_temperature,
            annealing.minimum_temperature,
            annealing.decay_rate_for(budget.iteration_limit),
        );
        Self {
            budget,
            stall_window: None,
            best_score_limit: None,
            acceptor,
        }
    }

    /// Stops after this many consecutive iterations without a new best.
    pub fn with_stall_window(mut self, window: Option<u64>) -> Self {
        self.stall_window = window;
        self
    }

    /// Stops as soon as the best score reaches `target`.
    pub fn with_best_score_limit(mut self, target: Option<SeatingScore>) -> Self {
        self.best_score_limit = target;
        self
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Improves the director's plan in place using the configured budget.
    ///
    /// On return the director holds the last working plan, which may be
    /// worse than `best_seating` in the outcome.
    pub fn solve(&mut self, director: &mut ScoreDirector<'_>, rng: &mut ChaCha8Rng) -> SearchOutcome {
        self.solve_with_flag(director, rng, None)
    }

    /// Like [`solve`](Self::solve), also stopping once `terminate` is set.
    pub fn solve_with_flag(
        &mut self,
        director: &mut ScoreDirector<'_>,
        rng: &mut ChaCha8Rng,
        terminate: Option<&AtomicBool>,
    ) -> SearchOutcome {
        let model = director.model();
        let stall = match self.stall_window {
            None if self.budget.is_unbounded() => Some(DEFAULT_STALL_WINDOW),
            window => window,
        };
        // earlier entries win when several fire at once
        let termination = OrTermination((
            terminate.map(ExternalTermination::new),
            self.best_score_limit.map(BestScoreTermination::new),
            Some(BestScoreTermination::perfect(model.soft_ceiling())),
            stall.map(UnimprovedStepCountTermination::new),
            self.budget.iteration_limit.map(StepCountTermination::new),
            self.budget.time_limit.map(TimeTermination::new),
        ));
        self.run(director, rng, &termination)
    }

    fn run<T: Termination>(
        &mut self,
        director: &mut ScoreDirector<'_>,
        rng: &mut ChaCha8Rng,
        termination: &T,
    ) -> SearchOutcome {
        let started = Instant::now();
        let sampler = MoveSampler::new(director.model());
        let initial_score = director.score();
        let mut scope = SearchScope::new(initial_score);
        let mut best_seating = director.seating().to_vec();
        let mut current = initial_score;

        let mut state = SearchState::Initializing;
        let mut moves_evaluated = 0u64;
        let mut moves_accepted = 0u64;
        let mut improvements = 0u64;
        let mut last_progress = Instant::now();

        info!(
            event = "phase_start",
            phase = "Local Search",
            phase_index = 1,
            guests = director.model().guest_count(),
            tables = director.model().table_count(),
            score = %initial_score,
        );

        self.acceptor.phase_started();
        let reason = if sampler.has_moves() {
            state = transition(state, None);
            loop {
                if let Some(reason) = termination.check(&scope) {
                    break reason;
                }

                let mut new_best = None;
                if let Some(candidate) = sampler.sample(director, rng) {
                    moves_evaluated += 1;
                    let mut recording = RecordingScoreDirector::new(director);
                    candidate.do_move(&mut recording);
                    let score = recording.score();
                    let accepted = self.acceptor.is_accepted(current, score, rng);

                    trace!(
                        event = "step",
                        step = scope.iteration_count(),
                        candidate = %candidate,
                        score = %score,
                        accepted = accepted,
                    );

                    if accepted {
                        recording.commit();
                        moves_accepted += 1;
                        current = score;
                        if score > scope.best_score() {
                            improvements += 1;
                            best_seating = recording.seating().to_vec();
                            new_best = Some(score);
                            debug!(event = "new_best", step = scope.iteration_count(), score = %score);
                        }
                    } else {
                        recording.undo_changes();
                    }
                }

                self.acceptor.step_ended();
                scope.complete_iteration(new_best);

                if last_progress.elapsed().as_secs() >= 1 {
                    debug!(
                        event = "progress",
                        steps = scope.iteration_count(),
                        speed = moves_evaluated * 1_000 / started.elapsed().as_millis().max(1) as u64,
                        temperature = self.acceptor.temperature(),
                        score = %scope.best_score(),
                    );
                    last_progress = Instant::now();
                }
            }
        } else {
            TerminationReason::NoMoves
        };

        state = transition(state, Some(reason));
        let end_state = state;
        state = transition(state, None);
        debug_assert!(state.is_terminal());

        let duration = started.elapsed();
        info!(
            event = "phase_end",
            phase = "Local Search",
            phase_index = 1,
            duration_ms = duration.as_millis() as u64,
            steps = scope.iteration_count(),
            moves_evaluated = moves_evaluated,
            accepted = moves_accepted,
            reason = %reason,
            score = %scope.best_score(),
        );

        SearchOutcome {
            best_seating,
            best_score: scope.best_score(),
            initial_score,
            reason,
            end_state,
            iterations: scope.iteration_count(),
            moves_evaluated,
            moves_accepted,
            improvements,
            duration,
        }
    }
}

fn transition(from: SearchState, reason: Option<TerminationReason>) -> SearchState {
    let to = from.advance(reason);
    if to != from {
        debug!(event = "search_state", from = %from, to = %to);
    }
    to
}

/// Improves `initial` within `budget`, drawing randomness from `seed`.
///
/// Returns the best plan seen, which scores at least as well as `initial`.
/// The stall window comes from the default configuration.
///
/// # Errors
///
/// Fails if `initial` names a guest or table the model lacks.
pub fn optimize(
    model: &ConstraintModel,
    initial: &Assignment,
    budget: Budget,
    seed: u64,
) -> Result<Assignment, ValidationError> {
    let mut director = ScoreDirector::from_assignment(model, initial)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let stall = seatplan_config::TerminationConfig::default().stall_iteration_limit;
    let outcome = LocalSearchPhase::new(budget)
        .with_stall_window(stall)
        .solve(&mut director, &mut rng);
    Ok(assignment_from_seating(model, &outcome.best_seating))
}
