//! Simulated annealing acceptor over the lexicographic score.

use rand::Rng;
use seatplan_core::SeatingScore;

/// Accepts moves with a temperature-based probability.
///
/// Hard violations decide first: a move that removes one is always taken,
/// a move that adds one never is. With the hard count unchanged, a soft gain
/// (or a sideways move) is taken, and a soft loss `d` is taken with
/// probability `exp(-d / T)`. The temperature decays geometrically each
/// iteration and never drops below its minimum.
///
/// # Example
///
/// ```
/// use seatplan_solver::localsearch::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(2.0, 0.01, 0.999);
/// assert_eq!(acceptor.temperature(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    minimum_temperature: f64,
    current_temperature: f64,
    decay_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(starting_temperature: f64, minimum_temperature: f64, decay_rate: f64) -> Self {
        Self {
            starting_temperature,
            minimum_temperature,
            current_temperature: starting_temperature,
            decay_rate,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }

    pub fn phase_started(&mut self) {
        self.current_temperature = self.starting_temperature;
    }

    /// Cools down after one iteration.
    pub fn step_ended(&mut self) {
        self.current_temperature =
            (self.current_temperature * self.decay_rate).max(self.minimum_temperature);
    }

    /// Decides whether to keep a move from `last` to `candidate`.
    ///
    /// Draws from `rng` only for soft-worsening moves.
    pub fn is_accepted<R: Rng>(&self, last: SeatingScore, candidate: SeatingScore, rng: &mut R) -> bool {
        let delta = last.delta_to(candidate);
        if delta.hard != 0 {
            // delta.hard counts violations: negative means fewer
            return delta.hard < 0;
        }
        if delta.soft >= 0 {
            return true;
        }
        if self.current_temperature <= 0.0 {
            return false;
        }
        let probability = (delta.soft as f64 / self.current_temperature).exp();
        rng.random::<f64>() < probability
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(2.0, 0.01, 0.9995)
    }
}
