//! Error types for seating solves

use seatplan_config::ConfigError;
use seatplan_core::ValidationError;
use thiserror::Error;

/// Why a solve could not start.
///
/// Constraint violations are never errors; they come back in the plan's
/// conflict report.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Malformed or contradictory input
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Unusable solver configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for seating solves
pub type Result<T> = std::result::Result<T, SolverError>;
