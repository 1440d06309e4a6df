//! Configuration system for seatplan.
//!
//! Load seating engine configuration from TOML or YAML files to control the
//! optimization budget, annealing schedule and conflict reporting without
//! code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use seatplan_config::SeatingConfig;
//! use std::time::Duration;
//!
//! let config = SeatingConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     millis_spent_limit = 1500
//!     iteration_limit = 50000
//!
//!     [annealing]
//!     starting_temperature = 3.0
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
//! assert_eq!(config.termination.iteration_limit, Some(50_000));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use seatplan_config::SeatingConfig;
//!
//! let config = SeatingConfig::load("seating.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use seatplan_core::{ScoreParseError, SeatingScore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default seed used when neither the request nor the config supplies one.
pub const DEFAULT_RANDOM_SEED: u64 = 0x5EA7_1A4E;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid score: {0}")]
    Score(#[from] ScoreParseError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main seating engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SeatingConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Optimization budget and convergence settings.
    #[serde(default)]
    pub termination: TerminationConfig,

    /// Simulated annealing schedule.
    #[serde(default)]
    pub annealing: AnnealingConfig,

    /// Conflict report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl SeatingConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annealing.validate()?;
        self.termination.best_score_limit()?;
        if self.termination.stall_iteration_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "stall_iteration_limit must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.termination.millis_spent_limit = Some(limit.as_millis() as u64);
        self.termination.seconds_spent_limit = None;
        self
    }

    /// Sets the iteration cap.
    pub fn with_iteration_limit(mut self, iterations: u64) -> Self {
        self.termination.iteration_limit = Some(iterations);
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Returns the configured seed, or the crate default.
    pub fn seed(&self) -> u64 {
        self.random_seed.unwrap_or(DEFAULT_RANDOM_SEED)
    }

    /// Returns the wall-clock limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.time_limit()
    }
}

/// Termination configuration.
///
/// The time and iteration limits form the budget: whichever triggers first
/// ends the search. The stall window and best score limit end it earlier
/// when the search has converged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TerminationConfig {
    /// Maximum seconds to spend optimizing.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend optimizing. Ignored when
    /// `seconds_spent_limit` is set.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of local search iterations.
    pub iteration_limit: Option<u64>,

    /// Consecutive iterations without a new best score before stopping.
    pub stall_iteration_limit: Option<u64>,

    /// Stop as soon as this score is reached (e.g. "0hard/40soft").
    pub best_score_limit: Option<String>,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            seconds_spent_limit: None,
            millis_spent_limit: Some(2_000),
            iteration_limit: Some(200_000),
            stall_iteration_limit: Some(20_000),
            best_score_limit: None,
        }
    }
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = match self.seconds_spent_limit {
            Some(seconds) => seconds.saturating_mul(1_000),
            None => self.millis_spent_limit.unwrap_or(0),
        };
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }

    /// Parses the configured best score limit.
    pub fn best_score_limit(&self) -> Result<Option<SeatingScore>, ConfigError> {
        self.best_score_limit
            .as_deref()
            .map(str::parse::<SeatingScore>)
            .transpose()
            .map_err(ConfigError::from)
    }
}

/// Simulated annealing schedule.
///
/// The temperature starts at `starting_temperature` and is multiplied by the
/// decay rate after every iteration. Without an explicit `decay_rate` the
/// rate is chosen so the temperature reaches `minimum_temperature` exactly at
/// the iteration limit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AnnealingConfig {
    pub starting_temperature: f64,
    pub minimum_temperature: f64,
    pub decay_rate: Option<f64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            starting_temperature: 2.0,
            minimum_temperature: 0.01,
            decay_rate: None,
        }
    }
}

impl AnnealingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.starting_temperature > 0.0) || !self.starting_temperature.is_finite() {
            return Err(ConfigError::Invalid(
                "starting_temperature must be a positive number".into(),
            ));
        }
        if !(self.minimum_temperature > 0.0) {
            return Err(ConfigError::Invalid(
                "minimum_temperature must be positive".into(),
            ));
        }
        if self.minimum_temperature > self.starting_temperature {
            return Err(ConfigError::Invalid(
                "minimum_temperature exceeds starting_temperature".into(),
            ));
        }
        if let Some(rate) = self.decay_rate {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::Invalid(
                    "decay_rate must be in (0, 1]".into(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the per-iteration decay rate for a given iteration budget.
    pub fn decay_rate_for(&self, iteration_limit: Option<u64>) -> f64 {
        if let Some(rate) = self.decay_rate {
            return rate;
        }
        match iteration_limit {
            Some(limit) if limit > 0 => {
                (self.minimum_temperature / self.starting_temperature).powf(1.0 / limit as f64)
            }
            _ => DEFAULT_DECAY_RATE,
        }
    }
}

/// Decay rate used when neither a rate nor an iteration limit is configured.
pub const DEFAULT_DECAY_RATE: f64 = 0.9995;

/// Conflict report configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ReportConfig {
    /// Unmet soft preferences with at least this weight are reported.
    pub notable_weight: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { notable_weight: 3 }
    }
}
