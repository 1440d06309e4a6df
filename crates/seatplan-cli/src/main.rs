//! `seatplan` command line front end.

mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use seatplan::{
    import, Budget, ConfigError, RawSnapshot, SeatAssignmentRecord, SeatingConfig, SeatingRequest,
    SeatingSolver, Snapshot, SolverError, ValidationError,
};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seatplan", version, about = "Wedding seating assignment engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seat the guests of a snapshot file and print the plan.
    Solve {
        /// Snapshot JSON with guests, tables and preferences.
        #[arg(long)]
        snapshot: PathBuf,
        /// Solver configuration, TOML or YAML by extension.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Previously exported seat records to start from.
        #[arg(long)]
        warm_start: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Iteration cap; replaces the configured budget.
        #[arg(long)]
        iterations: Option<u64>,
        /// Wall-clock limit in milliseconds; replaces the configured budget.
        #[arg(long)]
        millis: Option<u64>,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("cannot write output: {0}")]
    Output(serde_json::Error),
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Solve {
            snapshot,
            config,
            warm_start,
            seed,
            iterations,
            millis,
            format,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => SeatingConfig::default(),
            };
            let solver = SeatingSolver::new(config)?;

            let typed = Snapshot::try_from(read_json::<RawSnapshot>(&snapshot)?)?;
            let mut request = SeatingRequest::new(typed.clone());
            if let Some(path) = warm_start {
                let records: Vec<SeatAssignmentRecord> = read_json(&path)?;
                request = request.with_warm_start(import(&records));
            }
            if iterations.is_some() || millis.is_some() {
                request = request.with_budget(Budget {
                    time_limit: millis.map(Duration::from_millis),
                    iteration_limit: iterations,
                });
            }
            if let Some(seed) = seed {
                request = request.with_seed(seed);
            }

            let plan = solver.solve(request)?;
            match format {
                Format::Text => output::print_text(&typed, &plan),
                Format::Json => output::print_json(&plan).map_err(CliError::Output)?,
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<SeatingConfig, CliError> {
    debug!(event = "load_config", path = %path.display());
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let config = if yaml {
        SeatingConfig::from_yaml_file(path)?
    } else {
        SeatingConfig::from_toml_file(path)?
    };
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
