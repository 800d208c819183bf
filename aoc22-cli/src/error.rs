//! Error types for the CLI

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use thiserror_ext::Arc as ArcDerive;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No registered day matches the selection
    #[error("No matching solver: {0}")]
    NoMatch(String),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc22_solver::RegistrationError),

    /// Executor error (wraps Arc for cheap cloning)
    #[error("{0}")]
    Executor(#[from] ArcExecutorError),
}

/// Executor-specific errors
#[derive(Error, Debug, ArcDerive)]
#[thiserror_ext(newtype(name = ArcExecutorError))]
pub enum ExecutorError {
    /// Channel send error
    #[error("Channel send error")]
    ChannelSend,

    /// Thread pool creation failed
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(String),

    /// Worker thread could not be started
    #[error("Failed to spawn worker for day {day} part {part}: {source}")]
    Spawn {
        day: u8,
        part: u8,
        #[source]
        source: std::io::Error,
    },

    /// Multiple errors collected during parallel execution
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ArcExecutorError>),
}

impl ArcExecutorError {
    /// Merge into one flat `Multiple`, keeping `first`'s errors ahead of `second`'s
    pub fn combine(first: ArcExecutorError, second: ArcExecutorError) -> ArcExecutorError {
        let errors = match (first.inner(), second.inner()) {
            (ExecutorError::Multiple(v1), ExecutorError::Multiple(v2)) => {
                let mut combined = v1.clone();
                combined.extend(v2.iter().cloned());
                combined
            }
            (_, ExecutorError::Multiple(v)) => {
                let mut combined = vec![first];
                combined.extend(v.iter().cloned());
                combined
            }
            (ExecutorError::Multiple(v), _) => {
                let mut combined = v.clone();
                combined.push(second);
                combined
            }
            _ => vec![first, second],
        };
        ExecutorError::Multiple(errors).into()
    }

    /// Combine an optional error with a new error
    pub fn combine_opt(
        existing: Option<ArcExecutorError>,
        new: ArcExecutorError,
    ) -> ArcExecutorError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}

/// Input loading errors, reported per day
#[derive(Error, Debug)]
pub enum InputError {
    /// No input file for the day
    #[error("Missing input for day {day}: {} not found", .path.display())]
    Missing { day: u8, path: PathBuf },

    /// Input file exists but could not be read
    #[error("Failed to read input for day {day} from {}: {source}", .path.display())]
    Read {
        day: u8,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single part produced no answer
#[derive(Error, Debug)]
pub enum PartError {
    /// The day's input could not be loaded; shared by every part of the day
    #[error(transparent)]
    Input(#[from] Arc<InputError>),

    #[error(transparent)]
    Solver(#[from] aoc22_solver::SolverError),
}

impl PartError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PartError::Solver(e) if e.is_timeout())
    }
}
