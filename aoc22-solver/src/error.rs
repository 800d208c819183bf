//! Error types for the solver library

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// Error type for parsing input data
///
/// Parse errors are fatal for the day that produced them; other days keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input format doesn't match expected structure
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Required data is missing from input
    #[error("Missing data: {0}")]
    MissingData(String),
    /// Other parsing errors
    #[error("Parse error: {0}")]
    Other(String),
}

impl ParseError {
    /// Invalid format error tagged with a 1-based line number
    pub fn at_line(line_idx: usize, err: impl Display) -> Self {
        ParseError::InvalidFormat(format!("(line {}) {}", line_idx + 1, err))
    }
}

/// Error type for solving a specific part
#[derive(Debug, Error)]
pub enum SolveError {
    /// The requested part number is not implemented
    #[error("Part {0} is not implemented")]
    PartNotImplemented(u8),
    /// The requested part number is out of range (exceeds max_parts)
    #[error("Part {0} is out of range")]
    PartOutOfRange(u8),
    /// The puzzle has no answer for this input (e.g. the target is unreachable)
    #[error("No solution: {0}")]
    NoSolution(String),
    /// An error occurred while solving the part
    #[error("Solve failed: {0}")]
    SolveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SolveError {
    pub fn no_solution(reason: impl Into<String>) -> Self {
        SolveError::NoSolution(reason.into())
    }
}

/// Error type for solver operations
#[derive(Debug, Error)]
pub enum SolverError {
    /// Solver not found for the given year and day
    #[error("Solver not found for year {0} day {1}")]
    NotFound(u16, u8),
    /// Year or day outside the supported storage range
    #[error("Invalid year/day: {0}/{1}")]
    InvalidYearDay(u16, u8),
    /// Error occurred during parsing
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    /// Error occurred during solving
    #[error("Solve error: {0}")]
    SolveError(#[from] SolveError),
    /// The part did not finish within its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl SolverError {
    /// Whether this error represents an exceeded time budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, SolverError::Timeout(_))
    }
}

/// Error type for registration failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Attempted to register a solver for a year-day combination that already exists
    #[error("Duplicate solver registration for year {0} day {1}")]
    DuplicateSolver(u16, u8),
    /// Year or day outside the supported storage range
    #[error("Invalid year/day: {0}/{1}")]
    InvalidYearDay(u16, u8),
}
