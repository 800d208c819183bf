//! Configuration resolution from CLI args

use crate::cli::{ParallelizeBy, RunArgs, Selection};
use crate::error::CliError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Puzzles unlock at midnight in this offset (UTC-5)
const RELEASE_OFFSET_SECS: i32 = 5 * 3600;

/// Resolved runtime configuration for `run`
#[derive(Debug)]
pub struct Config {
    /// Days to run; `Today` is already resolved to a concrete day
    pub selection: Selection,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Directory holding the puzzle inputs
    pub input_dir: PathBuf,
    /// Number of threads for parallel execution
    pub thread_count: usize,
    /// Parallelization level
    pub parallelize_by: ParallelizeBy,
    /// Time budget per part (None = unlimited)
    pub timeout: Option<Duration>,
    pub benchmark: bool,
    pub stacktrace: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args, resolving `today` against the wall clock
    pub fn from_args(args: RunArgs) -> Result<Self, CliError> {
        Self::from_args_at(args, Utc::now())
    }

    fn from_args_at(args: RunArgs, now: DateTime<Utc>) -> Result<Self, CliError> {
        let selection = match args.selection {
            Selection::Today => puzzle_day_on(now).map(Selection::Day).ok_or_else(|| {
                CliError::NoMatch(format!("no puzzle is released on {}", release_date(now)))
            })?,
            other => other,
        };
        if args.threads == Some(0) {
            return Err(CliError::Config("thread count must be positive".to_string()));
        }

        Ok(Config {
            selection,
            part_filter: args.part,
            tags: args.tags,
            input_dir: expand_tilde(&args.input_dir),
            thread_count: args.threads.unwrap_or_else(num_cpus),
            parallelize_by: args.parallelize_by,
            timeout: Some(args.timeout).filter(|t| !t.is_zero()),
            benchmark: args.benchmark,
            stacktrace: args.stacktrace,
            quiet: args.quiet,
        })
    }
}

fn release_date(now: DateTime<Utc>) -> NaiveDate {
    match FixedOffset::west_opt(RELEASE_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// Day of the puzzle released on the date of `now`, if it is a December puzzle day
pub fn puzzle_day_on(now: DateTime<Utc>) -> Option<u8> {
    let date = release_date(now);
    (date.month() == 12 && date.day() <= 25).then_some(date.day() as u8)
}

/// Expand ~ to home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
