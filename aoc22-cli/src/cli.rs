//! CLI argument parsing using clap

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Parallelization level for solver execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// No parallelization; execute all days and parts in order
    Sequential,
    /// Parallelize across days; parts run sequentially (default)
    #[default]
    Day,
    /// Parallelize across all day/part combinations
    Part,
}

/// Which days a `run` invocation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Day(u8),
    /// Highest registered day
    Latest,
    /// Puzzle released on the current date (December, UTC-5)
    Today,
    All,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "latest" => Ok(Selection::Latest),
            "today" => Ok(Selection::Today),
            "all" => Ok(Selection::All),
            _ => {
                let digits = s.strip_prefix("day").unwrap_or(&s);
                match digits.parse::<u8>() {
                    Ok(day @ 1..=25) => Ok(Selection::Day(day)),
                    _ => Err(format!(
                        "'{}' is not a day (1-25, day9, latest, today or all)",
                        s
                    )),
                }
            }
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Day(day) => write!(f, "day {}", day),
            Selection::Latest => write!(f, "latest"),
            Selection::Today => write!(f, "today"),
            Selection::All => write!(f, "all"),
        }
    }
}

/// Advent of Code 2022 solver runner
#[derive(Parser, Debug)]
#[command(name = "aoc22", about = "Run Advent of Code 2022 solvers", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve one day, the latest day, today's puzzle, or all days
    Run(RunArgs),
    /// Show which days are implemented
    List(ListArgs),
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    /// Day number (9 or day9), latest, today, or all
    #[arg(default_value = "latest")]
    pub selection: Selection,

    /// Part to run (runs all parts if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Print parse and solve durations
    #[arg(short, long)]
    pub benchmark: bool,

    /// Print the full error chain of failed parts
    #[arg(short, long)]
    pub stacktrace: bool,

    /// Time budget per part, e.g. 2s or 500ms; 0s disables it
    #[arg(short, long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Tags to filter solvers (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Directory holding dayNN/input.txt files
    #[arg(long, default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, day, or part
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Directory holding dayNN/input.txt files
    #[arg(long, default_value = "inputs")]
    pub input_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_selection_parsing() {
        assert_eq!("9".parse::<Selection>(), Ok(Selection::Day(9)));
        assert_eq!("day12".parse::<Selection>(), Ok(Selection::Day(12)));
        assert_eq!("Latest".parse::<Selection>(), Ok(Selection::Latest));
        assert_eq!("today".parse::<Selection>(), Ok(Selection::Today));
        assert_eq!("all".parse::<Selection>(), Ok(Selection::All));
        assert!("0".parse::<Selection>().is_err());
        assert!("26".parse::<Selection>().is_err());
        assert!("dayX".parse::<Selection>().is_err());
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let args = Args::try_parse_from(["aoc22", "run"]).unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.selection, Selection::Latest);
        assert_eq!(run.timeout, Duration::from_secs(10));
        assert_eq!(run.parallelize_by, ParallelizeBy::Day);
        assert!(!run.benchmark);
    }

    #[test]
    fn test_run_flags() {
        let args = Args::try_parse_from([
            "aoc22", "run", "day9", "-b", "-s", "-t", "500ms", "-p", "2", "--tags", "grid,bfs", "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.selection, Selection::Day(9));
        assert!(run.benchmark && run.stacktrace);
        assert_eq!(run.timeout, Duration::from_millis(500));
        assert_eq!(run.part, Some(2));
        assert_eq!(run.tags, vec!["grid", "bfs"]);
    }

    #[test]
    fn test_part_out_of_range_rejected() {
        assert!(Args::try_parse_from(["aoc22", "run", "1", "-p", "3"]).is_err());
    }
}
