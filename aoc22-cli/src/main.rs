//! AOC22 CLI - run and list the Advent of Code 2022 solvers

mod aggregator;
mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Import aoc22-solutions to link the solver plugins
use aoc22_solutions as _;

use aoc22_solver::{SolverRegistry, SolverRegistryBuilder};
use chrono::NaiveDate;
use clap::Parser;
use cli::{Args, Command, ListArgs, RunArgs};
use config::Config;
use error::CliError;
use executor::Executor;
use inputs::InputStore;
use output::{OutputFormatter, OutputOptions};
use std::collections::BTreeMap;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// The only event year this catalog covers
pub const YEAR: u16 = 2022;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns whether every executed part produced an answer
fn run(args: Args) -> Result<bool, CliError> {
    match args.command {
        Command::Run(run_args) => run_solvers(run_args),
        Command::List(list_args) => {
            list_solvers(list_args)?;
            Ok(true)
        }
    }
}

fn run_solvers(args: RunArgs) -> Result<bool, CliError> {
    let requested = args.selection;
    let config = Config::from_args(args)?;
    debug!(?config, "resolved configuration");

    let registry = build_registry(&config.tags)?;
    let titles: BTreeMap<u8, &'static str> = registry
        .storage()
        .iter_info()
        .filter(|info| info.year == YEAR)
        .map(|info| (info.day, info.title))
        .collect();

    let executor = Executor::new(registry, &config).map_err(|e| CliError::Config(e.to_string()))?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        return Err(CliError::NoMatch(format!(
            "nothing registered for '{}'",
            requested
        )));
    }
    info!(days = work_items.len(), "running solvers");

    let expected_keys: Vec<aggregator::ResultKey> = work_items
        .iter()
        .flat_map(|w| {
            w.parts.clone().map(move |p| aggregator::ResultKey {
                year: w.year,
                day: w.day,
                part: p,
            })
        })
        .collect();

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    // Print results in (day, part) order as they become ready
    let options = OutputOptions {
        quiet: config.quiet,
        benchmark: config.benchmark,
        stacktrace: config.stacktrace,
    };
    let mut formatter = OutputFormatter::new(options, titles);
    let mut aggregator = aggregator::ResultAggregator::new(expected_keys);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            formatter.print_result(&ready);
            results.push(ready);
        }
    }

    for ready in aggregator.drain() {
        formatter.print_result(&ready);
        results.push(ready);
    }

    if !aggregator.is_complete() {
        eprintln!("Warning: Not all expected results were received");
    }

    executor_handle
        .join()
        .map_err(|_| CliError::Config("Executor thread panicked".to_string()))?
        .map_err(CliError::Executor)?;

    formatter.print_summary(&results);

    Ok(aggregator.is_complete() && results.iter().all(|r| r.answer.is_ok()))
}

/// Print every registered day with its date, puzzle page, input file and parts
fn list_solvers(args: ListArgs) -> Result<(), CliError> {
    let registry = build_registry(&[])?;
    let inputs = InputStore::new(config::expand_tilde(&args.input_dir));
    let days: Vec<_> = registry
        .storage()
        .iter_info()
        .filter(|info| info.year == YEAR)
        .collect();

    println!("Advent of Code {}: {}/25 days", YEAR, days.len());
    for info in days {
        let date = NaiveDate::from_ymd_opt(i32::from(YEAR), 12, u32::from(info.day))
            .map(|d| d.to_string())
            .unwrap_or_default();
        let input_path = inputs.input_path(info.day);
        let input_state = if inputs.contains(info.day) {
            ""
        } else {
            " (missing)"
        };

        println!();
        println!("Day {:>2}  {}  {}", info.day, date, info.title);
        println!("        https://adventofcode.com/{}/day/{}", YEAR, info.day);
        println!("        input: {}{}", input_path.display(), input_state);
        println!("        parts: {}", info.parts);
        if !info.tags.is_empty() {
            println!("        tags: {}", info.tags.join(", "));
        }
    }
    Ok(())
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<SolverRegistry, CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
