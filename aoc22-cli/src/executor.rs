//! Parallel executor for running solvers under a per-part time budget

use crate::YEAR;
use crate::cli::{ParallelizeBy, Selection};
use crate::config::{Config, puzzle_day_on};
use crate::error::{ArcExecutorError, ExecutorError, InputError, PartError};
use crate::inputs::InputStore;
use aoc22_solver::{FactoryInfo, SolverError, SolverRegistry};
use chrono::{TimeDelta, Utc};
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result from a single part execution
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, PartError>,
    /// Absent when the input never made it through the parser
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

impl SolverResult {
    fn failed(year: u16, day: u8, part: u8, error: PartError) -> Self {
        Self {
            year,
            day,
            part,
            answer: Err(error),
            parse_duration: None,
            solve_duration: TimeDelta::zero(),
        }
    }
}

/// Work item representing a solver to execute
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    sync_executor_config: SyncExecutorConfig,
    thread_pool: rayon::ThreadPool,
}

pub struct SyncExecutorConfig {
    registry: Arc<SolverRegistry>,
    inputs: InputStore,
    parallelize_by: ParallelizeBy,
    selection: Selection,
    part_filter: Option<u8>,
    timeout: Option<Duration>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            sync_executor_config: SyncExecutorConfig {
                registry: Arc::new(registry),
                inputs: InputStore::new(config.input_dir.clone()),
                parallelize_by: config.parallelize_by,
                selection: config.selection,
                part_filter: config.part_filter,
                timeout: config.timeout,
            },
            thread_pool,
        })
    }

    /// Collect work items for the selected days from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.sync_executor_config;
        let storage = cfg.registry.storage();
        let selected: Vec<FactoryInfo> = match cfg.selection {
            Selection::All => storage.iter_info().filter(|info| info.year == YEAR).collect(),
            Selection::Latest => storage.latest().into_iter().collect(),
            Selection::Day(day) => storage.get_info(YEAR, day).into_iter().collect(),
            Selection::Today => puzzle_day_on(Utc::now())
                .and_then(|day| storage.get_info(YEAR, day))
                .into_iter()
                .collect(),
        };

        selected
            .into_iter()
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Filter parts based on config.part_filter and solver's max parts
    #[allow(clippy::reversed_empty_ranges)]
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.sync_executor_config.part_filter {
            Some(p) if p <= max_parts => p..=p,
            Some(_) => 1..=0,
            None => 1..=max_parts,
        }
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        let cfg = &self.sync_executor_config;
        info!(
            days = work_items.len(),
            parallelize_by = ?cfg.parallelize_by,
            timeout = ?cfg.timeout,
            "starting run"
        );

        match cfg.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_day(&work, &tx, cfg) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Day | ParallelizeBy::Part => self.execute_parallel(work_items, &tx),
        }
    }

    /// Execute work items in parallel, collecting errors
    fn execute_parallel(
        &self,
        work_items: Vec<WorkItem>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let cfg = &self.sync_executor_config;

        self.thread_pool.install(|| {
            work_items
                .into_par_iter()
                .map(|work| run_day(&work, tx, cfg).err())
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(err1), Some(err2)) => Some(ArcExecutorError::combine(err1, err2)),
                    (err1, err2) => err1.or(err2),
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }
}

/// Load the day's input and run each selected part, sending results in part order
fn run_day(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    cfg: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let send = |result: SolverResult| {
        tx.send(result)
            .map_err(|_| ArcExecutorError::from(ExecutorError::ChannelSend))
    };

    let input: Arc<str> = match cfg.inputs.get(work.day) {
        Ok(input) => input.into(),
        Err(e) => {
            warn!(day = work.day, error = %e, "input unavailable");
            let error: Arc<InputError> = Arc::new(e);
            for part in work.parts.clone() {
                send(SolverResult::failed(
                    work.year,
                    work.day,
                    part,
                    PartError::Input(Arc::clone(&error)),
                ))?;
            }
            return Ok(());
        }
    };

    if matches!(cfg.parallelize_by, ParallelizeBy::Part) {
        // collect keeps part order
        let results: Vec<_> = work
            .parts
            .clone()
            .into_par_iter()
            .map(|part| run_part(work, part, &input, cfg))
            .collect();
        for result in results {
            send(result?)?;
        }
    } else {
        for part in work.parts.clone() {
            send(run_part(work, part, &input, cfg)?)?;
        }
    }
    Ok(())
}

/// Parse and solve one part on its own worker thread, waiting at most the time budget
///
/// A worker that overruns the budget cannot be cancelled; it is abandoned and
/// dies with the process.
fn run_part(
    work: &WorkItem,
    part: u8,
    input: &Arc<str>,
    cfg: &SyncExecutorConfig,
) -> Result<SolverResult, ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let (done_tx, done_rx) = mpsc::channel();
    let registry = Arc::clone(&cfg.registry);
    let input = Arc::clone(input);

    debug!(day, part, "solving");
    thread::Builder::new()
        .name(format!("day{:02}-part{}", day, part))
        .spawn(move || {
            done_tx.send(solve_part_internal(&registry, year, day, part, &input)).ok();
        })
        .map_err(|source| ExecutorError::Spawn { day, part, source })?;

    let outcome = match cfg.timeout {
        Some(budget) => done_rx.recv_timeout(budget),
        None => done_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    Ok(match outcome {
        Ok(result) => {
            debug!(day, part, ok = result.answer.is_ok(), "finished");
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(day, part, budget = ?cfg.timeout, "part timed out, abandoning worker");
            let budget = cfg.timeout.unwrap_or_default();
            SolverResult {
                solve_duration: TimeDelta::from_std(budget).unwrap_or(TimeDelta::zero()),
                ..SolverResult::failed(year, day, part, SolverError::Timeout(budget).into())
            }
        }
        Err(RecvTimeoutError::Disconnected) => {
            warn!(day, part, "worker exited without a result");
            let panicked = aoc22_solver::SolveError::SolveFailed("worker thread panicked".into());
            SolverResult::failed(year, day, part, SolverError::from(panicked).into())
        }
    })
}

/// Parse the input and solve a single part
fn solve_part_internal(
    registry: &SolverRegistry,
    year: u16,
    day: u8,
    part: u8,
    input: &str,
) -> SolverResult {
    let mut solver = match registry.create_solver(year, day, input) {
        Ok(solver) => solver,
        Err(e) => return SolverResult::failed(year, day, part, e.into()),
    };
    let parse_duration = Some(solver.parse_duration());

    match solver.solve(part) {
        Ok(solved) => SolverResult {
            year,
            day,
            part,
            solve_duration: solved.duration(),
            answer: Ok(solved.answer),
            parse_duration,
        },
        Err(e) => SolverResult {
            parse_duration,
            ..SolverResult::failed(year, day, part, SolverError::from(e).into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::{AocParser, ParseError, SolveError, Solver, SolverRegistryBuilder};
    use std::fs;
    use tempfile::TempDir;

    /// Sleeps for the number of milliseconds given as input, then echoes it
    struct Sleepy;

    impl AocParser for Sleepy {
        type SharedData<'a> = u64;

        fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
            input
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidFormat(format!("not a duration: '{}'", input)))
        }
    }

    impl Solver for Sleepy {
        const PARTS: u8 = 2;

        fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
            match part {
                1 => {
                    thread::sleep(Duration::from_millis(*shared));
                    Ok(shared.to_string())
                }
                _ => Err(SolveError::no_solution("nothing to find")),
            }
        }
    }

    fn setup(inputs: &[(u8, &str)], selection: Selection, timeout: Option<Duration>) -> (TempDir, Executor) {
        let temp = TempDir::new().unwrap();
        let mut builder = SolverRegistryBuilder::new();
        for &(day, content) in inputs {
            builder = builder.register_solver::<Sleepy>(YEAR, day, "Sleepy").unwrap();
            let dir = temp.path().join(format!("day{:02}", day));
            fs::create_dir_all(&dir).unwrap();
            if !content.is_empty() {
                fs::write(dir.join("input.txt"), content).unwrap();
            }
        }
        let config = Config {
            selection,
            part_filter: None,
            tags: Vec::new(),
            input_dir: temp.path().to_path_buf(),
            thread_count: 2,
            parallelize_by: ParallelizeBy::Day,
            timeout,
            benchmark: false,
            stacktrace: false,
            quiet: true,
        };
        let executor = Executor::new(builder.build(), &config).unwrap();
        (temp, executor)
    }

    fn run(executor: &Executor) -> Vec<SolverResult> {
        let (tx, rx) = mpsc::channel();
        executor.execute(tx).unwrap();
        let mut results: Vec<_> = rx.into_iter().collect();
        results.sort_by_key(|r| (r.day, r.part));
        results
    }

    #[test]
    fn test_selection() {
        let (_temp, executor) = setup(&[(3, "1"), (9, "1")], Selection::All, None);
        assert_eq!(executor.collect_work_items().len(), 2);

        let (_temp, executor) = setup(&[(3, "1"), (9, "1")], Selection::Latest, None);
        let items = executor.collect_work_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].day, 9);
        assert_eq!(items[0].parts, 1..=2);

        let (_temp, executor) = setup(&[(3, "1")], Selection::Day(4), None);
        assert!(executor.collect_work_items().is_empty());
    }

    #[test]
    fn test_part_filter() {
        let (_temp, mut executor) = setup(&[(3, "1")], Selection::Day(3), None);
        executor.sync_executor_config.part_filter = Some(2);
        assert_eq!(executor.collect_work_items()[0].parts, 2..=2);
        executor.sync_executor_config.part_filter = Some(3);
        assert!(executor.collect_work_items().is_empty());
    }

    #[test]
    fn test_answers_and_failures() {
        let (_temp, executor) = setup(&[(3, "5"), (4, "oops")], Selection::All, Some(Duration::from_secs(5)));
        let results = run(&executor);
        assert_eq!(results.len(), 4);

        assert_eq!(results[0].answer.as_deref().unwrap(), "5");
        assert!(results[0].parse_duration.is_some());
        assert!(matches!(
            results[1].answer,
            Err(PartError::Solver(SolverError::SolveError(SolveError::NoSolution(_))))
        ));
        assert!(matches!(
            results[2].answer,
            Err(PartError::Solver(SolverError::ParseError(_)))
        ));
        assert!(results[2].parse_duration.is_none());
    }

    #[test]
    fn test_missing_input_reported_per_part() {
        let (_temp, executor) = setup(&[(7, "")], Selection::Day(7), None);
        let results = run(&executor);
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| matches!(&r.answer, Err(PartError::Input(e)) if matches!(**e, InputError::Missing { day: 7, .. }))));
    }

    #[test]
    fn test_timeout_is_distinct() {
        let (_temp, executor) = setup(&[(5, "2000")], Selection::Day(5), Some(Duration::from_millis(50)));
        let results = run(&executor);
        let timed_out = results[0].answer.as_ref().unwrap_err();
        assert!(timed_out.is_timeout());
        assert!(matches!(timed_out, PartError::Solver(SolverError::Timeout(d)) if *d == Duration::from_millis(50)));
        assert!(!results[1].answer.as_ref().unwrap_err().is_timeout());
    }

    #[test]
    fn test_part_parallel_keeps_order() {
        let (_temp, mut executor) = setup(&[(1, "20"), (2, "1")], Selection::All, None);
        executor.sync_executor_config.parallelize_by = ParallelizeBy::Part;
        let (tx, rx) = mpsc::channel();
        executor.execute(tx).unwrap();
        let keys: Vec<_> = rx.into_iter().map(|r| (r.day, r.part)).collect();
        let day1: Vec<_> = keys.iter().filter(|k| k.0 == 1).collect();
        assert_eq!(day1, vec![&(1, 1), &(1, 2)]);
        assert_eq!(keys.len(), 4);
    }
}
