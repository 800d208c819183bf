//! Output formatting for solver results

use crate::executor::SolverResult;
use chrono::TimeDelta;
use std::collections::BTreeMap;
use std::error::Error;

/// What to print besides the answers
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub quiet: bool,
    pub benchmark: bool,
    pub stacktrace: bool,
}

/// Output formatter for solver results
pub struct OutputFormatter {
    options: OutputOptions,
    titles: BTreeMap<u8, &'static str>,
    current_day: Option<u8>,
    start_time: std::time::Instant,
}

impl OutputFormatter {
    /// Create a new output formatter; `titles` names each day in its header
    pub fn new(options: OutputOptions, titles: BTreeMap<u8, &'static str>) -> Self {
        Self {
            options,
            titles,
            current_day: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Format and print a single result
    pub fn print_result(&mut self, result: &SolverResult) {
        if self.options.quiet {
            self.print_quiet(result);
        } else {
            self.print_full(result);
        }
    }

    /// Print in quiet mode (just the answer)
    fn print_quiet(&self, result: &SolverResult) {
        match &result.answer {
            Ok(answer) => println!("{}", answer),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    /// Print a day header before its first part, then one bullet per part
    fn print_full(&mut self, result: &SolverResult) {
        if self.current_day != Some(result.day) {
            if self.current_day.is_some() {
                println!();
            }
            self.current_day = Some(result.day);
            match self.titles.get(&result.day) {
                Some(title) => println!("Day {}: {}", result.day, title),
                None => println!("Day {}", result.day),
            }
        }

        let bullet = part_bullet(result.part);
        match &result.answer {
            Ok(answer) => {
                let timing = if self.options.benchmark {
                    format_timing(result)
                } else {
                    String::new()
                };
                // Multi-line answers (the CRT picture) start on their own line
                if answer.contains('\n') {
                    println!("{}{}", bullet, timing.trim_start());
                    for line in answer.lines() {
                        println!("     {}", line);
                    }
                } else {
                    println!("{}{}{}", bullet, answer, timing);
                }
            }
            Err(e) if e.is_timeout() => println!("{}Timeout!", bullet),
            Err(e) => {
                println!("{}Execution failed!", bullet);
                if self.options.stacktrace {
                    for line in error_chain(e) {
                        eprintln!("     {}", line);
                    }
                } else {
                    eprintln!("     {}", e);
                }
            }
        }
    }

    /// Print a summary after all results
    /// Shows both total solve time (sum of durations) and actual elapsed wall-clock time
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.options.quiet || !self.options.benchmark {
            return;
        }

        let total = results.len();
        let successes = results.iter().filter(|r| r.answer.is_ok()).count();
        let timeouts = results
            .iter()
            .filter(|r| r.answer.as_ref().is_err_and(|e| e.is_timeout()))
            .count();
        let failures = total - successes - timeouts;

        let total_parse_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .filter_map(|r| r.parse_duration)
            .sum();
        let total_solve_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .map(|r| r.solve_duration)
            .sum();
        let total_compute_time = total_parse_time + total_solve_time;
        let elapsed_time = self.start_time.elapsed();

        println!();
        println!("--- Summary ---");
        println!(
            "Parts: {} solved, {} failed, {} timed out",
            successes, failures, timeouts
        );
        println!("Total parse time: {}", format_duration(total_parse_time));
        println!("Total solve time: {}", format_duration(total_solve_time));
        println!(
            "Elapsed wall-clock time: {}",
            format_std_duration(elapsed_time)
        );
        if !elapsed_time.is_zero() {
            let total_compute_secs =
                total_compute_time.num_microseconds().unwrap_or(0) as f64 / 1_000_000.0;
            let speedup = total_compute_secs / elapsed_time.as_secs_f64();
            println!("Speedup factor: {:.2}x", speedup);
        }
    }
}

/// One star for part 1, two for part 2
fn part_bullet(part: u8) -> &'static str {
    match part {
        1 => "  *  ",
        _ => "  ** ",
    }
}

fn format_timing(result: &SolverResult) -> String {
    let parse_timing = result
        .parse_duration
        .map(|d| format!("parse: {}, ", format_duration(d)))
        .unwrap_or_default();
    format!(
        " ({}solve: {})",
        parse_timing,
        format_duration(result.solve_duration)
    )
}

/// Display of `err` followed by every source below it
fn error_chain(err: &dyn Error) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

/// Format a std::time::Duration for display (used for wall-clock time)
fn format_std_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputError, PartError};
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::microseconds(999)), "999µs");
        assert_eq!(format_duration(TimeDelta::microseconds(1500)), "1.50ms");
        assert_eq!(format_duration(TimeDelta::milliseconds(2500)), "2.50s");
        assert_eq!(format_duration(TimeDelta::microseconds(-20)), "-20µs");
    }

    #[test]
    fn test_format_std_duration() {
        assert_eq!(format_std_duration(std::time::Duration::from_micros(12)), "12µs");
        assert_eq!(format_std_duration(std::time::Duration::from_millis(3)), "3.00ms");
    }

    #[test]
    fn test_part_bullets() {
        assert_eq!(part_bullet(1), "  *  ");
        assert_eq!(part_bullet(2), "  ** ");
    }

    #[test]
    fn test_error_chain_follows_sources() {
        let read = InputError::Read {
            day: 4,
            path: PathBuf::from("inputs/day04/input.txt"),
            source: std::io::Error::other("disk on fire"),
        };
        let err = PartError::Input(Arc::new(read));
        let chain = error_chain(&err);
        assert_eq!(chain.len(), 2);
        assert!(chain[0].starts_with("Failed to read input for day 4"));
        assert_eq!(chain[1], "caused by: disk on fire");
    }

    #[test]
    fn test_timing_suffix() {
        let result = SolverResult {
            year: 2022,
            day: 1,
            part: 1,
            answer: Ok("42".to_string()),
            parse_duration: Some(TimeDelta::microseconds(10)),
            solve_duration: TimeDelta::microseconds(1500),
        };
        assert_eq!(format_timing(&result), " (parse: 10µs, solve: 1.50ms)");
    }
}
