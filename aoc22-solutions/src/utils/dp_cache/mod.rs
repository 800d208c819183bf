//! Memoised evaluation of values that depend on other values
//!
//! A [`DpProblem`] names the dependencies of each index and how to combine
//! their values; [`DpCache`] resolves the dependency DAG lazily, computing
//! each index once.
//!
//! # Warning: Cycle Behavior
//!
//! **The cache does NOT detect cycles.** A cyclic dependency graph overflows
//! the stack; callers validate acyclicity while parsing.
//!
//! # Example
//!
//! ```rust
//! use aoc22_solutions::utils::dp_cache::{DpCache, DpProblem, VecBackend};
//!
//! struct Fibonacci;
//!
//! impl DpProblem<usize, u64> for Fibonacci {
//!     fn deps(&self, n: &usize) -> Vec<usize> {
//!         if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
//!     }
//!     fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
//!         if *n <= 1 { *n as u64 } else { deps[0] + deps[1] }
//!     }
//! }
//!
//! let cache = DpCache::new(VecBackend::new(), Fibonacci);
//! assert_eq!(cache.get(&10), 55);
//! ```

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, VecBackend};
pub use cache::DpCache;
pub use problem::DpProblem;
