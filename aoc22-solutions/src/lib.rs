//! Advent of Code 2022 puzzle solutions with automatic registration
//!
//! Each day lives in its own module under [`year_2022`] and registers itself
//! through `#[derive(AutoRegisterSolver)]`; linking this crate is enough for
//! `SolverRegistryBuilder::register_all_plugins` to discover every day.
//! The algorithmic kernels are public so they can be exercised directly with
//! puzzle parameters other than the registered ones.

pub mod utils;

#[cfg(feature = "year-2022")]
pub mod year_2022;
