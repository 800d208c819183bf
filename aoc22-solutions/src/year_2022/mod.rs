//! Solutions for the 2022 event
//!
//! Days whose puzzles reduce to a single pass over the input (1-4 and 6) are
//! not part of this catalog.

pub mod day05;
pub mod day07;
pub mod day08;
pub mod day09;
pub mod day10;
pub mod day11;
pub mod day12;
pub mod day13;
pub mod day14;
pub mod day15;
pub mod day16;
pub mod day17;
pub mod day18;
pub mod day19;
pub mod day20;
pub mod day21;
pub mod day22;
