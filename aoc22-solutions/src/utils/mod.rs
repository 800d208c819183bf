//! Helpers shared between puzzle solutions

pub mod chunks;
pub mod dp_cache;
pub mod grid;
pub mod intervals;
