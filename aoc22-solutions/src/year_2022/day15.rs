use std::collections::HashSet;
use std::ops::RangeInclusive;

use anyhow::Context;
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rayon::prelude::*;
use regex::Regex;

use crate::utils::chunks::{parse_lines, parse_num};
use crate::utils::intervals::{clip, merge, width};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 15, title = "Beacon Exclusion Zone", tags = ["intervals", "parallel"])]
pub struct BeaconExclusionZone;

const SCAN_ROW: i64 = 2_000_000;
const SEARCH_BOUND: i64 = 4_000_000;
const TUNING_MULTIPLIER: i64 = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sensor {
    pub x: i64,
    pub y: i64,
    pub beacon: (i64, i64),
    /// Manhattan distance to the nearest beacon
    pub radius: i64,
}

impl Sensor {
    pub fn new(x: i64, y: i64, beacon: (i64, i64)) -> Self {
        let radius = (x - beacon.0).abs() + (y - beacon.1).abs();
        Self { x, y, beacon, radius }
    }

    /// Columns of `row` inside this sensor's diamond
    pub fn coverage(&self, row: i64) -> Option<RangeInclusive<i64>> {
        let half_width = self.radius - (self.y - row).abs();
        (half_width >= 0).then(|| self.x - half_width..=self.x + half_width)
    }
}

fn merged_coverage(sensors: &[Sensor], row: i64) -> Vec<RangeInclusive<i64>> {
    merge(sensors.iter().filter_map(|s| s.coverage(row)).collect())
}

/// Positions in `row` where no beacon can be, excluding known beacons
pub fn count_excluded_in_row(sensors: &[Sensor], row: i64) -> u64 {
    let covered: u64 = merged_coverage(sensors, row).iter().map(width).sum();
    let beacons_in_row = sensors
        .iter()
        .map(|s| s.beacon)
        .filter(|&(_, y)| y == row)
        .collect::<HashSet<_>>()
        .len() as u64;
    covered - beacons_in_row
}

/// Column of the single-column hole between exactly two merged pieces
fn single_hole(ranges: &[RangeInclusive<i64>], bound: &RangeInclusive<i64>) -> Option<i64> {
    let clipped: Vec<_> = ranges.iter().filter_map(|r| clip(r, bound)).collect();
    match clipped.as_slice() {
        [left, right] if *right.start() - *left.end() == 2 => Some(left.end() + 1),
        _ => None,
    }
}

/// Tuning frequency of the distress beacon within `0..=bound`
///
/// The beacon sits in the one row whose coverage splits into two pieces around
/// a single free column. No such row, or more than one, means no answer.
pub fn find_gap(sensors: &[Sensor], bound: i64) -> Option<i64> {
    let columns = 0..=bound;
    let candidates: Vec<(i64, i64)> = (0..=bound)
        .into_par_iter()
        .filter_map(|row| {
            let x = single_hole(&merged_coverage(sensors, row), &columns)?;
            tracing::debug!(x, row, "found uncovered position");
            Some((x, row))
        })
        .collect();
    match candidates.as_slice() {
        &[(x, row)] => Some(x * TUNING_MULTIPLIER + row),
        _ => None,
    }
}

fn parse_sensors(input: &str) -> Result<Vec<Sensor>, ParseError> {
    let pattern = Regex::new(
        r"^Sensor at x=(-?\d+), y=(-?\d+): closest beacon is at x=(-?\d+), y=(-?\d+)$",
    )
    .map_err(|e| ParseError::Other(e.to_string()))?;

    parse_lines(input, |line| {
        let caps = pattern
            .captures(line)
            .with_context(|| format!("expected a sensor report, got '{}'", line))?;
        let coord = |i: usize| parse_num::<i64>(&caps[i], "coordinate");
        Ok(Sensor::new(coord(1)?, coord(2)?, (coord(3)?, coord(4)?)))
    })
}

impl AocParser for BeaconExclusionZone {
    type SharedData<'a> = Vec<Sensor>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_sensors(input)
    }
}

impl PartSolver<1> for BeaconExclusionZone {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_excluded_in_row(shared, SCAN_ROW).to_string())
    }
}

impl PartSolver<2> for BeaconExclusionZone {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        find_gap(shared, SEARCH_BOUND)
            .map(|freq| freq.to_string())
            .ok_or_else(|| SolveError::no_solution("every position in range is covered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = include_str!("../../testdata/day15.txt");

    #[test]
    fn test_parse() {
        let sensors = BeaconExclusionZone::parse(EXAMPLE).unwrap();
        assert_eq!(sensors.len(), 14);
        assert_eq!(sensors[0], Sensor::new(2, 18, (-2, 15)));
        assert_eq!(sensors[0].radius, 7);
    }

    #[test]
    fn test_excluded_in_row() {
        let sensors = BeaconExclusionZone::parse(EXAMPLE).unwrap();
        assert_eq!(count_excluded_in_row(&sensors, 10), 26);
    }

    #[test]
    fn test_find_gap() {
        let sensors = BeaconExclusionZone::parse(EXAMPLE).unwrap();
        assert_eq!(find_gap(&sensors, 20), Some(56000011));
    }

    #[test]
    fn test_coverage_diamond() {
        let sensor = Sensor::new(8, 7, (2, 10));
        assert_eq!(sensor.radius, 9);
        assert_eq!(sensor.coverage(7), Some(-1..=17));
        assert_eq!(sensor.coverage(16), Some(8..=8));
        assert_eq!(sensor.coverage(17), None);
    }

    #[test]
    fn test_single_hole() {
        let bound = 0..=10;
        assert_eq!(single_hole(&[0..=3, 5..=12], &bound), Some(4));
        assert_eq!(single_hole(&[-4..=3, 6..=12], &bound), None);
        assert_eq!(single_hole(&[2..=12], &bound), None);
        assert_eq!(single_hole(&[-5..=9], &bound), None);
        assert_eq!(single_hole(&[-5..=15], &bound), None);
        assert_eq!(single_hole(&[0..=2, 4..=6, 8..=10], &bound), None);
    }

    #[test]
    fn test_open_area_has_no_beacon() {
        // One sensor leaves most of 0..=20 uncovered, so there is no lone hole
        assert_eq!(find_gap(&[Sensor::new(10, 5, (10, 15))], 20), None);
        assert_eq!(find_gap(&[Sensor::new(10, 5, (10, 15))], 0), None);
    }

    #[test]
    fn test_ambiguous_holes_have_no_beacon() {
        // Two sensors side by side leave a one-column hole in several rows
        let sensors = [Sensor::new(2, 5, (2, 10)), Sensor::new(8, 5, (8, 10))];
        assert_eq!(find_gap(&sensors, 10), None);
    }

    #[test]
    fn test_malformed_report_rejected() {
        let err = BeaconExclusionZone::parse("Sensor at x=1, y=2\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{}", err);
    }
}
