use std::ops::{Add, Index};

use anyhow::Context;
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rayon::prelude::*;
use regex::Regex;

use crate::utils::chunks::{parse_lines, parse_num};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 19, title = "Not Enough Minerals", tags = ["search", "branch-and-bound", "parallel"])]
pub struct NotEnoughMinerals;

const ORE: usize = 0;
const CLAY: usize = 1;
const OBSIDIAN: usize = 2;
const GEODE: usize = 3;

const QUALITY_MINUTES: u32 = 24;
const LONG_MINUTES: u32 = 32;
const SURVIVING_BLUEPRINTS: usize = 3;

/// Amount of each mineral: ore, clay, obsidian, geode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resources([u32; 4]);

impl Resources {
    fn unit(kind: usize) -> Self {
        let mut r = Self::default();
        r.0[kind] = 1;
        r
    }

    fn checked_sub(self, other: Self) -> Option<Self> {
        let mut out = self;
        for (a, b) in out.0.iter_mut().zip(other.0) {
            *a = a.checked_sub(b)?;
        }
        Some(out)
    }

    fn scale(self, factor: u32) -> Self {
        Self(self.0.map(|v| v * factor))
    }
}

impl Add for Resources {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let mut out = self;
        for (a, b) in out.0.iter_mut().zip(other.0) {
            *a += b;
        }
        out
    }
}

impl Index<usize> for Resources {
    type Output = u32;

    fn index(&self, kind: usize) -> &u32 {
        &self.0[kind]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub id: u32,
    /// Cost of a robot collecting each mineral
    pub costs: [Resources; 4],
    /// Most of each mineral any single robot needs
    max_spend: [u32; 4],
}

impl Blueprint {
    pub fn new(id: u32, costs: [Resources; 4]) -> Self {
        let max_spend = std::array::from_fn(|kind| costs.iter().map(|c| c[kind]).max().unwrap_or(0));
        Self {
            id,
            costs,
            max_spend,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    stock: Resources,
    robots: Resources,
    minutes_left: u32,
}

impl State {
    /// Minutes to wait before a robot of `kind` is affordable, if it ever is
    fn wait_for(&self, cost: Resources) -> Option<u32> {
        let mut wait = 0;
        for kind in 0..4 {
            let missing = cost[kind].saturating_sub(self.stock[kind]);
            if missing > 0 {
                if self.robots[kind] == 0 {
                    return None;
                }
                wait = wait.max(missing.div_ceil(self.robots[kind]));
            }
        }
        Some(wait)
    }

    /// Geodes collected if a geode robot could be built every remaining minute
    fn optimistic_geodes(&self) -> u32 {
        let t = self.minutes_left;
        self.stock[GEODE] + self.robots[GEODE] * t + t * t.saturating_sub(1) / 2
    }
}

/// Most geodes `blueprint` can open in `minutes`
///
/// Each branch picks the next robot to build and skips ahead to when it is affordable.
pub fn max_geodes(blueprint: &Blueprint, minutes: u32) -> u32 {
    let start = State {
        stock: Resources::default(),
        robots: Resources::unit(ORE),
        minutes_left: minutes,
    };
    let mut best = 0;
    search(blueprint, start, &mut best);
    best
}

fn search(blueprint: &Blueprint, state: State, best: &mut u32) {
    let idle = state.stock[GEODE] + state.robots[GEODE] * state.minutes_left;
    *best = (*best).max(idle);
    if state.optimistic_geodes() <= *best {
        return;
    }

    let geode_now = state.wait_for(blueprint.costs[GEODE]) == Some(0);
    for kind in [GEODE, OBSIDIAN, CLAY, ORE] {
        if geode_now && kind != GEODE {
            break;
        }
        // Enough of this mineral is guaranteed for every remaining minute already.
        if kind != GEODE {
            let t = state.minutes_left;
            if state.robots[kind] * t + state.stock[kind] >= t * blueprint.max_spend[kind] {
                continue;
            }
        }
        let Some(wait) = state.wait_for(blueprint.costs[kind]) else {
            continue;
        };
        // Waiting plus one minute to build must leave time for the robot to produce.
        if wait + 1 >= state.minutes_left {
            continue;
        }
        let elapsed = wait + 1;
        let Some(stock) = (state.stock + state.robots.scale(elapsed)).checked_sub(blueprint.costs[kind]) else {
            continue;
        };
        let next = State {
            stock,
            robots: state.robots + Resources::unit(kind),
            minutes_left: state.minutes_left - elapsed,
        };
        search(blueprint, next, best);
    }
}

fn parse_blueprint(pattern: &Regex, line: &str) -> anyhow::Result<Blueprint> {
    let caps = pattern
        .captures(line)
        .with_context(|| format!("expected a blueprint, got '{}'", line))?;
    let n = |i: usize| parse_num::<u32>(&caps[i], "cost");
    let costs = [
        Resources([n(2)?, 0, 0, 0]),
        Resources([n(3)?, 0, 0, 0]),
        Resources([n(4)?, n(5)?, 0, 0]),
        Resources([n(6)?, 0, n(7)?, 0]),
    ];
    Ok(Blueprint::new(parse_num(&caps[1], "blueprint id")?, costs))
}

impl AocParser for NotEnoughMinerals {
    type SharedData<'a> = Vec<Blueprint>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let pattern = Regex::new(
            r"Blueprint (\d+):\s+Each ore robot costs (\d+) ore\.\s+Each clay robot costs (\d+) ore\.\s+Each obsidian robot costs (\d+) ore and (\d+) clay\.\s+Each geode robot costs (\d+) ore and (\d+) obsidian\.",
        )
        .map_err(|e| ParseError::Other(e.to_string()))?;
        parse_lines(input, |line| parse_blueprint(&pattern, line))
    }
}

impl PartSolver<1> for NotEnoughMinerals {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let quality: u32 = shared
            .par_iter()
            .map(|bp| bp.id * max_geodes(bp, QUALITY_MINUTES))
            .sum();
        Ok(quality.to_string())
    }
}

impl PartSolver<2> for NotEnoughMinerals {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let product: u64 = shared
            .par_iter()
            .take(SURVIVING_BLUEPRINTS)
            .map(|bp| max_geodes(bp, LONG_MINUTES) as u64)
            .product();
        Ok(product.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::Solver;

    const EXAMPLE: &str = include_str!("../../testdata/day19.txt");

    #[test]
    fn test_parse() {
        let blueprints = NotEnoughMinerals::parse(EXAMPLE).unwrap();
        assert_eq!(blueprints.len(), 2);
        assert_eq!(blueprints[0].costs[OBSIDIAN], Resources([3, 14, 0, 0]));
        assert_eq!(blueprints[1].max_spend, [3, 8, 12, 0]);
    }

    #[test]
    fn test_geodes_in_24_minutes() {
        let blueprints = NotEnoughMinerals::parse(EXAMPLE).unwrap();
        assert_eq!(max_geodes(&blueprints[0], 24), 9);
        assert_eq!(max_geodes(&blueprints[1], 24), 12);
    }

    #[test]
    fn test_quality_levels() {
        let mut blueprints = NotEnoughMinerals::parse(EXAMPLE).unwrap();
        assert_eq!(NotEnoughMinerals::solve_part(&mut blueprints, 1).unwrap(), "33");
    }

    #[test]
    fn test_geodes_in_32_minutes() {
        let mut blueprints = NotEnoughMinerals::parse(EXAMPLE).unwrap();
        assert_eq!(max_geodes(&blueprints[0], 32), 56);
        assert_eq!(max_geodes(&blueprints[1], 32), 62);
        assert_eq!(NotEnoughMinerals::solve_part(&mut blueprints, 2).unwrap(), "3472");
    }

    #[test]
    fn test_wait_for() {
        let state = State {
            stock: Resources([1, 0, 0, 0]),
            robots: Resources([2, 0, 0, 0]),
            minutes_left: 10,
        };
        assert_eq!(state.wait_for(Resources([4, 0, 0, 0])), Some(2));
        assert_eq!(state.wait_for(Resources([1, 0, 0, 0])), Some(0));
        assert_eq!(state.wait_for(Resources([1, 3, 0, 0])), None);
    }

    #[test]
    fn test_malformed_blueprint_rejected() {
        assert!(NotEnoughMinerals::parse("Blueprint 1: Each ore robot costs 4 ore.\n").is_err());
    }
}
