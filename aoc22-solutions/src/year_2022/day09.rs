use std::collections::HashSet;
use std::num::NonZeroUsize;

use anyhow::{bail, ensure, Context};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::chunks::parse_lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 9, title = "Rope Bridge", tags = ["simulation"])]
pub struct RopeBridge;

const SHORT_ROPE: NonZeroUsize = NonZeroUsize::new(2).unwrap();
const LONG_ROPE: NonZeroUsize = NonZeroUsize::new(10).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub direction: Direction,
    pub count: u32,
}

impl Move {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let (dir, count) = line
            .split_once(' ')
            .with_context(|| format!("expected '<dir> <count>', got '{}'", line))?;
        let direction = match dir {
            "U" => Direction::Up,
            "D" => Direction::Down,
            "L" => Direction::Left,
            "R" => Direction::Right,
            _ => bail!("unknown direction '{}'", dir),
        };
        let count: u32 = count
            .trim()
            .parse()
            .with_context(|| format!("invalid step count '{}'", count))?;
        ensure!(count > 0, "step count must be positive");
        Ok(Self { direction, count })
    }
}

type Knot = (i32, i32);

/// Move `knot` one step towards `leader` unless they already touch
fn follow(knot: Knot, leader: Knot) -> Knot {
    let (dx, dy) = (leader.0 - knot.0, leader.1 - knot.1);
    if dx.abs() <= 1 && dy.abs() <= 1 {
        knot
    } else {
        (knot.0 + dx.signum(), knot.1 + dy.signum())
    }
}

/// Number of distinct positions the last knot occupies while the head follows `moves`
///
/// Positions are recorded after every unit step of the head, starting with the origin.
pub fn simulate(moves: &[Move], knot_count: NonZeroUsize) -> usize {
    let mut knots: Vec<Knot> = vec![(0, 0); knot_count.get()];
    let mut visited = HashSet::from([(0, 0)]);

    for m in moves {
        let (dx, dy) = m.direction.delta();
        for _ in 0..m.count {
            knots[0] = (knots[0].0 + dx, knots[0].1 + dy);
            for i in 1..knots.len() {
                knots[i] = follow(knots[i], knots[i - 1]);
            }
            if let Some(&tail) = knots.last() {
                visited.insert(tail);
            }
        }
    }
    visited.len()
}

impl AocParser for RopeBridge {
    type SharedData<'a> = Vec<Move>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_lines(input, Move::parse)
    }
}

impl PartSolver<1> for RopeBridge {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(simulate(shared, SHORT_ROPE).to_string())
    }
}

impl PartSolver<2> for RopeBridge {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(simulate(shared, LONG_ROPE).to_string())
    }
}
