use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, bail, ensure};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use tracing::debug;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 17, title = "Pyroclastic Flow", tags = ["simulation", "cycle-detection"])]
pub struct PyroclasticFlow;

const CHAMBER_WIDTH: usize = 7;
const SPAWN_LEFT: usize = 2;
const SPAWN_GAP: usize = 3;
const SHORT_RUN: u64 = 2022;
const LONG_RUN: u64 = 1_000_000_000_000;

/// Cells of the five rocks, `(x, y)` with `y` growing upwards
const ROCK_CELLS: [&[(usize, usize)]; 5] = [
    &[(0, 0), (1, 0), (2, 0), (3, 0)],
    &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
    &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    &[(0, 0), (0, 1), (0, 2), (0, 3)],
    &[(0, 0), (1, 0), (0, 1), (1, 1)],
];

/// A rock as one bitmask per row, bottom row first; bit `x` is column `x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<u8>,
}

impl Shape {
    /// Build a shape from its cells; they must be distinct and touch both the left and bottom edge.
    pub fn new(cells: &[(usize, usize)]) -> anyhow::Result<Self> {
        ensure!(!cells.is_empty(), "a rock needs at least one cell");
        let distinct: HashSet<_> = cells.iter().collect();
        ensure!(distinct.len() == cells.len(), "rock has duplicate cells");
        ensure!(cells.iter().any(|&(x, _)| x == 0), "rock is not anchored at x = 0");
        ensure!(cells.iter().any(|&(_, y)| y == 0), "rock is not anchored at y = 0");

        let height = cells.iter().map(|&(_, y)| y).max().unwrap_or(0) + 1;
        let mut rows = vec![0u8; height];
        for &(x, y) in cells {
            ensure!(x + SPAWN_LEFT < CHAMBER_WIDTH, "rock is too wide for the chamber");
            rows[y] |= 1 << x;
        }
        Ok(Self { rows })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jet {
    Left,
    Right,
}

impl Jet {
    /// The row pushed one column over, or `None` when it would hit a wall
    fn push(self, row: u8) -> Option<u8> {
        match self {
            Jet::Left => (row & 1 == 0).then_some(row >> 1),
            Jet::Right => (row & (1 << (CHAMBER_WIDTH - 1)) == 0).then_some(row << 1),
        }
    }

    fn push_rock(self, rock: &[u8]) -> Option<Vec<u8>> {
        rock.iter().map(|&row| self.push(row)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct SharedData {
    shapes: Vec<Shape>,
    jets: Vec<Jet>,
}

/// Rows above the floor, each a bitmask of settled cells
struct Chamber<'a> {
    shapes: &'a [Shape],
    jets: &'a [Jet],
    rows: Vec<u8>,
    next_shape: usize,
    next_jet: usize,
}

impl<'a> Chamber<'a> {
    fn new(data: &'a SharedData) -> Self {
        Self {
            shapes: &data.shapes,
            jets: &data.jets,
            rows: Vec::new(),
            next_shape: 0,
            next_jet: 0,
        }
    }

    fn height(&self) -> usize {
        self.rows.len()
    }

    fn collides(&self, rock: &[u8], bottom: usize) -> bool {
        rock.iter()
            .enumerate()
            .any(|(dy, &mask)| self.rows.get(bottom + dy).is_some_and(|&row| row & mask != 0))
    }

    fn drop_rock(&mut self) {
        let shapes = self.shapes;
        let shape = &shapes[self.next_shape];
        self.next_shape = (self.next_shape + 1) % self.shapes.len();

        let mut rock: Vec<u8> = shape.rows.iter().map(|&row| row << SPAWN_LEFT).collect();
        let mut bottom = self.height() + SPAWN_GAP;
        loop {
            let jet = self.jets[self.next_jet];
            self.next_jet = (self.next_jet + 1) % self.jets.len();
            if let Some(pushed) = jet.push_rock(&rock) {
                if !self.collides(&pushed, bottom) {
                    rock = pushed;
                }
            }
            if bottom == 0 || self.collides(&rock, bottom - 1) {
                break;
            }
            bottom -= 1;
        }

        for (dy, mask) in rock.into_iter().enumerate() {
            let y = bottom + dy;
            if y == self.rows.len() {
                self.rows.push(0);
            }
            self.rows[y] |= mask;
        }
    }

    /// Depth of the highest settled cell in each column, relative to the top
    fn profile(&self) -> [usize; CHAMBER_WIDTH] {
        std::array::from_fn(|x| {
            self.rows
                .iter()
                .rev()
                .position(|&row| row & (1 << x) != 0)
                .unwrap_or(self.rows.len())
        })
    }
}

/// Tower height after `rocks` rocks have settled
///
/// Once the chamber returns to a state seen before, whole repeats are skipped arithmetically.
pub fn tower_height(data: &SharedData, rocks: u64) -> u64 {
    let mut chamber = Chamber::new(data);
    let mut seen: HashMap<(usize, usize, [usize; CHAMBER_WIDTH]), (u64, u64)> = HashMap::new();
    let mut skipped_height = 0;
    let mut dropped = 0;

    while dropped < rocks {
        chamber.drop_rock();
        dropped += 1;

        if skipped_height > 0 {
            continue;
        }
        let key = (chamber.next_shape, chamber.next_jet, chamber.profile());
        let height = chamber.height() as u64;
        if let Some(&(prev_dropped, prev_height)) = seen.get(&key) {
            let period = dropped - prev_dropped;
            let growth = height - prev_height;
            let repeats = (rocks - dropped) / period;
            debug!(period, growth, repeats, "rock pattern repeats");
            skipped_height = repeats * growth;
            dropped += repeats * period;
            if skipped_height == 0 {
                // too few rocks left for a whole repeat
                seen.clear();
            }
        } else {
            seen.insert(key, (dropped, height));
        }
    }
    chamber.height() as u64 + skipped_height
}

fn parse_jets(input: &str) -> anyhow::Result<Vec<Jet>> {
    let jets = input
        .trim()
        .chars()
        .map(|c| match c {
            '<' => Ok(Jet::Left),
            '>' => Ok(Jet::Right),
            _ => bail!("unexpected jet '{}'", c),
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if jets.is_empty() {
        return Err(anyhow!("no jets"));
    }
    Ok(jets)
}

impl AocParser for PyroclasticFlow {
    type SharedData<'a> = SharedData;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let shapes = ROCK_CELLS
            .iter()
            .map(|cells| Shape::new(cells))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| ParseError::Other(e.to_string()))?;
        let jets = parse_jets(input).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        Ok(SharedData { shapes, jets })
    }
}

impl PartSolver<1> for PyroclasticFlow {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(tower_height(shared, SHORT_RUN).to_string())
    }
}

impl PartSolver<2> for PyroclasticFlow {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(tower_height(shared, LONG_RUN).to_string())
    }
}
