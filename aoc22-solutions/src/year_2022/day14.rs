use anyhow::{ensure, Context};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use itertools::Itertools;

use crate::utils::chunks::{parse_lines, parse_list};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 14, title = "Regolith Reservoir", tags = ["simulation", "grid"])]
pub struct RegolithReservoir;

const SOURCE: (usize, usize) = (500, 0);

type Path = Vec<(usize, usize)>;

fn parse_path(line: &str) -> anyhow::Result<Path> {
    let points: Path = line
        .split("->")
        .map(|point| {
            let xy = parse_list::<usize>(point)?;
            match xy.as_slice() {
                [x, y] => Ok((*x, *y)),
                _ => anyhow::bail!("expected 'x,y', got '{}'", point.trim()),
            }
        })
        .collect::<anyhow::Result<_>>()?;
    for ((x1, y1), (x2, y2)) in points.iter().tuple_windows() {
        ensure!(
            x1 == x2 || y1 == y2,
            "segment {},{} -> {},{} is diagonal",
            x1,
            y1,
            x2,
            y2
        );
    }
    Ok(points)
}

/// Dense occupancy map wide enough for a sand pile resting on the floor
#[derive(Debug, Clone)]
pub struct Cave {
    min_x: usize,
    width: usize,
    /// Lowest rock row
    pub max_y: usize,
    blocked: Vec<bool>,
}

impl Cave {
    pub fn new(paths: &[Path]) -> anyhow::Result<Self> {
        let max_y = paths
            .iter()
            .flatten()
            .map(|&(_, y)| y)
            .max()
            .context("no rock paths")?;
        let floor = max_y + 2;
        let rock_xs = paths.iter().flatten().map(|&(x, _)| x);
        let min_x = rock_xs.clone().min().unwrap_or(SOURCE.0).min(SOURCE.0.saturating_sub(floor + 1));
        let max_x = rock_xs.max().unwrap_or(SOURCE.0).max(SOURCE.0 + floor + 1);
        let width = max_x - min_x + 1;

        let mut cave = Self {
            min_x,
            width,
            max_y,
            blocked: vec![false; width * (floor + 1)],
        };
        for path in paths {
            if let [(x, y)] = path.as_slice() {
                cave.block(*x, *y);
            }
            for (&(x1, y1), &(x2, y2)) in path.iter().tuple_windows() {
                for x in x1.min(x2)..=x1.max(x2) {
                    for y in y1.min(y2)..=y1.max(y2) {
                        cave.block(x, y);
                    }
                }
            }
        }
        Ok(cave)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + (x - self.min_x)
    }

    fn is_blocked(&self, x: usize, y: usize) -> bool {
        self.blocked[self.index(x, y)]
    }

    fn block(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        self.blocked[idx] = true;
    }

    /// Where a unit of sand dropped from the source comes to rest
    ///
    /// Without a floor, `None` means it falls past the lowest rock.
    fn drop_sand(&self, with_floor: bool) -> Option<(usize, usize)> {
        let (mut x, mut y) = SOURCE;
        loop {
            if y == self.max_y + 1 {
                return with_floor.then_some((x, y));
            }
            let below = y + 1;
            let next = [Some(x), x.checked_sub(1), Some(x + 1)]
                .into_iter()
                .flatten()
                .find(|&nx| !self.is_blocked(nx, below));
            match next {
                Some(nx) => (x, y) = (nx, below),
                None => return Some((x, y)),
            }
        }
    }

    /// Number of sand units that come to rest
    ///
    /// With a floor two rows below the lowest rock, the count includes the unit that blocks the source.
    pub fn fill(&self, with_floor: bool) -> usize {
        let mut cave = self.clone();
        let mut rested = 0;
        while !cave.is_blocked(SOURCE.0, SOURCE.1) {
            match cave.drop_sand(with_floor) {
                Some((x, y)) => {
                    cave.block(x, y);
                    rested += 1;
                }
                None => break,
            }
        }
        rested
    }
}

impl AocParser for RegolithReservoir {
    type SharedData<'a> = Cave;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let paths = parse_lines(input, parse_path)?;
        Cave::new(&paths).map_err(|e| ParseError::MissingData(e.to_string()))
    }
}

impl PartSolver<1> for RegolithReservoir {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.fill(false).to_string())
    }
}

impl PartSolver<2> for RegolithReservoir {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.fill(true).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::Solver;

    const EXAMPLE: &str = include_str!("../../testdata/day14.txt");

    #[test]
    fn test_rock_layout() {
        let cave = RegolithReservoir::parse(EXAMPLE).unwrap();
        assert_eq!(cave.max_y, 9);
        assert!(cave.is_blocked(498, 5));
        assert!(cave.is_blocked(494, 9));
        assert!(!cave.is_blocked(500, 8));
    }

    #[test]
    fn test_sand_into_abyss() {
        let mut cave = RegolithReservoir::parse(EXAMPLE).unwrap();
        assert_eq!(RegolithReservoir::solve_part(&mut cave, 1).unwrap(), "24");
    }

    #[test]
    fn test_sand_on_floor() {
        let mut cave = RegolithReservoir::parse(EXAMPLE).unwrap();
        assert_eq!(RegolithReservoir::solve_part(&mut cave, 2).unwrap(), "93");
    }

    #[test]
    fn test_floor_pile_without_obstacles() {
        // A lone rock far away: the pile is a triangle of height max_y + 2.
        let cave = RegolithReservoir::parse("400,1 -> 400,1\n").unwrap();
        assert_eq!(cave.fill(true), 9);
        assert_eq!(cave.fill(false), 0);
    }

    #[test]
    fn test_diagonal_rejected() {
        let err = RegolithReservoir::parse("498,4 -> 499,5\n").unwrap_err();
        assert!(err.to_string().contains("diagonal"), "{}", err);
        assert!(RegolithReservoir::parse("498 -> 499,5\n").is_err());
    }
}
