use anyhow::anyhow;
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::grid::{Grid, Pos};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 8, title = "Treetop Tree House", tags = ["grid"])]
pub struct TreetopTreeHouse;

const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Whether the tree at `pos` can be seen from outside the grid along any row or column
pub fn is_visible(trees: &Grid<u8>, pos: Pos) -> bool {
    let height = trees[pos];
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| trees.ray(pos, dr, dc).all(|&other| other < height))
}

/// Product of viewing distances in the four directions
///
/// A view stops at the edge or at the first tree at least as tall, which is itself counted.
pub fn scenic_score(trees: &Grid<u8>, pos: Pos) -> usize {
    let height = trees[pos];
    DIRECTIONS
        .iter()
        .map(|&(dr, dc)| {
            let mut distance = 0;
            for &other in trees.ray(pos, dr, dc) {
                distance += 1;
                if other >= height {
                    break;
                }
            }
            distance
        })
        .product()
}

impl AocParser for TreetopTreeHouse {
    type SharedData<'a> = Grid<u8>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Grid::parse(input, |pos, c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| anyhow!("tree height '{}' at row {} is not a digit", c, pos.row + 1))
        })
        .map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for TreetopTreeHouse {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let trees: &Grid<u8> = shared;
        let visible = trees.positions().filter(|&p| is_visible(trees, p)).count();
        Ok(visible.to_string())
    }
}

impl PartSolver<2> for TreetopTreeHouse {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let trees: &Grid<u8> = shared;
        trees
            .positions()
            .map(|p| scenic_score(trees, p))
            .max()
            .map(|s| s.to_string())
            .ok_or_else(|| SolveError::no_solution("no trees"))
    }
}
