use std::collections::VecDeque;

use anyhow::{anyhow, bail, ensure};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::grid::{Grid, Pos};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 12, title = "Hill Climbing Algorithm", tags = ["grid", "bfs"])]
pub struct HillClimbing;

/// Which way a path is walked and therefore which climbs are legal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightRule {
    /// Walking uphill from the start: the next cell may be at most one higher
    Ascend,
    /// Walking back down from the summit: the next cell may be at most one lower
    Descend,
}

impl HeightRule {
    fn allows(self, from: u8, to: u8) -> bool {
        match self {
            HeightRule::Ascend => to <= from + 1,
            HeightRule::Descend => from <= to + 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Heightmap {
    pub heights: Grid<u8>,
    pub start: Pos,
    pub end: Pos,
}

/// Breadth-first search from `from` until `is_goal` accepts a cell
///
/// Every step costs one, so the first goal reached is the nearest. `None` means no goal is reachable.
pub fn shortest_path_length(
    heights: &Grid<u8>,
    from: Pos,
    rule: HeightRule,
    is_goal: impl Fn(Pos) -> bool,
) -> Option<usize> {
    let mut distance: Vec<Option<usize>> = vec![None; heights.len()];
    let mut queue = VecDeque::from([from]);
    distance[heights.flat_index(from)?] = Some(0);

    while let Some(pos) = queue.pop_front() {
        let steps = distance[heights.flat_index(pos)?]?;
        if is_goal(pos) {
            return Some(steps);
        }
        for next in heights.neighbors4(pos) {
            let Some(idx) = heights.flat_index(next) else {
                continue;
            };
            if distance[idx].is_none() && rule.allows(heights[pos], heights[next]) {
                distance[idx] = Some(steps + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

fn parse_heightmap(input: &str) -> anyhow::Result<Heightmap> {
    let mut start = None;
    let mut end = None;
    let heights = Grid::parse(input, |pos, c| {
        let c = match c {
            'S' => {
                ensure!(start.replace(pos).is_none(), "more than one start marker");
                'a'
            }
            'E' => {
                ensure!(end.replace(pos).is_none(), "more than one end marker");
                'z'
            }
            'a'..='z' => c,
            _ => bail!("unexpected elevation '{}'", c),
        };
        Ok(c as u8 - b'a')
    })?;

    Ok(Heightmap {
        heights,
        start: start.ok_or_else(|| anyhow!("missing start marker 'S'"))?,
        end: end.ok_or_else(|| anyhow!("missing end marker 'E'"))?,
    })
}

impl AocParser for HillClimbing {
    type SharedData<'a> = Heightmap;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_heightmap(input).map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for HillClimbing {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let end = shared.end;
        shortest_path_length(&shared.heights, shared.start, HeightRule::Ascend, |p| p == end)
            .map(|steps| steps.to_string())
            .ok_or_else(|| SolveError::no_solution("the summit is unreachable from the start"))
    }
}

impl PartSolver<2> for HillClimbing {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let heights = &shared.heights;
        shortest_path_length(heights, shared.end, HeightRule::Descend, |p| heights[p] == 0)
            .map(|steps| steps.to_string())
            .ok_or_else(|| SolveError::no_solution("no lowest square reaches the summit"))
    }
}
