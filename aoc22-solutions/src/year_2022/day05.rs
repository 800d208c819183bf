use anyhow::{anyhow, bail, ensure};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

use crate::utils::chunks::{parse_lines, parse_num};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 5, title = "Supply Stacks", tags = ["simulation", "parsing"])]
pub struct SupplyStacks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub count: usize,
    /// 0-based source stack
    pub from: usize,
    /// 0-based target stack
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crane {
    /// Moves crates one at a time
    CrateMover9000,
    /// Moves a whole pile at once, keeping its order
    CrateMover9001,
}

/// Stacks bottom-to-top plus a move list that has been checked against them
#[derive(Debug, Clone)]
pub struct Ship {
    stacks: Vec<Vec<char>>,
    moves: Vec<Move>,
}

impl Ship {
    /// Validate `moves` by replaying heights; a move never takes more crates than its source holds.
    pub fn new(stacks: Vec<Vec<char>>, moves: Vec<Move>) -> anyhow::Result<Self> {
        let mut heights: Vec<usize> = stacks.iter().map(Vec::len).collect();
        for (i, m) in moves.iter().enumerate() {
            ensure!(m.count > 0, "move {}: count must be positive", i + 1);
            ensure!(m.from != m.to, "move {}: source and target are both {}", i + 1, m.from + 1);
            let stack_count = heights.len();
            ensure!(
                m.from < stack_count && m.to < stack_count,
                "move {}: stack out of range (have {})",
                i + 1,
                stack_count
            );
            ensure!(
                heights[m.from] >= m.count,
                "move {}: stack {} holds {} crates, cannot move {}",
                i + 1,
                m.from + 1,
                heights[m.from],
                m.count
            );
            heights[m.from] -= m.count;
            heights[m.to] += m.count;
        }
        Ok(Self { stacks, moves })
    }

    /// Letters of the top crates after running every move with `crane`
    pub fn top_crates(&self, crane: Crane) -> String {
        let mut stacks = self.stacks.clone();
        for m in &self.moves {
            let split_at = stacks[m.from].len() - m.count;
            let mut pile = stacks[m.from].split_off(split_at);
            if crane == Crane::CrateMover9000 {
                pile.reverse();
            }
            stacks[m.to].extend(pile);
        }
        stacks.iter().filter_map(|s| s.last()).collect()
    }
}

fn parse_drawing(drawing: &str) -> anyhow::Result<Vec<Vec<char>>> {
    let mut rows: Vec<&str> = drawing.lines().filter(|l| !l.trim().is_empty()).collect();
    let labels = rows.pop().ok_or_else(|| anyhow!("missing stack drawing"))?;
    let stack_count = labels.split_whitespace().count();
    ensure!(stack_count > 0, "stack label line is empty");

    let mut stacks = vec![Vec::new(); stack_count];
    for (level, row) in rows.iter().rev().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        for (i, stack) in stacks.iter_mut().enumerate() {
            match chars.get(1 + 4 * i) {
                Some(c) if c.is_ascii_alphabetic() => {
                    ensure!(stack.len() == level, "crate '{}' in stack {} is floating", c, i + 1);
                    stack.push(*c)
                }
                Some(' ') | None => {}
                Some(c) => bail!("unexpected '{}' in stack drawing", c),
            }
        }
    }
    Ok(stacks)
}

fn parse_move(line: &str) -> anyhow::Result<Move> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["move", count, "from", from, "to", to] => {
            let from: usize = parse_num(from, "stack")?;
            let to: usize = parse_num(to, "stack")?;
            ensure!(from > 0 && to > 0, "stacks are numbered from 1");
            Ok(Move {
                count: parse_num(count, "count")?,
                from: from - 1,
                to: to - 1,
            })
        }
        _ => bail!("expected 'move N from A to B', got '{}'", line),
    }
}

impl AocParser for SupplyStacks {
    type SharedData<'a> = Ship;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let (drawing, moves) = input
            .split_once("\n\n")
            .ok_or_else(|| ParseError::MissingData("blank line between drawing and moves".into()))?;
        let stacks = parse_drawing(drawing).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        let moves = parse_lines(moves, parse_move)?;
        Ship::new(stacks, moves).map_err(|e| ParseError::InvalidFormat(e.to_string()))
    }
}

impl PartSolver<1> for SupplyStacks {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.top_crates(Crane::CrateMover9000))
    }
}

impl PartSolver<2> for SupplyStacks {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.top_crates(Crane::CrateMover9001))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc22_solver::Solver;

    const EXAMPLE: &str = include_str!("../../testdata/day05.txt");

    #[test]
    fn test_parse_drawing() {
        let ship = SupplyStacks::parse(EXAMPLE).unwrap();
        assert_eq!(ship.stacks, vec![vec!['Z', 'N'], vec!['M', 'C', 'D'], vec!['P']]);
        assert_eq!(ship.moves[0], Move { count: 1, from: 1, to: 0 });
        assert_eq!(ship.moves.len(), 4);
    }

    #[test]
    fn test_one_at_a_time() {
        let mut ship = SupplyStacks::parse(EXAMPLE).unwrap();
        assert_eq!(SupplyStacks::solve_part(&mut ship, 1).unwrap(), "CMZ");
    }

    #[test]
    fn test_whole_pile() {
        let mut ship = SupplyStacks::parse(EXAMPLE).unwrap();
        assert_eq!(SupplyStacks::solve_part(&mut ship, 2).unwrap(), "MCD");
    }

    #[test]
    fn test_overdrawn_stack_rejected() {
        let input = "[A]\n 1   2 \n\nmove 2 from 1 to 2\n";
        let err = SupplyStacks::parse(input).unwrap_err();
        assert!(err.to_string().contains("cannot move 2"), "{}", err);
    }

    #[test]
    fn test_same_source_and_target_rejected() {
        let input = "[A]\n 1   2 \n\nmove 1 from 1 to 1\n";
        assert!(SupplyStacks::parse(input).is_err());
    }

    #[test]
    fn test_malformed_move_rejected() {
        let input = "[A]\n 1   2 \n\nshift 1 from 1 to 2\n";
        let err = SupplyStacks::parse(input).unwrap_err();
        assert!(err.to_string().contains("line 1"), "{}", err);
    }
}
