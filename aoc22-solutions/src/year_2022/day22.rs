use anyhow::{anyhow, bail, ensure};
use aoc22_solver::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 1)]
#[aoc(year = 2022, day = 22, title = "Monkey Map", tags = ["grid", "simulation"])]
pub struct MonkeyMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Void,
    Open,
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward(usize),
    Left,
    Right,
}

/// Facing values double as the password component: right, down, left, up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Facing {
    fn turn_right(self) -> Self {
        match self {
            Facing::Right => Facing::Down,
            Facing::Down => Facing::Left,
            Facing::Left => Facing::Up,
            Facing::Up => Facing::Right,
        }
    }

    fn turn_left(self) -> Self {
        self.turn_right().turn_right().turn_right()
    }
}

/// Ragged board; rows may be shorter than the widest one
#[derive(Debug, Clone)]
pub struct Board {
    rows: Vec<Vec<Tile>>,
    /// First and last non-void column of each row
    row_span: Vec<(usize, usize)>,
    /// First and last non-void row of each column
    col_span: Vec<Option<(usize, usize)>>,
}

impl Board {
    fn new(rows: Vec<Vec<Tile>>) -> anyhow::Result<Self> {
        ensure!(!rows.is_empty(), "empty board");
        let row_span = rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let first = row.iter().position(|&t| t != Tile::Void);
                let last = row.iter().rposition(|&t| t != Tile::Void);
                first
                    .zip(last)
                    .ok_or_else(|| anyhow!("board row {} has no tiles", r + 1))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let col_span = (0..width)
            .map(|c| {
                let has_tile = |r: &usize| rows[*r].get(c).is_some_and(|&t| t != Tile::Void);
                let first = (0..rows.len()).find(has_tile);
                let last = (0..rows.len()).rev().find(has_tile);
                first.zip(last)
            })
            .collect();

        Ok(Self {
            rows,
            row_span,
            col_span,
        })
    }

    fn tile(&self, row: usize, col: usize) -> Tile {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Tile::Void)
    }

    /// Next position one step ahead, wrapping to the far side of the row or column
    fn ahead(&self, row: usize, col: usize, facing: Facing) -> (usize, usize) {
        let (first_col, last_col) = self.row_span[row];
        match facing {
            Facing::Right if col >= last_col => (row, first_col),
            Facing::Right => (row, col + 1),
            Facing::Left if col <= first_col => (row, last_col),
            Facing::Left => (row, col - 1),
            Facing::Down | Facing::Up => {
                let Some((first_row, last_row)) = self.col_span[col] else {
                    return (row, col);
                };
                match facing {
                    Facing::Down if row >= last_row => (first_row, col),
                    Facing::Down => (row + 1, col),
                    _ if row <= first_row => (last_row, col),
                    _ => (row - 1, col),
                }
            }
        }
    }

    /// Follow `path` from the leftmost open tile of the top row, returning the password
    pub fn walk(&self, path: &[Step]) -> Option<usize> {
        let mut row = 0;
        let mut col = self.rows[0].iter().position(|&t| t == Tile::Open)?;
        let mut facing = Facing::Right;

        for step in path {
            match *step {
                Step::Left => facing = facing.turn_left(),
                Step::Right => facing = facing.turn_right(),
                Step::Forward(n) => {
                    for _ in 0..n {
                        let (next_row, next_col) = self.ahead(row, col, facing);
                        if self.tile(next_row, next_col) != Tile::Open {
                            break;
                        }
                        (row, col) = (next_row, next_col);
                    }
                }
            }
        }
        Some(1000 * (row + 1) + 4 * (col + 1) + facing as usize)
    }
}

fn parse_board(text: &str) -> anyhow::Result<Board> {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(r, line)| {
            line.trim_end()
                .chars()
                .map(|c| match c {
                    ' ' => Ok(Tile::Void),
                    '.' => Ok(Tile::Open),
                    '#' => Ok(Tile::Wall),
                    _ => bail!("unexpected '{}' in board row {}", c, r + 1),
                })
                .collect::<anyhow::Result<Vec<_>>>()
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Board::new(rows)
}

fn parse_path(text: &str) -> anyhow::Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut number: Option<usize> = None;
    for c in text.trim().chars() {
        match c {
            '0'..='9' => {
                let digit = c as usize - '0' as usize;
                let n = number.unwrap_or(0);
                number = Some(
                    n.checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                        .ok_or_else(|| anyhow!("step count too large"))?,
                );
            }
            'L' | 'R' => {
                steps.extend(number.take().map(Step::Forward));
                steps.push(if c == 'L' { Step::Left } else { Step::Right });
            }
            _ => bail!("unexpected '{}' in path", c),
        }
    }
    steps.extend(number.map(Step::Forward));
    ensure!(!steps.is_empty(), "empty path");
    Ok(steps)
}

impl AocParser for MonkeyMap {
    type SharedData<'a> = (Board, Vec<Step>);

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let (board, path) = input
            .trim_end()
            .rsplit_once("\n\n")
            .ok_or_else(|| ParseError::MissingData("blank line between board and path".into()))?;
        let board = parse_board(board).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        let path = parse_path(path).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        Ok((board, path))
    }
}

impl PartSolver<1> for MonkeyMap {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let (board, path) = shared;
        board
            .walk(path)
            .map(|password| password.to_string())
            .ok_or_else(|| SolveError::no_solution("top row has no open tile"))
    }
}
