//! Rectangular grids of cells

use anyhow::{anyhow, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Row-major grid where every row has the same width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from text, one row per non-empty line.
    ///
    /// Fails on ragged rows or when `cell` rejects a character.
    pub fn parse<F>(input: &str, mut cell: F) -> anyhow::Result<Self>
    where
        F: FnMut(Pos, char) -> anyhow::Result<T>,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for line in input.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            let row_start = cells.len();
            for (col, c) in line.chars().enumerate() {
                cells.push(cell(Pos::new(height, col), c)?);
            }
            let row_width = cells.len() - row_start;
            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    bail!("row {} has width {}, expected {}", height + 1, row_width, w)
                }
                Some(_) => {}
            }
            height += 1;
        }

        let width = width.ok_or_else(|| anyhow!("empty grid"))?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.flat_index(pos).map(|i| &self.cells[i])
    }

    /// Flat row-major index of `pos`
    pub fn flat_index(&self, pos: Pos) -> Option<usize> {
        (pos.row < self.height && pos.col < self.width).then(|| pos.row * self.width + pos.col)
    }

    pub fn pos(&self, index: usize) -> Pos {
        Pos::new(index / self.width, index % self.width)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Pos::new(row, col)))
    }

    /// In-bounds orthogonal neighbours of `pos`
    pub fn neighbors4(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        let Pos { row, col } = pos;
        [
            row.checked_sub(1).map(|r| Pos::new(r, col)),
            (row + 1 < self.height).then(|| Pos::new(row + 1, col)),
            col.checked_sub(1).map(|c| Pos::new(row, c)),
            (col + 1 < self.width).then(|| Pos::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Cells walking from `pos` towards an edge, excluding `pos` itself
    pub fn ray(&self, pos: Pos, drow: isize, dcol: isize) -> impl Iterator<Item = &T> + '_ {
        let mut current = pos;
        std::iter::from_fn(move || {
            let row = current.row.checked_add_signed(drow)?;
            let col = current.col.checked_add_signed(dcol)?;
            current = Pos::new(row, col);
            self.get(current)
        })
    }
}

impl<T> std::ops::Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &T {
        &self.cells[pos.row * self.width + pos.col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(input: &str) -> anyhow::Result<Grid<u32>> {
        Grid::parse(input, |_, c| c.to_digit(10).ok_or_else(|| anyhow!("not a digit")))
    }

    #[test]
    fn test_parse_and_index() {
        let grid = digits("123\n456\n").unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid[Pos::new(1, 2)], 6);
        assert_eq!(grid.get(Pos::new(2, 0)), None);
        assert_eq!(grid.pos(4), Pos::new(1, 1));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(digits("123\n45\n").is_err());
        assert!(digits("").is_err());
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = digits("12\n34").unwrap();
        let mut n: Vec<_> = grid.neighbors4(Pos::new(0, 0)).collect();
        n.sort();
        assert_eq!(n, vec![Pos::new(0, 1), Pos::new(1, 0)]);
    }

    #[test]
    fn test_ray_stops_at_edge() {
        let grid = digits("123\n456\n789").unwrap();
        let right: Vec<_> = grid.ray(Pos::new(1, 0), 0, 1).copied().collect();
        assert_eq!(right, vec![5, 6]);
        let up: Vec<_> = grid.ray(Pos::new(2, 2), -1, 0).copied().collect();
        assert_eq!(up, vec![6, 3]);
        assert_eq!(grid.ray(Pos::new(0, 0), -1, 0).count(), 0);
    }
}
