//! The bordered playfield.
//!
//! The grid is `(width + 2) x (height + 2)` cells stored in one flat row-major
//! buffer. Column 0, column `width + 1` and row `height + 1` are `Wall` for the
//! lifetime of the board, so a placement that leaves the playfield fails the
//! same "is this cell empty" test as one that overlaps locked cells.

use crate::config::ConfigError;
use crate::shape::{Shape, TetrominoType};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Wall,
    Locked(TetrominoType),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds an empty board with `width` x `height` playable cells.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }

        let mut board = Self {
            width,
            height,
            cells: Vec::with_capacity((width + 2) * (height + 2)),
        };
        for y in 0..height + 2 {
            for x in 0..width + 2 {
                let cell = if board.is_border(x, y) {
                    Cell::Wall
                } else {
                    Cell::Empty
                };
                board.cells.push(cell);
            }
        }
        Ok(board)
    }

    /// Playable columns, borders excluded.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Configured height. Rows `0..=height` are playable, `height + 1` is the floor.
    pub fn height(&self) -> usize {
        self.height
    }

    fn stride(&self) -> usize {
        self.width + 2
    }

    fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || x == self.width + 1 || y == self.height + 1
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        if x >= self.stride() || y >= self.height + 2 {
            return None;
        }
        Some(y * self.stride() + x)
    }

    /// Cell at board coordinates, `None` outside the bordered grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Writes a playable cell. Border cells cannot be overwritten.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        if cell == Cell::Wall || x >= self.stride() || y >= self.height + 2 || self.is_border(x, y)
        {
            return false;
        }
        let stride = self.stride();
        self.cells[y * stride + x] = cell;
        true
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        let stride = self.stride();
        &self.cells[y * stride..(y + 1) * stride]
    }

    /// All rows top to bottom, borders included.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.stride())
    }

    // ------------------------------------------------------------------------
    // Collision
    // ------------------------------------------------------------------------

    /// True when every occupied cell of `shape` placed at `anchor` lands on an
    /// `Empty` board cell.
    pub fn fits(&self, shape: &Shape, anchor: Position) -> bool {
        shape.cells().all(|(row, col)| {
            self.get(anchor.x + col as i32, anchor.y + row as i32) == Some(Cell::Empty)
        })
    }

    /// Writes `Locked(kind)` into every cell the placement covers.
    pub fn lock(&mut self, shape: &Shape, anchor: Position, kind: TetrominoType) {
        for (row, col) in shape.cells() {
            if let Some(idx) = self.index(anchor.x + col as i32, anchor.y + row as i32) {
                if self.cells[idx] == Cell::Empty {
                    self.cells[idx] = Cell::Locked(kind);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Line clearing
    // ------------------------------------------------------------------------

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| *cell != Cell::Empty)
    }

    /// Indices of complete rows, ascending. The floor row is never scanned.
    pub fn complete_rows(&self) -> Vec<usize> {
        (0..=self.height).filter(|&y| self.is_row_complete(y)).collect()
    }

    /// Removes the given rows, shifting everything above each one down by one
    /// and opening a fresh empty row at the top.
    ///
    /// `rows` must be ascending: a removal only moves rows above it, so later
    /// (lower) indices stay valid.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        let stride = self.stride();
        for &y in rows {
            self.cells.copy_within(0..y * stride, stride);
            for x in 0..stride {
                let cell = if self.is_border(x, 0) {
                    Cell::Wall
                } else {
                    Cell::Empty
                };
                self.cells[x] = cell;
            }
        }
    }

    /// Finds and removes complete rows, returning how many were removed.
    pub fn clear_lines(&mut self) -> usize {
        let rows = self.complete_rows();
        self.remove_rows(&rows);
        rows.len()
    }

    /// Locked cells in the playable part of row `y`.
    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.row(y)
            .iter()
            .filter(|cell| matches!(cell, Cell::Locked(_)))
            .count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Locked(_)))
            .count()
    }
}
