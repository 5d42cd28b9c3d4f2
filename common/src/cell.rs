use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A board coordinate. Ordering is row-major, which is what makes
/// `BTreeSet<Cell>` iterate lowest row first, then lowest column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The size of a board. Shared by the minefield (ground truth) and the
/// knowledge base (the agent's view), which must agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl Dimensions {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidConfiguration {
                reason: format!("board must have positive dimensions, got {height}x{width}"),
            });
        }
        Ok(Dimensions { height, width })
    }

    /// Total number of cells on the board.
    pub fn capacity(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Fails with `OutOfBounds` unless `cell` lies on the board.
    pub fn check(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Every cell on the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Cell { row, col }))
    }

    /// All valid cells at Chebyshev distance 1 from `cell`.
    /// Edges and corners yield fewer than eight neighbours.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + use<> {
        let height = self.height as isize;
        let width = self.width as isize;

        (-1..=1).flat_map(move |dr| {
            (-1..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }

                let r = cell.row as isize + dr;
                let c = cell.col as isize + dc;

                if r >= 0 && r < height && c >= 0 && c < width {
                    Some(Cell {
                        row: r as usize,
                        col: c as usize,
                    })
                } else {
                    None
                }
            })
        })
    }
}
