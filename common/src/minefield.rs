use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Dimensions};
use crate::error::{Error, Result};

/// The ground truth of a game: where the mines are, and which of them the
/// player has flagged so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minefield {
    dims: Dimensions,
    mines: BTreeSet<Cell>,
    /// Cells the player has flagged. Only consulted by `has_won`.
    found_mines: BTreeSet<Cell>,
}

impl Minefield {
    /// Places `mine_count` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(dims: Dimensions, mine_count: usize, rng: &mut R) -> Result<Self> {
        if mine_count > dims.capacity() {
            return Err(Error::InvalidConfiguration {
                reason: format!(
                    "{mine_count} mines do not fit on a {}x{} board",
                    dims.height, dims.width
                ),
            });
        }

        let all: Vec<Cell> = dims.cells().collect();
        let mines = all.choose_multiple(rng, mine_count).copied().collect();

        Ok(Minefield {
            dims,
            mines,
            found_mines: BTreeSet::new(),
        })
    }

    /// Builds a minefield from an explicit mine layout.
    pub fn with_mines(dims: Dimensions, mines: impl IntoIterator<Item = Cell>) -> Result<Self> {
        let mut set = BTreeSet::new();
        for cell in mines {
            dims.check(cell)?;
            set.insert(cell);
        }

        Ok(Minefield {
            dims,
            mines: set,
            found_mines: BTreeSet::new(),
        })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn is_mine(&self, cell: Cell) -> Result<bool> {
        self.dims.check(cell)?;
        Ok(self.mines.contains(&cell))
    }

    /// Number of mines among the cells bordering `cell`, not counting `cell` itself.
    pub fn nearby_mine_count(&self, cell: Cell) -> Result<usize> {
        self.dims.check(cell)?;
        Ok(self
            .dims
            .neighbors(cell)
            .filter(|n| self.mines.contains(n))
            .count())
    }

    /// Records that the player flagged `cell` as a mine.
    pub fn record_found(&mut self, cell: Cell) -> Result<()> {
        self.dims.check(cell)?;
        self.found_mines.insert(cell);
        Ok(())
    }

    pub fn found_mines(&self) -> &BTreeSet<Cell> {
        &self.found_mines
    }

    /// The game is won once the flags match the mines exactly.
    pub fn has_won(&self) -> bool {
        self.found_mines == self.mines
    }
}

impl fmt::Display for Minefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.dims.width));
        for row in 0..self.dims.height {
            writeln!(f, "{rule}")?;
            for col in 0..self.dims.width {
                if self.mines.contains(&Cell { row, col }) {
                    f.write_str("|X")?;
                } else {
                    f.write_str("| ")?;
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corners() -> Minefield {
        let dims = Dimensions::new(3, 3).unwrap();
        Minefield::with_mines(dims, [Cell::new(0, 0), Cell::new(2, 2)]).unwrap()
    }

    #[test]
    fn test_random_placement_count() {
        let dims = Dimensions::new(16, 30).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let field = Minefield::new(dims, 99, &mut rng).unwrap();
        assert_eq!(field.mine_count(), 99);
    }

    #[test]
    fn test_random_placement_is_seeded() {
        let dims = Dimensions::new(8, 8).unwrap();
        let a = Minefield::new(dims, 10, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = Minefield::new(dims, 10, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.mines, b.mines);
    }

    #[test]
    fn test_full_board() {
        let dims = Dimensions::new(2, 2).unwrap();
        let field = Minefield::new(dims, 4, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(dims.cells().all(|c| field.is_mine(c).unwrap()));
    }

    #[test]
    fn test_too_many_mines() {
        let dims = Dimensions::new(2, 2).unwrap();
        let result = Minefield::new(dims, 5, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_explicit_layout_out_of_bounds() {
        let dims = Dimensions::new(2, 2).unwrap();
        let result = Minefield::with_mines(dims, [Cell::new(2, 0)]);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_nearby_mine_count() {
        let field = corners();

        assert_eq!(field.nearby_mine_count(Cell::new(1, 1)).unwrap(), 2);
        assert_eq!(field.nearby_mine_count(Cell::new(0, 1)).unwrap(), 1);
        assert_eq!(field.nearby_mine_count(Cell::new(0, 2)).unwrap(), 0);
        // A mine does not count itself.
        assert_eq!(field.nearby_mine_count(Cell::new(0, 0)).unwrap(), 0);
    }

    #[test]
    fn test_queries_reject_out_of_bounds() {
        let field = corners();
        assert!(matches!(
            field.is_mine(Cell::new(3, 0)),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            field.nearby_mine_count(Cell::new(0, 3)),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_win_requires_exact_flags() {
        let mut field = corners();
        assert!(!field.has_won());

        field.record_found(Cell::new(0, 0)).unwrap();
        assert!(!field.has_won());

        field.record_found(Cell::new(2, 2)).unwrap();
        assert!(field.has_won());

        // Over-flagging a safe cell loses the exact match.
        field.record_found(Cell::new(1, 1)).unwrap();
        assert!(!field.has_won());
    }

    #[test]
    fn test_render() {
        let rendered = corners().to_string();
        let expected = "\
-------
|X| | |
-------
| | | |
-------
| | |X|
-------
";
        assert_eq!(rendered, expected);
    }
}
