use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{Error, Result};

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Two constraints are equal when they cover the same cells with the same
/// count, which is how the knowledge base avoids storing duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Constraint {
    /// Fails with `InvalidConstraint` if `count` exceeds the number of cells.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Result<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(Error::InvalidConstraint {
                count,
                cells: cells.len(),
            });
        }
        Ok(Constraint { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// An empty constraint says nothing and can be dropped.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `Some(cells)` when every cell must be a mine.
    pub fn resolved_mines(&self) -> Option<&BTreeSet<Cell>> {
        (!self.cells.is_empty() && self.count == self.cells.len()).then_some(&self.cells)
    }

    /// `Some(cells)` when no cell can be a mine.
    pub fn resolved_safes(&self) -> Option<&BTreeSet<Cell>> {
        (!self.cells.is_empty() && self.count == 0).then_some(&self.cells)
    }

    /// Removes `cell` once its status is known, decrementing the count for a mine.
    ///
    /// A cell that is not part of the constraint leaves it unchanged. Removing
    /// a mine from a constraint that has no mines left, or a safe cell from one
    /// whose remaining cells are all mines, is a contradiction.
    pub fn without(&self, cell: Cell, is_mine: bool) -> Result<Self> {
        if !self.cells.contains(&cell) {
            return Ok(self.clone());
        }

        let mut cells = self.cells.clone();
        cells.remove(&cell);

        let count = if is_mine {
            self.count.checked_sub(1).ok_or_else(|| {
                Error::inconsistent(format!("{cell} is a mine but {self} has none left"))
            })?
        } else {
            self.count
        };

        if count > cells.len() {
            return Err(Error::inconsistent(format!(
                "{cell} is safe but {self} needs every cell to be a mine"
            )));
        }

        Ok(Constraint { cells, count })
    }

    /// Given `self ⊂ other`, the statement about the cells `other` has and
    /// `self` lacks. Returns `None` unless `self` is a strict, non-empty subset.
    pub fn subtracted_from(&self, other: &Constraint) -> Option<Result<Self>> {
        if self.cells.is_empty()
            || self.cells.len() >= other.cells.len()
            || !self.cells.is_subset(&other.cells)
        {
            return None;
        }

        let cells: BTreeSet<Cell> = other.cells.difference(&self.cells).copied().collect();
        let derived = match other.count.checked_sub(self.count) {
            Some(count) if count <= cells.len() => Ok(Constraint { cells, count }),
            _ => Err(Error::inconsistent(format!(
                "{self} is contained in {other} but their counts cannot agree"
            ))),
        };
        Some(derived)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(cells: &[(usize, usize)], count: usize) -> Constraint {
        Constraint::new(cells.iter().map(|&p| Cell::from(p)), count).unwrap()
    }

    #[test]
    fn test_count_above_cells_rejected() {
        let result = Constraint::new([Cell::new(0, 0)], 2);
        assert!(matches!(
            result,
            Err(Error::InvalidConstraint { count: 2, cells: 1 })
        ));
    }

    #[test]
    fn test_resolution() {
        let all_mines = c(&[(0, 0), (0, 1)], 2);
        assert_eq!(all_mines.resolved_mines().map(|s| s.len()), Some(2));
        assert!(all_mines.resolved_safes().is_none());

        let all_safe = c(&[(0, 0), (0, 1)], 0);
        assert_eq!(all_safe.resolved_safes().map(|s| s.len()), Some(2));
        assert!(all_safe.resolved_mines().is_none());

        let open = c(&[(0, 0), (0, 1)], 1);
        assert!(open.resolved_mines().is_none());
        assert!(open.resolved_safes().is_none());
    }

    #[test]
    fn test_empty_constraint_resolves_nothing() {
        let empty = c(&[], 0);
        assert!(empty.is_empty());
        assert!(empty.resolved_mines().is_none());
        assert!(empty.resolved_safes().is_none());
    }

    #[test]
    fn test_without() {
        let sentence = c(&[(0, 0), (0, 1), (0, 2)], 1);

        let after_mine = sentence.without(Cell::new(0, 1), true).unwrap();
        assert_eq!(after_mine, c(&[(0, 0), (0, 2)], 0));

        let after_safe = sentence.without(Cell::new(0, 1), false).unwrap();
        assert_eq!(after_safe, c(&[(0, 0), (0, 2)], 1));

        // Unrelated cell is a no-op.
        let untouched = sentence.without(Cell::new(5, 5), true).unwrap();
        assert_eq!(untouched, sentence);
    }

    #[test]
    fn test_without_contradiction() {
        let no_mines = c(&[(0, 0), (0, 1)], 0);
        assert!(matches!(
            no_mines.without(Cell::new(0, 0), true),
            Err(Error::InternalInconsistency { .. })
        ));

        let all_mines = c(&[(0, 0), (0, 1)], 2);
        assert!(matches!(
            all_mines.without(Cell::new(0, 0), false),
            Err(Error::InternalInconsistency { .. })
        ));
    }

    #[test]
    fn test_subset_inference() {
        let abc = c(&[(0, 0), (0, 1), (0, 2)], 1);
        let ab = c(&[(0, 0), (0, 1)], 1);

        let derived = ab.subtracted_from(&abc).unwrap().unwrap();
        assert_eq!(derived, c(&[(0, 2)], 0));

        // Only the smaller side derives anything.
        assert!(abc.subtracted_from(&ab).is_none());
        // Equal sets are not strict subsets.
        assert!(ab.subtracted_from(&ab.clone()).is_none());
    }

    #[test]
    fn test_subset_inference_not_subset() {
        let ab = c(&[(0, 0), (0, 1)], 1);
        let cd = c(&[(1, 0), (1, 1), (1, 2)], 1);
        assert!(ab.subtracted_from(&cd).is_none());
    }

    #[test]
    fn test_subset_inference_contradiction() {
        let ab = c(&[(0, 0), (0, 1)], 2);
        let abc = c(&[(0, 0), (0, 1), (0, 2)], 1);
        assert!(matches!(
            ab.subtracted_from(&abc),
            Some(Err(Error::InternalInconsistency { .. }))
        ));

        // Three mines cannot fit in the two cells left over.
        let a = c(&[(0, 0)], 0);
        let abc_full = c(&[(0, 0), (0, 1), (0, 2)], 3);
        assert!(matches!(
            a.subtracted_from(&abc_full),
            Some(Err(Error::InternalInconsistency { .. }))
        ));
    }

    #[test]
    fn test_display() {
        let sentence = c(&[(1, 0), (0, 2)], 1);
        assert_eq!(sentence.to_string(), "{(0, 2), (1, 0)} = 1");
    }
}
