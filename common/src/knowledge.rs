//! The agent's knowledge base and its inference engine.
//!
//! Knowledge is kept as a list of [`Constraint`]s over the cells whose status
//! is still open, plus the sets of cells already proven to be mines or safe.
//! Every new fact is pushed through the constraints immediately, so they never
//! mention a resolved cell. Inference then repeats three rules until nothing
//! changes:
//!
//! 1. a constraint whose count equals its size marks all its cells as mines;
//! 2. a constraint with a zero count marks all its cells as safe;
//! 3. for `A ⊂ B`, the cells in `B \ A` hold exactly `B.count - A.count` mines.

use std::collections::BTreeSet;
use std::mem;

use itertools::Itertools;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cell::{Cell, Dimensions};
use crate::constraint::Constraint;
use crate::error::{Error, Result};

/// Non-empty subsets of a full neighbourhood. Every constraint's cells fit
/// inside the neighbourhood of some probed cell, which bounds how many
/// distinct constraints inference can ever produce.
const NEIGHBORHOOD_SUBSETS: usize = 1 << 8;

/// What the knowledge base has proven about a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knowledge {
    Mine,
    Safe,
    Unknown,
}

/// Everything the agent knows about a board it cannot see.
///
/// Once an operation fails with `InternalInconsistency` the knowledge base
/// holds contradictory facts and should be discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    dims: Dimensions,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    constraints: Vec<Constraint>,
}

impl KnowledgeBase {
    pub fn new(dims: Dimensions) -> Self {
        KnowledgeBase {
            dims,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            constraints: Vec::new(),
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    /// The constraints still carrying unresolved information.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn status(&self, cell: Cell) -> Knowledge {
        if self.mines.contains(&cell) {
            Knowledge::Mine
        } else if self.safes.contains(&cell) {
            Knowledge::Safe
        } else {
            Knowledge::Unknown
        }
    }

    /// Records that `cell` is a mine and runs inference.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<()> {
        self.dims.check(cell)?;
        if self.assign_mine(cell)? {
            self.infer()?;
        }
        Ok(())
    }

    /// Records that `cell` is safe and runs inference.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<()> {
        self.dims.check(cell)?;
        if self.assign_safe(cell)? {
            self.infer()?;
        }
        Ok(())
    }

    /// Learns that probing `cell` revealed `count` mines around it.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.dims.check(cell)?;
        if self.mines.contains(&cell) {
            return Err(Error::inconsistent(format!(
                "{cell} was probed but is known to be a mine"
            )));
        }

        let sentence = Constraint::new(self.dims.neighbors(cell), count)?;
        debug!(%cell, count, "adding knowledge");

        self.moves_made.insert(cell);
        self.assign_safe(cell)?;
        self.add_constraint(sentence)
    }

    /// Adds an arbitrary statement about the board and runs inference.
    ///
    /// Cells already known are folded out of the statement first, so callers
    /// may pass constraints over any cells on the board.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<()> {
        for &cell in constraint.cells() {
            self.dims.check(cell)?;
        }

        let resolved: Vec<(Cell, bool)> = constraint
            .cells()
            .iter()
            .filter_map(|&cell| match self.status(cell) {
                Knowledge::Mine => Some((cell, true)),
                Knowledge::Safe => Some((cell, false)),
                Knowledge::Unknown => None,
            })
            .collect();

        let mut normalized = constraint;
        for (cell, is_mine) in resolved {
            normalized = normalized.without(cell, is_mine)?;
        }

        if self.insert(normalized)? {
            trace!(constraints = self.constraints.len(), "new constraint");
        }
        self.infer()
    }

    /// A known-safe cell that has not been played yet, lowest row and column first.
    pub fn safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    /// A uniformly random cell that has not been played and is not a known mine.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .dims
            .cells()
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect();
        candidates.choose(rng).copied()
    }

    /// Adds `cell` to the mines and folds it out of every constraint.
    /// Returns whether the fact was new.
    fn assign_mine(&mut self, cell: Cell) -> Result<bool> {
        if self.safes.contains(&cell) {
            return Err(Error::inconsistent(format!(
                "{cell} is known to be safe and cannot be a mine"
            )));
        }
        if !self.mines.insert(cell) {
            return Ok(false);
        }
        debug!(%cell, "mine");
        self.normalize(cell, true)?;
        Ok(true)
    }

    /// Adds `cell` to the safes and folds it out of every constraint.
    /// Returns whether the fact was new.
    fn assign_safe(&mut self, cell: Cell) -> Result<bool> {
        if self.mines.contains(&cell) {
            return Err(Error::inconsistent(format!(
                "{cell} is known to be a mine and cannot be safe"
            )));
        }
        if !self.safes.insert(cell) {
            return Ok(false);
        }
        debug!(%cell, "safe");
        self.normalize(cell, false)?;
        Ok(true)
    }

    fn normalize(&mut self, cell: Cell, is_mine: bool) -> Result<()> {
        let (touched, untouched): (Vec<Constraint>, Vec<Constraint>) =
            mem::take(&mut self.constraints)
                .into_iter()
                .partition(|c| c.cells().contains(&cell));

        self.constraints = untouched;
        for constraint in touched {
            self.insert(constraint.without(cell, is_mine)?)?;
        }
        Ok(())
    }

    /// Stores a constraint unless it is empty or already present.
    /// Returns whether it was stored.
    fn insert(&mut self, constraint: Constraint) -> Result<bool> {
        if constraint.is_empty() {
            return Ok(false);
        }
        if let Some(existing) = self
            .constraints
            .iter()
            .find(|c| c.cells() == constraint.cells())
        {
            if existing.count() != constraint.count() {
                return Err(Error::inconsistent(format!(
                    "{existing} contradicts {constraint}"
                )));
            }
            return Ok(false);
        }
        self.constraints.push(constraint);
        Ok(true)
    }

    /// Upper bound on productive inference passes.
    ///
    /// A pass is productive only if it proves a new fact or stores a
    /// constraint that was never stored before: facts only accumulate, and a
    /// constraint that was rewritten or dropped mentioned a cell that is now
    /// resolved, so it cannot be derived again. Facts are bounded by the board
    /// size, and constraints by the subsets of each probed cell's neighbourhood
    /// (one count per cell set, since two counts would be a contradiction).
    /// Wider constraints passed to `add_constraint` loosen that bound; the cap
    /// still stops the loop.
    fn pass_limit(&self) -> usize {
        self.dims.capacity() * NEIGHBORHOOD_SUBSETS + 1
    }

    /// Applies the deduction rules until a pass changes nothing.
    fn infer(&mut self) -> Result<()> {
        let limit = self.pass_limit();
        for pass in 1..=limit {
            if !self.inference_pass()? {
                trace!(pass, constraints = self.constraints.len(), "fixpoint");
                return Ok(());
            }
        }
        Err(Error::FixpointLimit { passes: limit })
    }

    fn inference_pass(&mut self) -> Result<bool> {
        let mut changed = false;

        let mines: Vec<Cell> = self
            .constraints
            .iter()
            .filter_map(Constraint::resolved_mines)
            .flatten()
            .copied()
            .collect();
        for cell in mines {
            changed |= self.assign_mine(cell)?;
        }

        let safes: Vec<Cell> = self
            .constraints
            .iter()
            .filter_map(Constraint::resolved_safes)
            .flatten()
            .copied()
            .collect();
        for cell in safes {
            changed |= self.assign_safe(cell)?;
        }

        // Only constraints present now take part; what this pass derives is
        // compared on the next one.
        let mut derived = Vec::new();
        for (a, b) in self.constraints.iter().tuple_combinations() {
            for (smaller, larger) in [(a, b), (b, a)] {
                if let Some(result) = smaller.subtracted_from(larger) {
                    derived.push(result?);
                }
            }
        }
        for constraint in derived {
            if self.insert(constraint)? {
                changed = true;
            }
        }

        Ok(changed)
    }
}
