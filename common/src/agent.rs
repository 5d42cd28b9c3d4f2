use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Dimensions};
use crate::error::{Error, Result};
use crate::knowledge::KnowledgeBase;

/// A cell the agent decided to probe, and how it got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Proven safe by the knowledge base.
    Deduced(Cell),
    /// Picked at random because nothing could be proven.
    Guess(Cell),
}

impl Move {
    pub fn cell(&self) -> Cell {
        match *self {
            Move::Deduced(cell) | Move::Guess(cell) => cell,
        }
    }

    pub fn is_guess(&self) -> bool {
        matches!(self, Move::Guess(_))
    }
}

/// The player. Decides where to probe next and remembers what each probe showed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    kb: KnowledgeBase,
    /// Count shown by every probed cell.
    revealed: BTreeMap<Cell, u8>,
}

impl Agent {
    pub fn new(dims: Dimensions) -> Self {
        Agent {
            kb: KnowledgeBase::new(dims),
            revealed: BTreeMap::new(),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn revealed(&self) -> &BTreeMap<Cell, u8> {
        &self.revealed
    }

    /// Prefers a proven-safe cell and falls back to a random unexplored one.
    pub fn choose_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Move> {
        if let Some(cell) = self.kb.safe_move() {
            return Ok(Move::Deduced(cell));
        }
        self.kb
            .random_move(rng)
            .map(Move::Guess)
            .ok_or(Error::NoMovesAvailable)
    }

    /// Feeds the result of probing `cell` into the knowledge base.
    pub fn learn(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.kb.add_knowledge(cell, count)?;
        // add_knowledge caps count at the neighbourhood size, so it fits.
        self.revealed.insert(cell, count as u8);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_first_move_is_a_guess() {
        let agent = Agent::new(Dimensions::new(4, 4).unwrap());
        let mut rng = StdRng::seed_from_u64(1);
        let mv = agent.choose_move(&mut rng).unwrap();
        assert!(mv.is_guess());
    }

    #[test]
    fn test_prefers_deduced_move() {
        let mut agent = Agent::new(Dimensions::new(3, 3).unwrap());
        agent.learn(Cell::new(1, 1), 0).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            agent.choose_move(&mut rng).unwrap(),
            Move::Deduced(Cell::new(0, 0))
        );
        assert_eq!(agent.revealed().get(&Cell::new(1, 1)), Some(&0));
    }

    #[test]
    fn test_no_moves_available() {
        // Single row: (0, 0) shows 1, so (0, 1) is a mine and nothing is left.
        let mut agent = Agent::new(Dimensions::new(1, 2).unwrap());
        agent.learn(Cell::new(0, 0), 1).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            agent.choose_move(&mut rng),
            Err(Error::NoMovesAvailable)
        ));
    }

    #[test]
    fn test_failed_learn_is_not_recorded() {
        let mut agent = Agent::new(Dimensions::new(2, 2).unwrap());
        assert!(agent.learn(Cell::new(0, 0), 9).is_err());
        assert!(agent.revealed().is_empty());
    }
}
