//! A full game: the minefield, the agent playing it, and the turn loop tying
//! them together.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::{Agent, Move};
use crate::cell::Cell;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::knowledge::Knowledge;
use crate::minefield::Minefield;

/// Value shown by [`Session::view`] for a cell the agent has not probed.
pub const VIEW_HIDDEN: i8 = -1;
/// Value shown by [`Session::view`] for a cell the agent flagged as a mine.
pub const VIEW_FLAGGED: i8 = -2;
/// Value shown by [`Session::view`] for the mine that ended the game.
pub const VIEW_DETONATED: i8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
    /// Nothing left to probe without the flags matching the mines.
    Stuck,
}

/// What happened during one call to [`Session::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Revealed { mv: Move, count: usize },
    Detonated(Move),
    Stuck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    minefield: Minefield,
    agent: Agent,
    status: GameStatus,
    detonated: Option<Cell>,
    turns: usize,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        let dims = config.validate()?;
        let minefield = Minefield::new(dims, config.mines, rng)?;
        Ok(Self::with_minefield(minefield))
    }

    pub fn with_minefield(minefield: Minefield) -> Self {
        let status = if minefield.has_won() {
            GameStatus::Won
        } else {
            GameStatus::Playing
        };

        Session {
            agent: Agent::new(minefield.dims()),
            minefield,
            status,
            detonated: None,
            turns: 0,
        }
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn detonated(&self) -> Option<Cell> {
        self.detonated
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Plays one move: choose a cell, probe it, learn from the count and
    /// flag every mine the agent has proven.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Turn> {
        if self.status != GameStatus::Playing {
            return Err(Error::GameOver);
        }

        let mv = match self.agent.choose_move(rng) {
            Ok(mv) => mv,
            Err(Error::NoMovesAvailable) => {
                info!(turns = self.turns, "no moves left");
                self.status = GameStatus::Stuck;
                return Ok(Turn::Stuck);
            }
            Err(e) => return Err(e),
        };
        self.turns += 1;

        let cell = mv.cell();
        if self.minefield.is_mine(cell)? {
            info!(%cell, turns = self.turns, guess = mv.is_guess(), "hit a mine");
            self.status = GameStatus::Lost;
            self.detonated = Some(cell);
            return Ok(Turn::Detonated(mv));
        }

        let count = self.minefield.nearby_mine_count(cell)?;
        debug!(%cell, count, guess = mv.is_guess(), "probed");
        self.agent.learn(cell, count)?;

        for &mine in self.agent.knowledge().mines() {
            if !self.minefield.found_mines().contains(&mine) {
                self.minefield.record_found(mine)?;
            }
        }

        if self.minefield.has_won() {
            info!(turns = self.turns, "all mines flagged");
            self.status = GameStatus::Won;
        }

        Ok(Turn::Revealed { mv, count })
    }

    /// Steps until the game is over.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameStatus> {
        while self.status == GameStatus::Playing {
            self.step(rng)?;
        }
        Ok(self.status)
    }

    /// The board as the player sees it, row-major: a count for probed cells,
    /// `VIEW_FLAGGED`, `VIEW_DETONATED` or `VIEW_HIDDEN` otherwise.
    pub fn view(&self) -> Vec<i8> {
        let kb = self.agent.knowledge();
        kb.dims()
            .cells()
            .map(|cell| {
                if self.detonated == Some(cell) {
                    return VIEW_DETONATED;
                }
                if let Some(&count) = self.agent.revealed().get(&cell) {
                    return count as i8;
                }
                match kb.status(cell) {
                    Knowledge::Mine => VIEW_FLAGGED,
                    _ => VIEW_HIDDEN,
                }
            })
            .collect()
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        Ok(bcs::from_bytes(bytes)?)
    }
}
