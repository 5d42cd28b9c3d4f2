//! A Minesweeper agent that plays by logical deduction.
//!
//! The [`KnowledgeBase`] holds what the agent has learned as constraints of
//! the form "exactly N of these cells are mines" and derives every mine and
//! safe cell those constraints imply. The [`Agent`] only guesses when nothing
//! can be proven, and [`Session`] runs the turn loop against a [`Minefield`].

pub mod agent;
pub mod cell;
pub mod config;
pub mod constraint;
pub mod error;
pub mod knowledge;
pub mod minefield;
pub mod session;

pub use agent::{Agent, Move};
pub use cell::{Cell, Dimensions};
pub use config::GameConfig;
pub use constraint::Constraint;
pub use error::{Error, Result};
pub use knowledge::{Knowledge, KnowledgeBase};
pub use minefield::Minefield;
pub use session::{GameStatus, Session, Turn, VIEW_DETONATED, VIEW_FLAGGED, VIEW_HIDDEN};
