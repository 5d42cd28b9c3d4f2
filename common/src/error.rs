//! Error type shared by every part of the engine.

use thiserror::Error;

use crate::cell::Cell;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("a constraint cannot hold {count} mines among {cells} cells")]
    InvalidConstraint { count: usize, cells: usize },

    /// The knowledge base was driven into a contradiction: either the
    /// reported counts disagree with each other or the inference is wrong.
    #[error("knowledge base is inconsistent: {reason}")]
    InternalInconsistency { reason: String },

    #[error("inference did not reach a fixpoint within {passes} passes")]
    FixpointLimit { passes: usize },

    #[error("no safe or unexplored cell remains")]
    NoMovesAvailable,

    #[error("game_ended")]
    GameOver,

    #[error("session codec: {0}")]
    Codec(#[from] bcs::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn inconsistent(reason: impl Into<String>) -> Self {
        Error::InternalInconsistency {
            reason: reason.into(),
        }
    }
}
