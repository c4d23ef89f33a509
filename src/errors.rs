//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type returned by position mutation,
//! move generation, notation parsing and search. Two families matter:
//!
//! - Input errors (`InvalidFen`, `InvalidSquare`, `InvalidMoveText`) are
//!   produced at the notation boundary and are safe to show to a user.
//! - Core errors (`InvalidMove`, `MissingKing`, `EmptyHistory`) mean the
//!   caller broke a contract or the position is corrupt. They are propagated
//!   unchanged and never retried.

use thiserror::Error;

use crate::game_state::chess_types::Color;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// `make_move` was given a move that does not describe a real board
    /// transition (empty origin, wrong side, impossible promotion, ...).
    #[error("invalid move {mv}: {reason}")]
    InvalidMove { mv: String, reason: String },

    /// A king was required (check detection, legality filtering) but the
    /// board holds none for this color.
    #[error("no {0} king on the board")]
    MissingKing(Color),

    /// `undo_last_move` was called with no applied move on the history stack.
    #[error("cannot undo: move history is empty")]
    EmptyHistory,

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move text: {0}")]
    InvalidMoveText(String),
}

impl ChessError {
    pub(crate) fn invalid_move(mv: impl ToString, reason: impl Into<String>) -> Self {
        ChessError::InvalidMove {
            mv: mv.to_string(),
            reason: reason.into(),
        }
    }
}
