//! Core incremental board state representation.
//!
//! `Position` is the central model for the engine: a 0x88 mailbox of pieces,
//! side to move, castling rights, en-passant target, cached king squares,
//! the incremental hash and evaluation accumulators, and the undo stack used
//! by make/unmake during search.
//!
//! Outside of construction, the only mutators are `make_move` and
//! `undo_last_move` in `move_generation::legal_move_apply`.

use std::fmt;
use std::sync::Arc;

use crate::errors::ChessResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::MoveDelta;
use crate::search::board_scoring::{
    compute_evaluation, phase_value, square_values, tapered_score,
};
use crate::search::zobrist::{compute_zobrist_key, ZobristKeys};
use crate::utils::fen_parser::{parse_fen, parse_fen_with_keys};
use crate::utils::render_game_state::render_position;

const BOARD_ARRAY_SIZE: usize = 128;

#[derive(Debug, Clone)]
pub struct Position {
    pub(crate) squares: [Option<Piece>; BOARD_ARRAY_SIZE],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) king_squares: [Option<Square>; 2],

    pub(crate) history: Vec<MoveDelta>,

    pub(crate) hash: u64,
    pub(crate) middlegame_score: i32,
    pub(crate) endgame_score: i32,
    pub(crate) game_phase: i32,

    zobrist: Arc<ZobristKeys>,
}

impl Position {
    /// Empty board, white to move, no castling rights, no en-passant target.
    pub fn new(zobrist: Arc<ZobristKeys>) -> Self {
        let mut position = Self {
            squares: [None; BOARD_ARRAY_SIZE],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_square: None,
            king_squares: [None; 2],
            history: Vec::with_capacity(256),
            hash: 0,
            middlegame_score: 0,
            endgame_score: 0,
            game_phase: 0,
            zobrist,
        };
        position.recompute_hash();
        position
    }

    /// Empty board using the default-seeded key table.
    pub fn empty() -> Self {
        Self::new(ZobristKeys::shared_default())
    }

    pub fn starting_position() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn from_fen_with_keys(fen: &str, zobrist: Arc<ZobristKeys>) -> ChessResult<Self> {
        parse_fen_with_keys(fen, zobrist)
    }

    // --- Read access ---

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn history(&self) -> &[MoveDelta] {
        &self.history
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn middlegame_score(&self) -> i32 {
        self.middlegame_score
    }

    #[inline]
    pub fn endgame_score(&self) -> i32 {
        self.endgame_score
    }

    #[inline]
    pub fn game_phase(&self) -> i32 {
        self.game_phase
    }

    #[inline]
    pub fn zobrist_keys(&self) -> &ZobristKeys {
        &self.zobrist
    }

    /// Tapered score, white minus black.
    #[inline]
    pub fn white_relative_evaluation(&self) -> i32 {
        tapered_score(self.middlegame_score, self.endgame_score, self.game_phase)
    }

    /// Tapered score from the side to move's point of view.
    #[inline]
    pub fn evaluation(&self) -> i32 {
        match self.side_to_move {
            Color::White => self.white_relative_evaluation(),
            Color::Black => -self.white_relative_evaluation(),
        }
    }

    // --- Bulk setup (builders call the recompute_* trio afterwards) ---

    /// Place or clear a piece without touching any derived field.
    #[inline]
    pub fn put_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights;
    }

    #[inline]
    pub fn set_en_passant_square(&mut self, square: Option<Square>) {
        self.en_passant_square = square;
    }

    pub fn recompute_king_squares(&mut self) {
        self.king_squares = [None; 2];
        for square in Square::all() {
            if let Some(piece) = self.piece_at(square) {
                if piece.kind == PieceKind::King {
                    self.king_squares[piece.color.index()] = Some(square);
                }
            }
        }
    }

    pub fn recompute_hash(&mut self) {
        self.hash = compute_zobrist_key(self);
    }

    pub fn recompute_evaluation(&mut self) {
        let (middlegame, endgame, phase) = compute_evaluation(self);
        self.middlegame_score = middlegame;
        self.endgame_score = endgame;
        self.game_phase = phase;
    }

    // --- Incremental placement used by make_move ---

    /// Replace the content of `square`, folding the change into the hash and
    /// the evaluation accumulators.
    #[inline]
    pub(crate) fn set_square(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(old) = self.squares[square.index()] {
            let (mg, eg) = square_values(old, square);
            self.middlegame_score -= mg;
            self.endgame_score -= eg;
            self.game_phase -= phase_value(old.kind);
            self.hash ^= self.zobrist.piece_square(old, square);
        }
        if let Some(new) = piece {
            let (mg, eg) = square_values(new, square);
            self.middlegame_score += mg;
            self.endgame_score += eg;
            self.game_phase += phase_value(new.kind);
            self.hash ^= self.zobrist.piece_square(new, square);
        }
        self.squares[square.index()] = piece;
    }

    // --- Equality ---

    /// Same placement, side to move, castling rights and en-passant target,
    /// regardless of how the position was reached. Use this for repetition
    /// and transposition reasoning.
    pub fn history_agnostic_eq(&self, other: &Position) -> bool {
        Square::all().all(|sq| self.piece_at(sq) == other.piece_at(sq))
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
            && self.king_squares == other.king_squares
    }
}

/// Full equality: positions are equal only when reached by the same moves.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.history_agnostic_eq(other) && self.history == other.history
    }
}

impl Eq for Position {}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_position(self))
    }
}
