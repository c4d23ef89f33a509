//! Zobrist hashing support for fast position identity and transposition lookup.
//!
//! Keys live in an explicit `ZobristKeys` value built once from a seed, so
//! hashes are reproducible across runs and tests can pin them. Positions hold
//! the table behind an `Arc`; cloning a position never rebuilds keys.
//!
//! The hash covers piece placement, side to move, castling rights and the
//! en-passant file (whenever an en-passant target is set).

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

/// Seed used when no explicit seed is configured.
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for kind in color {
                for key in kind {
                    *key = rng.next_u64();
                }
            }
        }

        let side_to_move = rng.next_u64();

        let mut castling = [0u64; 4];
        for key in &mut castling {
            *key = rng.next_u64();
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.next_u64();
        }

        Self {
            piece_square,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    /// Shared table built from `DEFAULT_ZOBRIST_SEED`.
    pub fn shared_default() -> Arc<Self> {
        Arc::new(Self::from_seed(DEFAULT_ZOBRIST_SEED))
    }

    #[inline]
    pub fn piece_square(&self, piece: Piece, square: Square) -> u64 {
        self.piece_square[piece.color.index()][piece.kind.index()][square.index64()]
    }

    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }

    /// XOR of the keys of every right that is set.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        rights
            .as_array()
            .iter()
            .zip(self.castling.iter())
            .filter(|(set, _)| **set)
            .fold(0u64, |acc, (_, key)| acc ^ key)
    }

    #[inline]
    pub fn en_passant(&self, square: Option<Square>) -> u64 {
        square.map_or(0, |sq| self.en_passant_file[sq.file() as usize])
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::from_seed(DEFAULT_ZOBRIST_SEED)
    }
}

/// Compute the full position key from scratch.
pub fn compute_zobrist_key(position: &Position) -> u64 {
    let keys = position.zobrist_keys();
    let mut key = 0u64;

    for square in Square::all() {
        if let Some(piece) = position.piece_at(square) {
            key ^= keys.piece_square(piece, square);
        }
    }

    if position.side_to_move() == Color::Black {
        key ^= keys.side_to_move();
    }
    key ^= keys.castling(position.castling_rights());
    key ^= keys.en_passant(position.en_passant_square());

    key
}
