//! Canonical chess-rule constants.
//!
//! Starting position, 0x88 direction vectors and the promotion set shared by
//! move generation, attack detection and move application.

use crate::game_state::chess_types::PieceKind;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const UP: i8 = 16;
pub const DOWN: i8 = -16;
pub const LEFT: i8 = -1;
pub const RIGHT: i8 = 1;

pub const ROOK_DIRECTIONS: [i8; 4] = [UP, LEFT, RIGHT, DOWN];
pub const BISHOP_DIRECTIONS: [i8; 4] = [UP + LEFT, UP + RIGHT, DOWN + LEFT, DOWN + RIGHT];
pub const QUEEN_DIRECTIONS: [i8; 8] = [
    UP,
    LEFT,
    RIGHT,
    DOWN,
    UP + LEFT,
    UP + RIGHT,
    DOWN + LEFT,
    DOWN + RIGHT,
];
pub const KING_DIRECTIONS: [i8; 8] = QUEEN_DIRECTIONS;
pub const KNIGHT_OFFSETS: [i8; 8] = [
    UP + 2 * LEFT,
    2 * UP + LEFT,
    2 * UP + RIGHT,
    UP + 2 * RIGHT,
    DOWN + 2 * RIGHT,
    2 * DOWN + RIGHT,
    2 * DOWN + LEFT,
    DOWN + 2 * LEFT,
];

/// Promotion choices in generation order.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

#[inline]
pub const fn is_orthogonal(direction: i8) -> bool {
    matches!(direction, UP | DOWN | LEFT | RIGHT)
}
