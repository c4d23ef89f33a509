//! Ray moves for bishops, rooks and queens.

use crate::game_state::chess_rules::{BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

/// Extend each direction until the board edge, an own piece (excluded) or an
/// enemy piece (included as a capture).
pub fn generate_slider_moves(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[i8],
    out: &mut Vec<Move>,
) {
    for &direction in directions {
        let mut cursor = from.offset(direction);
        while let Some(to) = cursor {
            match position.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(target) => {
                    if target.color != color {
                        out.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cursor = to.offset(direction);
        }
    }
}

#[inline]
pub fn slider_directions(kind: PieceKind) -> &'static [i8] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
    }
}
