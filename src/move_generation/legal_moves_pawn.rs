use crate::game_state::chess_rules::{LEFT, PROMOTION_KINDS, RIGHT};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::en_passant_victim;

#[inline]
fn start_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

#[inline]
fn last_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

fn push_pawn_move(from: Square, to: Square, color: Color, out: &mut Vec<Move>) {
    if to.rank() == last_rank(color) {
        for kind in PROMOTION_KINDS {
            out.push(Move::with_promotion(from, to, kind));
        }
    } else {
        out.push(Move::new(from, to));
    }
}

/// Pseudo-legal pushes, double pushes, captures, en-passant captures and
/// promotions for the pawn of `color` on `from`.
pub fn generate_pawn_moves(position: &Position, from: Square, color: Color, out: &mut Vec<Move>) {
    let forward = color.forward();

    if let Some(one_step) = from.offset(forward) {
        if position.piece_at(one_step).is_none() {
            push_pawn_move(from, one_step, color, out);

            if from.rank() == start_rank(color) {
                if let Some(two_step) = one_step.offset(forward) {
                    if position.piece_at(two_step).is_none() {
                        out.push(Move::new(from, two_step));
                    }
                }
            }
        }
    }

    let pawn = Piece::new(color, PieceKind::Pawn);
    let enemy_pawn = Some(Piece::new(color.opposite(), PieceKind::Pawn));
    for side in [LEFT, RIGHT] {
        let Some(to) = from.offset(forward + side) else {
            continue;
        };
        match position.piece_at(to) {
            Some(target) if target.color != color => push_pawn_move(from, to, color, out),
            None => {
                let mv = Move::new(from, to);
                let victim = en_passant_victim(pawn, mv, position.en_passant_square());
                if victim.is_some_and(|sq| position.piece_at(sq) == enemy_pawn) {
                    out.push(mv);
                }
            }
            _ => {}
        }
    }
}
