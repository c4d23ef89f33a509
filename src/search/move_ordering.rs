//! Move ordering for alpha-beta search.
//!
//! Principal-variation move first, then captures by most valuable victim /
//! least valuable attacker, then promotions, then quiet moves. The sort is
//! stable so quiet moves keep generation order and searches stay
//! reproducible.

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

const PV_BONUS: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 100_000;
const PROMOTION_BASE: i32 = 50_000;

#[inline]
fn ordering_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

pub fn move_order_score(position: &Position, mv: Move, pv_move: Option<Move>) -> i32 {
    if pv_move == Some(mv) {
        return PV_BONUS;
    }

    let attacker = position.piece_at(mv.from).map(|p| p.kind);
    let victim = match position.piece_at(mv.to) {
        Some(piece) => Some(piece.kind),
        None if attacker == Some(PieceKind::Pawn)
            && position.en_passant_square() == Some(mv.to) =>
        {
            Some(PieceKind::Pawn)
        }
        None => None,
    };

    let mut score = 0;
    if let Some(victim) = victim {
        let attacker_value = attacker.map_or(0, ordering_value);
        score += CAPTURE_BASE + ordering_value(victim) * 10 - attacker_value / 10;
    }
    if let Some(kind) = mv.promotion {
        score += PROMOTION_BASE + ordering_value(kind);
    }
    score
}

/// Sort `moves` best-first in place.
pub fn order_moves(position: &Position, moves: &mut [Move], pv_move: Option<Move>) {
    moves.sort_by_cached_key(|&mv| std::cmp::Reverse(move_order_score(position, mv, pv_move)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::get_legal_moves;
    use crate::utils::long_algebraic::parse_move;

    #[test]
    fn pv_move_comes_first_then_captures() {
        let mut position =
            Position::from_fen("4k3/8/8/3q4/4P3/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        let mut moves = get_legal_moves(&mut position).expect("move generation should succeed");
        let pv = parse_move("a1a7").expect("move text should parse");
        order_moves(&position, &mut moves, Some(pv));
        assert_eq!(moves[0], pv);
        assert_eq!(moves[1], parse_move("e4d5").expect("move text should parse"));
    }

    #[test]
    fn cheaper_attacker_preferred_for_same_victim() {
        let position =
            Position::from_fen("4k3/8/8/3r4/4P3/8/3R4/4K3 w - - 0 1").expect("FEN should parse");
        let pawn_takes = parse_move("e4d5").expect("move text should parse");
        let rook_takes = parse_move("d2d5").expect("move text should parse");
        assert!(
            move_order_score(&position, pawn_takes, None)
                > move_order_score(&position, rook_takes, None)
        );
    }

    #[test]
    fn quiet_moves_keep_generation_order() {
        let mut position = Position::starting_position();
        let generated = get_legal_moves(&mut position).expect("move generation should succeed");
        let mut ordered = generated.clone();
        order_moves(&position, &mut ordered, None);
        assert_eq!(ordered, generated);
    }
}
