use crate::game_state::chess_rules::KING_DIRECTIONS;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_moves_knight::generate_step_moves;

/// King steps plus castling pseudo-moves.
pub fn generate_king_moves(position: &Position, from: Square, color: Color, out: &mut Vec<Move>) {
    generate_step_moves(position, from, color, &KING_DIRECTIONS, out);
    generate_castling_moves(position, from, color, out);
}

const WHITE_KING_SIDE_GAP: [Square; 2] = [Square::F1, Square::G1];
const WHITE_QUEEN_SIDE_GAP: [Square; 3] = [Square::D1, Square::C1, Square::B1];
const BLACK_KING_SIDE_GAP: [Square; 2] = [Square::F8, Square::G8];
const BLACK_QUEEN_SIDE_GAP: [Square; 3] = [Square::D8, Square::C8, Square::B8];

/// Rook corner, king destination and the squares that must be empty.
type CastlingSide = (Square, Square, &'static [Square]);

/// Emit castling when the right is set, the king stands on its home square,
/// the own rook is in the corner and every square between them is empty.
/// Attacked-square checks happen during legality filtering.
fn generate_castling_moves(position: &Position, from: Square, color: Color, out: &mut Vec<Move>) {
    let (home, king_side, queen_side): (Square, CastlingSide, CastlingSide) = match color {
        Color::White => (
            Square::E1,
            (Square::H1, Square::G1, &WHITE_KING_SIDE_GAP),
            (Square::A1, Square::C1, &WHITE_QUEEN_SIDE_GAP),
        ),
        Color::Black => (
            Square::E8,
            (Square::H8, Square::G8, &BLACK_KING_SIDE_GAP),
            (Square::A8, Square::C8, &BLACK_QUEEN_SIDE_GAP),
        ),
    };
    if from != home {
        return;
    }

    let rights = position.castling_rights();
    let rook = Some(Piece::new(color, PieceKind::Rook));

    for (allowed, (corner, to, between)) in [
        (rights.king_side(color), king_side),
        (rights.queen_side(color), queen_side),
    ] {
        if allowed
            && position.piece_at(corner) == rook
            && between.iter().all(|&sq| position.piece_at(sq).is_none())
        {
            out.push(Move::new(from, to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn king_moves(fen: &str, from: Square) -> Vec<String> {
        let position = Position::from_fen(fen).expect("FEN should parse");
        let color = position.side_to_move();
        let mut out = Vec::new();
        generate_king_moves(&position, from, color, &mut out);
        out.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn both_castles_emitted_when_path_is_clear() {
        let moves = king_moves("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Square::E1);
        assert!(moves.contains(&"e1g1".to_owned()));
        assert!(moves.contains(&"e1c1".to_owned()));
        assert_eq!(moves.len(), 7);
    }

    #[test]
    fn queen_side_castle_needs_b_file_empty() {
        let moves = king_moves("rn2k2r/8/8/8/8/8/8/4K3 b kq - 0 1", Square::E8);
        assert!(moves.contains(&"e8g8".to_owned()));
        assert!(!moves.contains(&"e8c8".to_owned()));
    }

    #[test]
    fn castle_requires_right_and_rook() {
        let moves = king_moves("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1", Square::E1);
        assert!(!moves.contains(&"e1g1".to_owned()));
        assert!(moves.contains(&"e1c1".to_owned()));

        let moves = king_moves("4k3/8/8/8/8/8/8/R3K3 w KQ - 0 1", Square::E1);
        assert!(!moves.contains(&"e1g1".to_owned()));
    }
}
