//! Attack and check detection on the 0x88 mailbox.
//!
//! Every query ray-casts outward from the target square: first blocker wins
//! per ray, so no attack tables are needed.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{is_orthogonal, KNIGHT_OFFSETS, QUEEN_DIRECTIONS};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

/// Squares an enemy pawn of `attacker` would have to stand on to hit `square`.
#[inline]
fn pawn_attack_origins(square: Square, attacker: Color) -> [Option<Square>; 2] {
    let behind = -attacker.forward();
    [square.offset(behind - 1), square.offset(behind + 1)]
}

pub fn is_square_attacked(position: &Position, square: Square, attacker: Color) -> bool {
    let pawn = Piece::new(attacker, PieceKind::Pawn);
    if pawn_attack_origins(square, attacker)
        .into_iter()
        .flatten()
        .any(|origin| position.piece_at(origin) == Some(pawn))
    {
        return true;
    }

    for direction in QUEEN_DIRECTIONS {
        let mut distance = 0;
        let mut cursor = square.offset(direction);
        while let Some(current) = cursor {
            distance += 1;
            if let Some(piece) = position.piece_at(current) {
                if piece.color == attacker {
                    let hits = match piece.kind {
                        PieceKind::Queen => true,
                        PieceKind::Rook => is_orthogonal(direction),
                        PieceKind::Bishop => !is_orthogonal(direction),
                        PieceKind::King => distance == 1,
                        PieceKind::Pawn | PieceKind::Knight => false,
                    };
                    if hits {
                        return true;
                    }
                }
                break;
            }
            cursor = current.offset(direction);
        }
    }

    let knight = Piece::new(attacker, PieceKind::Knight);
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&offset| square.offset(offset))
        .any(|origin| position.piece_at(origin) == Some(knight))
}

/// Whether `color`'s king is attacked. A missing king is an invariant
/// violation and surfaces as `MissingKing`.
pub fn is_in_check(position: &Position, color: Color) -> ChessResult<bool> {
    let king = position
        .king_square(color)
        .ok_or(ChessError::MissingKing(color))?;
    Ok(is_square_attacked(position, king, color.opposite()))
}

/// Squares whose pieces may not move without re-checking king safety: the
/// king itself plus the first own piece met on each queen ray from the king.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSquares(u128);

impl WatchSquares {
    #[inline]
    fn insert(&mut self, square: Square) {
        self.0 |= 1u128 << square.index();
    }

    #[inline]
    pub fn contains(self, square: Square) -> bool {
        self.0 & (1u128 << square.index()) != 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

pub fn watch_squares(position: &Position, color: Color) -> ChessResult<WatchSquares> {
    let king = position
        .king_square(color)
        .ok_or(ChessError::MissingKing(color))?;

    let mut watch = WatchSquares::default();
    watch.insert(king);

    for direction in QUEEN_DIRECTIONS {
        let mut cursor = king.offset(direction);
        while let Some(current) = cursor {
            if let Some(piece) = position.piece_at(current) {
                if piece.color == color {
                    watch.insert(current);
                }
                break;
            }
            cursor = current.offset(direction);
        }
    }

    Ok(watch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::parse_square;

    fn sq(text: &str) -> Square {
        parse_square(text).expect("square should parse")
    }

    #[test]
    fn starting_position_has_no_check() {
        let position = Position::starting_position();
        assert!(!is_in_check(&position, Color::White).expect("king present"));
        assert!(!is_in_check(&position, Color::Black).expect("king present"));
    }

    #[test]
    fn missing_king_is_an_error() {
        let position = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            is_in_check(&position, Color::Black),
            Err(ChessError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn pawn_attacks_follow_pawn_direction() {
        let position =
            Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&position, sq("c4"), Color::Black));
        assert!(is_square_attacked(&position, sq("e4"), Color::Black));
        assert!(!is_square_attacked(&position, sq("c6"), Color::Black));
        assert!(!is_square_attacked(&position, sq("d4"), Color::Black));
    }

    #[test]
    fn first_blocker_stops_slider_rays() {
        let position =
            Position::from_fen("4k3/4r3/8/8/4N3/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!is_in_check(&position, Color::White).expect("king present"));
        assert!(is_square_attacked(&position, sq("e4"), Color::Black));
        assert!(is_square_attacked(&position, sq("a7"), Color::Black));
    }

    #[test]
    fn bishop_does_not_attack_orthogonally() {
        let position =
            Position::from_fen("4k3/8/8/8/8/8/4b3/K7 w - - 0 1").expect("FEN should parse");
        assert!(!is_square_attacked(&position, sq("e1"), Color::Black));
        assert!(is_square_attacked(&position, sq("d1"), Color::Black));
    }

    #[test]
    fn king_attacks_only_adjacent_squares() {
        let position =
            Position::from_fen("8/8/8/3k4/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&position, sq("e4"), Color::Black));
        assert!(!is_square_attacked(&position, sq("d3"), Color::Black));
    }

    #[test]
    fn knight_checks_are_detected() {
        let position =
            Position::from_fen("4k3/8/8/8/8/3n4/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_in_check(&position, Color::White).expect("king present"));
    }

    #[test]
    fn watch_squares_cover_king_and_first_own_blockers() {
        let position =
            Position::from_fen("4k3/8/8/8/1b6/5N2/3P4/R3K3 w - - 0 1").expect("FEN should parse");
        let watch = watch_squares(&position, Color::White).expect("king present");
        assert!(watch.contains(sq("e1")));
        assert!(watch.contains(sq("d2")));
        assert!(watch.contains(sq("a1")));
        assert!(!watch.contains(sq("f3")));
        assert_eq!(watch.len(), 3);
    }
}
