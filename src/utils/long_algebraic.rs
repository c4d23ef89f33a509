//! Long algebraic move text (`e2e4`, `e7e8q`), the move form used by UCI.
//!
//! Parsing is board-independent since `Move` carries no piece information.
//! `parse_legal_move` additionally checks the move against a position.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_generator::get_legal_moves;
use crate::utils::algebraic::parse_square;

pub fn parse_move(text: &str) -> ChessResult<Move> {
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::InvalidMoveText(text.to_owned()));
    }

    let invalid = |_| ChessError::InvalidMoveText(text.to_owned());
    let from = parse_square(&text[0..2]).map_err(invalid)?;
    let to = parse_square(&text[2..4]).map_err(invalid)?;

    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch @ ('q' | 'r' | 'b' | 'n')) => PieceKind::from_letter(ch),
        Some(_) => return Err(ChessError::InvalidMoveText(text.to_owned())),
    };

    Ok(Move { from, to, promotion })
}

#[inline]
pub fn format_move(mv: Move) -> String {
    mv.to_string()
}

/// Parse `text` and require it to be one of the legal moves in `position`.
pub fn parse_legal_move(position: &mut Position, text: &str) -> ChessResult<Move> {
    let mv = parse_move(text)?;
    if get_legal_moves(position)?.contains(&mv) {
        Ok(mv)
    } else {
        Err(ChessError::invalid_move(mv, "not legal in this position"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_promotion_moves() {
        let mv = parse_move("e2e4").expect("e2e4 should parse");
        assert_eq!(mv.from.to_string(), "e2");
        assert_eq!(mv.to.to_string(), "e4");
        assert_eq!(mv.promotion, None);

        let promo = parse_move("a7a8n").expect("a7a8n should parse");
        assert_eq!(promo.promotion, Some(PieceKind::Knight));
        assert_eq!(format_move(promo), "a7a8n");
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", "e2", "e2e", "e2e4qq", "e2e9", "z2e4", "e7e8k", "e7e8Q", "é2e4"] {
            assert_eq!(
                parse_move(bad),
                Err(ChessError::InvalidMoveText(bad.to_owned())),
                "{bad}"
            );
        }
    }

    #[test]
    fn legal_move_check_uses_position() {
        let mut position = Position::starting_position();
        assert!(parse_legal_move(&mut position, "g1f3").is_ok());
        assert!(matches!(
            parse_legal_move(&mut position, "e2e5"),
            Err(ChessError::InvalidMove { .. })
        ));
    }
}
