//! FEN-to-Position parser.
//!
//! Accepts the four core fields (placement, side to move, castling, en
//! passant) with optional halfmove and fullmove counters. The counters are
//! validated but not stored. An empty string yields the start position.

use std::sync::Arc;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::search::zobrist::ZobristKeys;
use crate::utils::algebraic::parse_square;

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    parse_fen_with_keys(fen, ZobristKeys::shared_default())
}

pub fn parse_fen_with_keys(fen: &str, zobrist: Arc<ZobristKeys>) -> ChessResult<Position> {
    let fen = if fen.trim().is_empty() {
        STARTING_POSITION_FEN
    } else {
        fen
    };

    let fields: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&fields.len()) {
        return Err(ChessError::InvalidFen(format!(
            "expected 4 to 6 fields, found {}",
            fields.len()
        )));
    }

    let mut position = Position::new(zobrist);
    parse_board(fields[0], &mut position)?;
    let side_to_move = parse_side_to_move(fields[1])?;
    position.set_side_to_move(side_to_move);
    position.set_castling_rights(parse_castling_rights(fields[2])?);
    let en_passant = parse_en_passant_square(fields[3])?;
    if let Some(square) = en_passant {
        validate_en_passant_square(&position, side_to_move, square)?;
    }
    position.set_en_passant_square(en_passant);

    for counter in &fields[4..] {
        counter
            .parse::<u32>()
            .map_err(|_| ChessError::InvalidFen(format!("invalid move counter '{counter}'")))?;
    }

    position.recompute_king_squares();
    position.recompute_hash();
    position.recompute_evaluation();
    Ok(position)
}

fn parse_board(board_part: &str, position: &mut Position) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen("board layout must contain 8 ranks".to_owned()));
    }

    let mut kings = [0usize; 2];
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessError::InvalidFen(format!("rank {} overflows", rank + 1)));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| ChessError::InvalidFen(format!("invalid piece character '{ch}'")))?;
            let square = Square::from_file_rank(file, rank)
                .ok_or_else(|| ChessError::InvalidFen(format!("rank {} overflows", rank + 1)))?;
            if piece.kind == PieceKind::King {
                kings[piece.color.index()] += 1;
            }
            position.put_piece(square, Some(piece));
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank {} does not sum to 8 files",
                rank + 1
            )));
        }
    }

    if kings.iter().any(|&count| count > 1) {
        return Err(ChessError::InvalidFen("more than one king of a color".to_owned()));
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessError::InvalidFen(format!("invalid side-to-move field '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.white_king_side = true,
            'Q' => rights.white_queen_side = true,
            'k' => rights.black_king_side = true,
            'q' => rights.black_queen_side = true,
            _ => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid castling rights character '{ch}'"
                )))
            }
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    parse_square(en_passant_part).map(Some).map_err(|_| {
        ChessError::InvalidFen(format!("invalid en-passant square '{en_passant_part}'"))
    })
}

/// The target must be the square an enemy pawn just skipped with a double
/// step: that pawn stands in front of it and both skipped squares are empty.
fn validate_en_passant_square(position: &Position, side: Color, square: Square) -> ChessResult<()> {
    let expected_rank = match side {
        Color::White => 5,
        Color::Black => 2,
    };
    let pusher = Piece::new(side.opposite(), PieceKind::Pawn);
    let pawn_square = square.offset(-side.forward());
    let origin_square = square.offset(side.forward());

    let consistent = square.rank() == expected_rank
        && position.piece_at(square).is_none()
        && pawn_square.is_some_and(|sq| position.piece_at(sq) == Some(pusher))
        && origin_square.is_some_and(|sq| position.piece_at(sq).is_none());

    if consistent {
        Ok(())
    } else {
        Err(ChessError::InvalidFen(format!(
            "en-passant square {square} does not follow a {} double pawn step",
            side.opposite()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_starting_fen() {
        let position = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling_rights(), CastlingRights::ALL);
        assert_eq!(position.king_square(Color::White), Some(Square::E1));
        assert_eq!(position.king_square(Color::Black), Some(Square::E8));
        assert_eq!(
            position.piece_at(Square::D8),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
    }

    #[test]
    fn empty_string_means_start_position() {
        let from_empty = parse_fen("").expect("empty FEN should parse");
        assert!(from_empty.history_agnostic_eq(&Position::starting_position()));
    }

    #[test]
    fn four_field_fen_is_accepted() {
        let position =
            parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").expect("4-field FEN should parse");
        assert_eq!(position.en_passant_square().map(|s| s.to_string()), Some("d6".to_owned()));
    }

    #[test]
    fn malformed_fen_is_rejected() {
        for bad in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - zero 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBKKBNR w - - 0 1",
        ] {
            assert!(matches!(parse_fen(bad), Err(ChessError::InvalidFen(_))), "{bad}");
        }
    }

    #[test]
    fn en_passant_target_must_follow_a_double_step() {
        for bad in [
            // no black pawn behind d6
            "4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1",
            // rank 3 target with white to move
            "4k3/8/8/8/8/8/3PP3/4K3 w - e3 0 1",
            // rank 6 target with black to move
            "4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1",
            // origin square of the double step occupied
            "3nk3/3p4/8/3pP3/8/8/8/4K3 w - d6 0 1",
            // target square occupied
            "4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1",
        ] {
            assert!(matches!(parse_fen(bad), Err(ChessError::InvalidFen(_))), "{bad}");
        }

        let black_to_move = parse_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1")
            .expect("valid en-passant FEN should parse");
        let d3 = Square::from_file_rank(3, 2).expect("d3");
        assert_eq!(black_to_move.en_passant_square(), Some(d3));
    }

    #[test]
    fn explicit_keys_are_shared_with_the_position() {
        let keys = Arc::new(ZobristKeys::from_seed(42));
        let position = parse_fen_with_keys("", Arc::clone(&keys)).expect("FEN should parse");
        assert_eq!(position.zobrist_keys(), keys.as_ref());
        assert_ne!(position.hash(), Position::starting_position().hash());
    }
}
