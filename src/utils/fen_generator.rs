use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

/// Export the position as FEN. Move counters are not tracked, so the last
/// two fields are always `0 1`.
pub fn generate_fen(position: &Position) -> String {
    let board = generate_board_field(position);
    let side_to_move = match position.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(position.castling_rights());
    let en_passant = position
        .en_passant_square()
        .map_or_else(|| "-".to_owned(), |sq| sq.to_string());

    format!("{board} {side_to_move} {castling} {en_passant} 0 1")
}

fn generate_board_field(position: &Position) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let piece = Square::from_file_rank(file, rank).and_then(|sq| position.piece_at(sq));
            if let Some(piece) = piece {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let field: String = rights
        .as_array()
        .iter()
        .zip(['K', 'Q', 'k', 'q'])
        .filter(|(set, _)| **set)
        .map(|(_, ch)| ch)
        .collect();

    if field.is_empty() {
        "-".to_owned()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::position::Position;
    use crate::move_generation::legal_move_apply::make_move;
    use crate::utils::long_algebraic::parse_move;

    #[test]
    fn starting_position_exports_canonical_fen() {
        assert_eq!(generate_fen(&Position::starting_position()), STARTING_POSITION_FEN);
    }

    #[test]
    fn export_tracks_rights_and_en_passant() {
        let mut position = Position::starting_position();
        for text in ["e2e4", "e7e6", "e1e2", "d7d5"] {
            make_move(&mut position, parse_move(text).expect("move text should parse"))
                .expect("move should apply");
        }
        assert_eq!(
            generate_fen(&position),
            "rnbqkbnr/ppp2ppp/4p3/3p4/4P3/8/PPPPKPPP/RNBQ1BNR w kq d6 0 1"
        );
    }

    #[test]
    fn empty_board_has_no_rights() {
        assert_eq!(generate_fen(&Position::empty()), "8/8/8/8/8/8/8/8 w - - 0 1");
    }
}
