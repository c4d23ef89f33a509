//! Full legal move generation pipeline.
//!
//! Generates pseudo-legal moves piece by piece, then filters them. Only moves
//! that could expose the king are simulated with make/check/undo: every move
//! while in check, moves of the king or of a piece standing on a king ray
//! (watch squares), and anything landing on the en-passant target. The rest
//! are legal by construction.

use crate::errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{is_castling_move, make_move, undo_last_move};
use crate::move_generation::legal_move_checks::{is_in_check, is_square_attacked, watch_squares};
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_slider::{generate_slider_moves, slider_directions};

/// Every pseudo-legal move for the side to move, in board order.
pub fn generate_pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let side = position.side_to_move();
    let mut pseudo = Vec::with_capacity(64);

    for from in Square::all() {
        let Some(piece) = position.piece_at(from) else {
            continue;
        };
        if piece.color != side {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(position, from, side, &mut pseudo),
            PieceKind::Knight => generate_knight_moves(position, from, side, &mut pseudo),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                let directions = slider_directions(piece.kind);
                generate_slider_moves(position, from, side, directions, &mut pseudo)
            }
            PieceKind::King => generate_king_moves(position, from, side, &mut pseudo),
        }
    }

    pseudo
}

/// Legal moves for the side to move.
///
/// The position is mutated while candidate moves are simulated but is
/// restored exactly, history length included, before returning. An empty
/// result means checkmate or stalemate; telling them apart is left to the
/// caller via `is_in_check`.
pub fn get_legal_moves(position: &mut Position) -> ChessResult<Vec<Move>> {
    let side = position.side_to_move();
    let enemy = side.opposite();
    let in_check = is_in_check(position, side)?;
    let watch = watch_squares(position, side)?;
    let en_passant = position.en_passant_square();

    let pseudo = generate_pseudo_legal_moves(position);
    let mut legal = Vec::with_capacity(pseudo.len());

    for mv in pseudo {
        let castling = position
            .piece_at(mv.from)
            .is_some_and(|piece| is_castling_move(piece, mv));

        if castling {
            if in_check {
                continue;
            }
            let passed_file = (mv.from.file() + mv.to.file()) / 2;
            let passed = Square::from_file_rank(passed_file, mv.from.rank());
            if passed.is_some_and(|sq| is_square_attacked(position, sq, enemy)) {
                continue;
            }
        }

        let needs_simulation = in_check || watch.contains(mv.from) || en_passant == Some(mv.to);
        if !needs_simulation {
            legal.push(mv);
            continue;
        }

        make_move(position, mv)?;
        let exposes_king = is_in_check(position, side);
        undo_last_move(position)?;
        if !exposes_king? {
            legal.push(mv);
        }
    }

    Ok(legal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal_text(fen: &str) -> Vec<String> {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let mut moves: Vec<String> = get_legal_moves(&mut position)
            .expect("move generation should succeed")
            .iter()
            .map(ToString::to_string)
            .collect();
        moves.sort();
        moves
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut position = Position::starting_position();
        let before = position.clone();
        let moves = get_legal_moves(&mut position).expect("move generation should succeed");
        assert_eq!(moves.len(), 20);
        assert_eq!(position, before);
    }

    #[test]
    fn generation_restores_position_and_history() {
        let mut position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        crate::move_generation::legal_move_apply::make_move(
            &mut position,
            crate::utils::long_algebraic::parse_move("e1d1").expect("move text should parse"),
        )
        .expect("king move should apply");
        let before = position.clone();
        get_legal_moves(&mut position).expect("move generation should succeed");
        assert_eq!(position, before);
        assert_eq!(position.history().len(), 1);
    }

    #[test]
    fn stray_en_passant_target_does_not_corrupt_position() {
        let cases = [
            ("4k3/8/8/4P3/8/8/8/4K3 w - - 0 1", "d6", "e5d6"),
            ("4k3/8/8/8/8/8/3PP3/4K3 w - - 0 1", "e3", "d2e3"),
        ];
        for (fen, target, phantom) in cases {
            let mut position = Position::from_fen(fen).expect("FEN should parse");
            let target = crate::utils::algebraic::parse_square(target).expect("square");
            position.set_en_passant_square(Some(target));
            position.recompute_hash();
            let before = position.clone();

            let moves = get_legal_moves(&mut position).expect("move generation should succeed");
            assert_eq!(position, before, "{fen}");
            assert!(moves.iter().all(|mv| mv.to_string() != phantom), "{fen}");

            for mv in moves {
                make_move(&mut position, mv).expect("legal move should apply");
                undo_last_move(&mut position).expect("undo should succeed");
                assert_eq!(position, before, "{fen} {mv}");
                assert_eq!(
                    position.hash(),
                    crate::search::zobrist::compute_zobrist_key(&position),
                    "{fen} {mv}"
                );
            }
        }
    }

    #[test]
    fn en_passant_is_the_only_escape_from_pawn_check() {
        let moves = legal_text("8/8/Q7/2k5/3PpN2/2P5/8/7K b - d3 0 1");
        assert_eq!(moves, vec!["e4d3"]);
    }

    #[test]
    fn en_passant_exposing_king_on_rank_is_illegal() {
        let moves = legal_text("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
        assert!(!moves.contains(&"b5c6".to_owned()));
        assert!(moves.contains(&"b5b6".to_owned()));
    }

    #[test]
    fn castling_through_attacked_square_is_illegal() {
        let moves = legal_text("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_owned()));
        assert!(moves.contains(&"e1c1".to_owned()));
    }

    #[test]
    fn castling_out_of_check_is_illegal() {
        let moves = legal_text("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_owned()));
        assert!(!moves.contains(&"e1c1".to_owned()));
    }

    #[test]
    fn castling_into_attacked_square_is_illegal() {
        let moves = legal_text("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_owned()));
        assert!(moves.contains(&"e1c1".to_owned()));
    }

    #[test]
    fn pinned_rook_stays_on_pin_ray() {
        let moves = legal_text("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
        let rook_moves: Vec<&String> = moves.iter().filter(|m| m.starts_with("e2")).collect();
        assert_eq!(rook_moves.len(), 5);
        assert!(rook_moves.iter().all(|m| m.as_bytes()[2] == b'e'));
    }

    #[test]
    fn pinned_knight_cannot_move() {
        let moves = legal_text("4k3/8/8/b7/8/8/3N4/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| !m.starts_with("d2")));
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        assert_eq!(legal_text("6k1/5Q2/6K1/8/8/8/8/8 b - - 0 1"), vec!["g8h8"]);
        assert!(legal_text("6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1").is_empty());
        assert!(legal_text("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").is_empty());
    }

    #[test]
    fn missing_king_is_reported() {
        let mut position =
            Position::from_fen("8/8/8/8/8/8/4P3/8 w - - 0 1").expect("FEN should parse");
        assert!(get_legal_moves(&mut position).is_err());
    }
}
