//! In-place move application and reversal.
//!
//! `make_move` mutates the position and pushes a `MoveDelta`; `undo_last_move`
//! pops it and restores the exact prior state. Hash and evaluation
//! accumulators are updated incrementally on the way forward and restored
//! verbatim from the snapshot on the way back.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::PROMOTION_KINDS;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::game_state::undo_state::MoveDelta;

/// Rook relocation for a castling king move, keyed by the king destination.
#[inline]
pub(crate) fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

#[inline]
pub(crate) fn is_castling_move(piece: Piece, mv: Move) -> bool {
    piece.kind == PieceKind::King && mv.rank_distance() == 0 && mv.file_distance() == 2
}

/// Square of the pawn an en-passant capture removes, when `mv` by `piece`
/// is a diagonal pawn step onto the en-passant target.
#[inline]
pub(crate) fn en_passant_victim(
    piece: Piece,
    mv: Move,
    en_passant: Option<Square>,
) -> Option<Square> {
    if piece.kind == PieceKind::Pawn && en_passant == Some(mv.to) && mv.file_distance() == 1 {
        mv.to.offset(-piece.color.forward())
    } else {
        None
    }
}

#[inline]
fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

fn validate_move(position: &Position, mv: Move) -> ChessResult<Piece> {
    let piece = position
        .piece_at(mv.from)
        .ok_or_else(|| ChessError::invalid_move(mv, "no piece on origin square"))?;

    if piece.color != position.side_to_move() {
        return Err(ChessError::invalid_move(
            mv,
            format!("piece on origin belongs to {}", piece.color),
        ));
    }
    if mv.from == mv.to {
        return Err(ChessError::invalid_move(mv, "origin equals destination"));
    }
    if let Some(target) = position.piece_at(mv.to) {
        if target.color == piece.color {
            return Err(ChessError::invalid_move(mv, "destination holds own piece"));
        }
    }

    let reaches_last_rank =
        piece.kind == PieceKind::Pawn && mv.to.rank() == promotion_rank(piece.color);
    match mv.promotion {
        Some(kind) if !reaches_last_rank || !PROMOTION_KINDS.contains(&kind) => {
            return Err(ChessError::invalid_move(mv, "impossible promotion"));
        }
        None if reaches_last_rank => {
            return Err(ChessError::invalid_move(mv, "pawn on last rank needs a promotion"));
        }
        _ => {}
    }

    if let Some(victim) = en_passant_victim(piece, mv, position.en_passant_square()) {
        if position.piece_at(victim) != Some(Piece::new(piece.color.opposite(), PieceKind::Pawn)) {
            return Err(ChessError::invalid_move(mv, "no pawn to take en passant"));
        }
    }

    if is_castling_move(piece, mv) {
        let rook = Piece::new(piece.color, PieceKind::Rook);
        let has_rook = castling_rook_squares(mv.to)
            .is_some_and(|(rook_from, _)| position.piece_at(rook_from) == Some(rook));
        if !has_rook {
            return Err(ChessError::invalid_move(mv, "castling without a rook in the corner"));
        }
    }

    Ok(piece)
}

/// Apply `mv` to `position` in place.
///
/// The move must be legal for the side to move; generator output is the only
/// sanctioned input during search. Malformed moves are rejected before any
/// state changes.
pub fn make_move(position: &mut Position, mv: Move) -> ChessResult<()> {
    let moved = validate_move(position, mv)?;
    let mover = moved.color;

    position.history.push(MoveDelta {
        mv,
        captured_piece: position.piece_at(mv.to),
        prev_castling_rights: position.castling_rights,
        prev_en_passant_square: position.en_passant_square,
        prev_hash: position.hash,
        prev_middlegame_score: position.middlegame_score,
        prev_endgame_score: position.endgame_score,
        prev_game_phase: position.game_phase,
    });

    if let Some(victim) = en_passant_victim(moved, mv, position.en_passant_square) {
        position.set_square(victim, None);
    }

    if is_castling_move(moved, mv) {
        if let Some((rook_from, rook_to)) = castling_rook_squares(mv.to) {
            position.set_square(rook_from, None);
            position.set_square(rook_to, Some(Piece::new(mover, PieceKind::Rook)));
        }
    }

    let mut rights = position.castling_rights;
    if moved.kind == PieceKind::King {
        rights.clear_color(mover);
    }
    rights.clear_corner(mv.from);
    rights.clear_corner(mv.to);

    let next_en_passant = if moved.kind == PieceKind::Pawn && mv.rank_distance() == 2 {
        mv.from.offset(mover.forward())
    } else {
        None
    };

    let state_keys = {
        let keys = position.zobrist_keys();
        keys.castling(position.castling_rights)
            ^ keys.castling(rights)
            ^ keys.en_passant(position.en_passant_square)
            ^ keys.en_passant(next_en_passant)
            ^ keys.side_to_move()
    };
    position.hash ^= state_keys;
    position.castling_rights = rights;
    position.en_passant_square = next_en_passant;

    let placed = match mv.promotion {
        Some(kind) => Piece::new(mover, kind),
        None => moved,
    };
    position.set_square(mv.from, None);
    position.set_square(mv.to, Some(placed));

    if moved.kind == PieceKind::King {
        position.king_squares[mover.index()] = Some(mv.to);
    }

    position.side_to_move = mover.opposite();
    Ok(())
}

/// Reverse the most recent `make_move`, returning the move that was undone.
pub fn undo_last_move(position: &mut Position) -> ChessResult<Move> {
    let delta = position.history.pop().ok_or(ChessError::EmptyHistory)?;
    let mv = delta.mv;
    let mover = position.side_to_move.opposite();

    let placed = position
        .piece_at(mv.to)
        .ok_or_else(|| ChessError::invalid_move(mv, "destination empty during undo"))?;
    let original = if mv.promotion.is_some() {
        Piece::new(mover, PieceKind::Pawn)
    } else {
        placed
    };

    position.put_piece(mv.from, Some(original));
    position.put_piece(mv.to, delta.captured_piece);

    if let Some(victim) = en_passant_victim(original, mv, delta.prev_en_passant_square) {
        position.put_piece(victim, Some(Piece::new(mover.opposite(), PieceKind::Pawn)));
    }

    if is_castling_move(original, mv) {
        if let Some((rook_from, rook_to)) = castling_rook_squares(mv.to) {
            position.put_piece(rook_to, None);
            position.put_piece(rook_from, Some(Piece::new(mover, PieceKind::Rook)));
        }
    }

    if original.kind == PieceKind::King {
        position.king_squares[mover.index()] = Some(mv.from);
    }

    position.side_to_move = mover;
    position.castling_rights = delta.prev_castling_rights;
    position.en_passant_square = delta.prev_en_passant_square;
    position.hash = delta.prev_hash;
    position.middlegame_score = delta.prev_middlegame_score;
    position.endgame_score = delta.prev_endgame_score;
    position.game_phase = delta.prev_game_phase;

    Ok(mv)
}
