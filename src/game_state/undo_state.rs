use crate::game_state::chess_types::*;

/// Single undo record pushed by `make_move` and consumed by `undo_last_move`.
///
/// Only the directly captured piece is stored; an en-passant victim is
/// rebuilt from the move shape, and a promoted piece always reverts to a pawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDelta {
    pub mv: Move,
    pub captured_piece: Option<Piece>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,

    pub prev_hash: u64,
    pub prev_middlegame_score: i32,
    pub prev_endgame_score: i32,
    pub prev_game_phase: i32,
}
