//! Perft: exhaustive legal-move tree counts for move generator validation.
//!
//! Leaf statistics follow the usual perft tables: captures (en passant
//! included), en-passant captures, castles, promotions and checks counted
//! on the moves that reach the final ply.

use log::debug;

use crate::errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_apply::{is_castling_move, make_move, undo_last_move};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::get_legal_moves;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    pub fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

pub fn perft(position: &mut Position, depth: u8) -> ChessResult<PerftCounts> {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return Ok(counts);
    }
    perft_recurse(position, depth, &mut counts)?;
    Ok(counts)
}

/// Node count below each root move, in generation order.
pub fn perft_divide(position: &mut Position, depth: u8) -> ChessResult<Vec<(Move, u64)>> {
    let mut divide = Vec::new();
    if depth == 0 {
        return Ok(divide);
    }

    for mv in get_legal_moves(position)? {
        make_move(position, mv)?;
        let below = perft(position, depth - 1);
        undo_last_move(position)?;
        let nodes = below?.nodes;
        debug!("perft divide {mv}: {nodes}");
        divide.push((mv, nodes));
    }

    Ok(divide)
}

fn perft_recurse(position: &mut Position, depth: u8, counts: &mut PerftCounts) -> ChessResult<()> {
    let moves = get_legal_moves(position)?;

    if depth == 1 {
        for mv in moves {
            count_leaf(position, mv, counts)?;
        }
        return Ok(());
    }

    for mv in moves {
        make_move(position, mv)?;
        let result = perft_recurse(position, depth - 1, counts);
        undo_last_move(position)?;
        result?;
    }

    Ok(())
}

fn count_leaf(position: &mut Position, mv: Move, counts: &mut PerftCounts) -> ChessResult<()> {
    counts.nodes += 1;

    let Some(moved) = position.piece_at(mv.from) else {
        return Ok(());
    };
    let en_passant =
        moved.kind == PieceKind::Pawn && position.en_passant_square() == Some(mv.to);

    if position.piece_at(mv.to).is_some() || en_passant {
        counts.captures += 1;
    }
    if en_passant {
        counts.en_passant += 1;
    }
    if is_castling_move(moved, mv) {
        counts.castles += 1;
    }
    if mv.promotion.is_some() {
        counts.promotions += 1;
    }

    make_move(position, mv)?;
    let gives_check = is_in_check(position, position.side_to_move());
    undo_last_move(position)?;
    if gives_check? {
        counts.checks += 1;
    }

    Ok(())
}
