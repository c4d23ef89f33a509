//! Per-move time allocation.
//!
//! The protocol layer passes raw clock data (`wtime/btime/winc/binc/
//! movestogo/movetime`); this module decides the search budget.

use std::time::Duration;

use crate::game_state::chess_types::Color;

/// Moves assumed to remain when the controller sends no `movestogo`.
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
    pub infinite: bool,
}

/// Wall-clock budget for the side to move, or `None` to search until
/// stopped or the depth limit is reached.
pub fn resolve_time_budget(side_to_move: Color, params: &GoParams) -> Option<Duration> {
    if params.infinite {
        return None;
    }
    if let Some(movetime) = params.movetime_ms {
        return Some(Duration::from_millis(movetime.max(1)));
    }

    let (remaining, increment) = match side_to_move {
        Color::White => (params.wtime_ms, params.winc_ms),
        Color::Black => (params.btime_ms, params.binc_ms),
    };
    let remaining = remaining?;
    let moves_to_go = params
        .movestogo
        .map_or(DEFAULT_MOVES_TO_GO, |mtg| u64::from(mtg.max(1)));

    let base = remaining / moves_to_go;
    let increment_bonus = increment.unwrap_or(0).saturating_mul(3) / 4;
    let ceiling = (remaining / 4).max(1);
    let budget = base.saturating_add(increment_bonus).clamp(1, ceiling);

    Some(Duration::from_millis(budget))
}
