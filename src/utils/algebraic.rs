//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and 0x88
//! squares for the FEN, move-text and UCI components.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Square;

/// Parse a coordinate such as `"e4"`.
#[inline]
pub fn parse_square(text: &str) -> ChessResult<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(text.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(text.to_owned()));
    }

    Square::from_file_rank(file - b'a', rank - b'1')
        .ok_or_else(|| ChessError::InvalidSquare(text.to_owned()))
}
