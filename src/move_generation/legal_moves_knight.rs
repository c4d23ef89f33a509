use crate::game_state::chess_rules::KNIGHT_OFFSETS;
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;

/// Single-step jumps shared by knights and kings: every target that is empty
/// or holds an enemy piece.
pub(crate) fn generate_step_moves(
    position: &Position,
    from: Square,
    color: Color,
    offsets: &[i8],
    out: &mut Vec<Move>,
) {
    for &offset in offsets {
        let Some(to) = from.offset(offset) else {
            continue;
        };
        match position.piece_at(to) {
            Some(target) if target.color == color => {}
            _ => out.push(Move::new(from, to)),
        }
    }
}

pub fn generate_knight_moves(position: &Position, from: Square, color: Color, out: &mut Vec<Move>) {
    generate_step_moves(position, from, color, &KNIGHT_OFFSETS, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_knight_has_two_moves() {
        let position =
            Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_knight_moves(&position, Square::A1, Color::White, &mut out);
        let text: Vec<String> = out.iter().map(ToString::to_string).collect();
        assert_eq!(text.len(), 2);
        assert!(text.contains(&"a1b3".to_owned()));
        assert!(text.contains(&"a1c2".to_owned()));
    }

    #[test]
    fn knight_skips_own_pieces_and_captures_enemies() {
        let position =
            Position::from_fen("4k3/8/8/8/8/1p6/2P5/N3K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_knight_moves(&position, Square::A1, Color::White, &mut out);
        let text: Vec<String> = out.iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["a1b3"]);
    }
}
