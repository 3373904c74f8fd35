use crate::game_state::chess_rules::{KING_HOME_COL, KING_OFFSETS};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{is_in_check, is_square_attacked};
use crate::move_generation::pseudo_moves::generate_step_moves;
use crate::moves::move_descriptions::{Move, FLAG_CASTLE_KINGSIDE, FLAG_CASTLE_QUEENSIDE};

pub fn generate_king_moves(game_state: &GameState, from: Square, color: Color, out: &mut Vec<Move>) {
    generate_step_moves(&game_state.board, from, color, &KING_OFFSETS, out);
    generate_castling_moves(game_state, from, color, out);
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, color: Color, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let home_row = color.home_row();
    if king_from != Square::new(home_row, KING_HOME_COL) {
        return;
    }

    // Cannot castle out of check.
    if is_in_check(board, color) {
        return;
    }

    let enemy = color.opposite();
    for (side, flag) in [
        (CastleSide::King, FLAG_CASTLE_KINGSIDE),
        (CastleSide::Queen, FLAG_CASTLE_QUEENSIDE),
    ] {
        if !game_state.castling_rights.has(color, side) {
            continue;
        }

        let rook_sq = Square::new(home_row, side.rook_col());
        if board.get(rook_sq) != Some(Piece::new(color, PieceKind::Rook)) {
            continue;
        }

        let (low, high) = if side.rook_col() < KING_HOME_COL {
            (side.rook_col() + 1, KING_HOME_COL)
        } else {
            (KING_HOME_COL + 1, side.rook_col())
        };
        let between_empty = (low..high).all(|col| board.is_empty(Square::new(home_row, col)));
        if !between_empty {
            continue;
        }

        // Every square the king crosses or lands on must be safe.
        let target_col = side.king_target_col();
        let path_safe = path_cols(KING_HOME_COL, target_col)
            .all(|col| !is_square_attacked(board, Square::new(home_row, col), enemy));
        if !path_safe {
            continue;
        }

        out.push(Move::new(king_from, Square::new(home_row, target_col), flag));
    }
}

/// Columns strictly after `from` up to and including `to`.
fn path_cols(from: u8, to: u8) -> impl Iterator<Item = u8> {
    let (lo, hi) = if to > from { (from + 1, to) } else { (to, from - 1) };
    lo..=hi
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::chess_types::{CastleSide, Color};
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn castles(fen: &str, color: Color) -> Vec<CastleSide> {
        let state = parse_fen(fen).expect("FEN should parse");
        let from = algebraic_to_square(if color == Color::Light { "e1" } else { "e8" })
            .expect("square should parse");
        let mut out = Vec::new();
        generate_king_moves(&state, from, color, &mut out);
        out.into_iter().filter_map(|mv| mv.castle_side()).collect()
    }

    #[test]
    fn both_sides_available_when_clear() {
        let sides = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Color::Light);
        assert_eq!(sides, vec![CastleSide::King, CastleSide::Queen]);
        let sides = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", Color::Dark);
        assert_eq!(sides, vec![CastleSide::King, CastleSide::Queen]);
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // Black rook on f8 covers f1.
        let sides = castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1", Color::Light);
        assert_eq!(sides, vec![CastleSide::Queen]);
    }

    #[test]
    fn attacked_b_file_square_does_not_block_queenside() {
        // b1 is attacked but the king never crosses it.
        let sides = castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", Color::Light);
        assert_eq!(sides, vec![CastleSide::Queen]);
    }

    #[test]
    fn no_castling_out_of_check_or_without_rights() {
        assert!(castles("4k3/8/8/8/8/8/8/R3K2r w KQ - 0 1", Color::Light).is_empty());
        assert!(castles("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", Color::Light).is_empty());
    }

    #[test]
    fn occupied_between_square_blocks() {
        let sides = castles("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1", Color::Light);
        assert!(sides.is_empty());
    }
}
