use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;

/// Board after playing `mv`, with no other bookkeeping.
///
/// Handles the en-passant victim, the castling rook and auto-promotion. The
/// legality filter uses this to test king safety before a move is accepted.
pub fn simulate_move(board: &Board, mv: Move) -> Board {
    let mut next = *board;
    let Some(mut piece) = next.take(mv.from) else {
        return next;
    };

    if mv.is_en_passant() {
        // The captured pawn sits beside the mover, on the origin row.
        next.take(Square::new(mv.from.row, mv.to.col));
    }

    if let Some(side) = mv.castle_side() {
        let row = mv.from.row;
        if let Some(rook) = next.take(Square::new(row, side.rook_col())) {
            next.set(Square::new(row, side.rook_target_col()), Some(rook));
        }
    }

    if piece.kind == PieceKind::Pawn && mv.to.row == piece.color.promotion_row() {
        piece.kind = AUTO_PROMOTE_TO;
    }

    next.set(mv.to, Some(piece));
    next
}

/// Successor state after a move that already passed the legality filter.
pub fn apply_move(game_state: &GameState, mv: Move) -> GameState {
    let moving_color = game_state.side_to_move;
    let moved_kind = game_state.board.get(mv.from).map(|p| p.kind);

    let mut next = *game_state;
    next.board = simulate_move(&game_state.board, mv);

    update_castling_rights(&mut next.castling_rights, moving_color, moved_kind, mv);

    next.en_passant_square = if mv.is_double_pawn_push() {
        Some(Square::new((mv.from.row + mv.to.row) / 2, mv.from.col))
    } else {
        None
    };

    if moved_kind == Some(PieceKind::Pawn) || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = moving_color.opposite();
    next
}

fn update_castling_rights(
    rights: &mut CastlingRights,
    moving_color: Color,
    moved_kind: Option<PieceKind>,
    mv: Move,
) {
    match moved_kind {
        Some(PieceKind::King) => rights.clear_color(moving_color),
        Some(PieceKind::Rook) => clear_corner(rights, moving_color, mv.from),
        _ => {}
    }

    if mv.is_capture() {
        clear_corner(rights, moving_color.opposite(), mv.to);
    }
}

/// Clears `color`'s right tied to `square` if it is one of that color's
/// rook corners.
fn clear_corner(rights: &mut CastlingRights, color: Color, square: Square) {
    if square.row != color.home_row() {
        return;
    }
    for side in [CastleSide::King, CastleSide::Queen] {
        if square.col == side.rook_col() {
            rights.clear(color, side);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::move_descriptions::*;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_generator::generate_fen;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    fn state(fen: &str) -> GameState {
        parse_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn double_push_sets_en_passant_and_flips_side() {
        let next = apply_move(
            &GameState::new_game(),
            Move::new(sq("e2"), sq("e4"), FLAG_DOUBLE_PAWN_PUSH),
        );
        assert_eq!(
            generate_fen(&next),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let before = state("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let next = apply_move(
            &before,
            Move::new(sq("e5"), sq("d6"), FLAG_CAPTURE | FLAG_EN_PASSANT),
        );
        assert_eq!(generate_fen(&next), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let before = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
        let next = apply_move(&before, Move::new(sq("e1"), sq("g1"), FLAG_CASTLE_KINGSIDE));
        assert_eq!(generate_fen(&next), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");

        let next = apply_move(&next, Move::new(sq("e8"), sq("c8"), FLAG_CASTLE_QUEENSIDE));
        assert_eq!(generate_fen(&next), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 11");
    }

    #[test]
    fn rook_move_and_corner_capture_clear_single_rights() {
        let before = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = apply_move(&before, Move::quiet(sq("a1"), sq("a2")));
        assert_eq!(next.castling_rights.bits(), 0b1101);

        let next = apply_move(&before, Move::new(sq("h1"), sq("h8"), FLAG_CAPTURE));
        assert_eq!(
            next.castling_rights,
            CastlingRights {
                light_queenside: true,
                dark_queenside: true,
                ..CastlingRights::NONE
            }
        );
    }

    #[test]
    fn pawn_reaching_last_rank_auto_promotes() {
        let before = state("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let next = apply_move(&before, Move::new(sq("b7"), sq("b8"), FLAG_PROMOTION));
        assert_eq!(
            next.board.get(sq("b8")),
            Some(Piece::new(Color::Light, AUTO_PROMOTE_TO))
        );
    }

    #[test]
    fn original_state_is_untouched() {
        let before = GameState::new_game();
        let _ = apply_move(&before, Move::quiet(sq("g1"), sq("f3")));
        assert_eq!(before, GameState::new_game());
    }
}
