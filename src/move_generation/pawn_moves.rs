use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{
    Move, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT, FLAG_PROMOTION,
};

pub fn generate_pawn_moves(game_state: &GameState, from: Square, color: Color, out: &mut Vec<Move>) {
    let board = &game_state.board;
    let dir = color.pawn_direction();
    let promotion_flag = |to: Square| {
        if to.row == color.promotion_row() {
            FLAG_PROMOTION
        } else {
            0
        }
    };

    if let Some(one_step) = from.offset(dir, 0) {
        if board.is_empty(one_step) {
            out.push(Move::new(from, one_step, promotion_flag(one_step)));

            if from.row == color.pawn_start_row() {
                if let Some(two_step) = one_step.offset(dir, 0) {
                    if board.is_empty(two_step) {
                        out.push(Move::new(from, two_step, FLAG_DOUBLE_PAWN_PUSH));
                    }
                }
            }
        }
    }

    for d_col in [-1i8, 1] {
        let Some(to) = from.offset(dir, d_col) else {
            continue;
        };

        match board.get(to) {
            Some(target) if target.color != color => {
                out.push(Move::new(from, to, FLAG_CAPTURE | promotion_flag(to)));
            }
            None if game_state.en_passant_square == Some(to) => {
                out.push(Move::new(from, to, FLAG_CAPTURE | FLAG_EN_PASSANT));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::Color;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn targets(fen: &str, from: &str, color: Color) -> Vec<(String, u8)> {
        let state = parse_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        let from = algebraic_to_square(from).expect("square should parse");
        generate_pawn_moves(&state, from, color, &mut out);
        out.into_iter()
            .map(|mv| (crate::utils::algebraic::square_to_algebraic(mv.to), mv.flags))
            .collect()
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_push() {
        let moves = targets(
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            "e2",
            Color::Light,
        );
        let squares: Vec<&str> = moves.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(squares, vec!["e3", "e4"]);
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let moves = targets("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2", Color::Light);
        assert!(moves.is_empty());
    }

    #[test]
    fn en_passant_is_flagged_capture() {
        let moves = targets(
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "e5",
            Color::Light,
        );
        let ep = moves
            .iter()
            .find(|(s, _)| s == "f6")
            .expect("en passant capture should be generated");
        assert_ne!(ep.1 & crate::moves::move_descriptions::FLAG_EN_PASSANT, 0);
        assert!(!moves.iter().any(|(s, _)| s == "d6"));
    }

    #[test]
    fn last_rank_push_is_promotion() {
        let moves = targets("8/1P2k3/8/8/8/8/8/4K3 w - - 0 1", "b7", Color::Light);
        assert_eq!(moves.len(), 1);
        assert_ne!(moves[0].1 & crate::moves::move_descriptions::FLAG_PROMOTION, 0);
    }
}
