//! Legal move generation pipeline.
//!
//! Pseudo-legal candidates are played on a copied board and dropped when the
//! mover's own king ends up attacked. Everything that reaches the live game
//! or the search passes through here.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move, simulate_move};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::pseudo_moves::{generate_piece_moves, generate_pseudo_moves};
use crate::moves::move_descriptions::Move;

/// A legal move together with the position it leads to.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedMove {
    pub mv: Move,
    pub game_after_move: GameState,
}

/// Terminal classification of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress { in_check: bool },
    Checkmate { winner: Color },
    Stalemate,
}

impl GameOutcome {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress { .. })
    }
}

#[inline]
fn leaves_king_safe(game_state: &GameState, mv: Move) -> bool {
    let mover = game_state.side_to_move;
    !is_in_check(&simulate_move(&game_state.board, mv), mover)
}

/// Legal moves of the piece on `from`. Empty unless that piece belongs to
/// the side to move.
pub fn legal_moves_from(game_state: &GameState, from: Square) -> Vec<Move> {
    if game_state.board.color_on(from) != Some(game_state.side_to_move) {
        return Vec::new();
    }
    let mut pseudo = Vec::with_capacity(28);
    generate_piece_moves(game_state, from, &mut pseudo);
    pseudo.retain(|&mv| leaves_king_safe(game_state, mv));
    pseudo
}

pub fn legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut moves = generate_pseudo_moves(game_state);
    moves.retain(|&mv| leaves_king_safe(game_state, mv));
    moves
}

/// Legal captures, en passant and promotions only.
pub fn legal_noisy_moves(game_state: &GameState) -> Vec<Move> {
    let mut moves = generate_pseudo_moves(game_state);
    moves.retain(|&mv| mv.is_noisy() && leaves_king_safe(game_state, mv));
    moves
}

pub fn legal_successors(game_state: &GameState) -> Vec<GeneratedMove> {
    legal_moves(game_state)
        .into_iter()
        .map(|mv| GeneratedMove {
            mv,
            game_after_move: apply_move(game_state, mv),
        })
        .collect()
}

/// The legal move of the side to move going `from` → `to`, if there is one.
pub fn find_legal_move(game_state: &GameState, from: Square, to: Square) -> Option<Move> {
    legal_moves_from(game_state, from)
        .into_iter()
        .find(|mv| mv.to == to)
}

/// Stops at the first legal move found.
pub fn has_legal_move(game_state: &GameState) -> bool {
    let mut scratch = Vec::with_capacity(28);
    for (from, _) in game_state.board.pieces_of(game_state.side_to_move) {
        scratch.clear();
        generate_piece_moves(game_state, from, &mut scratch);
        if scratch.iter().any(|&mv| leaves_king_safe(game_state, mv)) {
            return true;
        }
    }
    false
}

pub fn game_outcome(game_state: &GameState) -> GameOutcome {
    let in_check = is_in_check(&game_state.board, game_state.side_to_move);
    if has_legal_move(game_state) {
        GameOutcome::InProgress { in_check }
    } else if in_check {
        GameOutcome::Checkmate {
            winner: game_state.side_to_move.opposite(),
        }
    } else {
        GameOutcome::Stalemate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::pseudo_moves::generate_pseudo_moves;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        let game = GameState::new_game();
        assert_eq!(legal_moves(&game).len(), 20);
        assert_eq!(legal_successors(&game).len(), 20);
        assert_eq!(game_outcome(&game), GameOutcome::InProgress { in_check: false });
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // Knight on e2 is pinned by the rook on e8.
        let state = parse_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(legal_moves_from(&state, sq("e2")).is_empty());
        assert!(legal_moves(&state).len() < generate_pseudo_moves(&state).len());
    }

    #[test]
    fn opponent_pieces_have_no_legal_moves() {
        let game = GameState::new_game();
        assert!(legal_moves_from(&game, sq("e7")).is_empty());
        assert!(find_legal_move(&game, sq("e7"), sq("e5")).is_none());
        assert!(find_legal_move(&game, sq("e2"), sq("e4")).is_some());
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let state = parse_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").expect("FEN should parse");
        let targets: Vec<Square> = legal_moves_from(&state, sq("e1"))
            .into_iter()
            .map(|mv| mv.to)
            .collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&sq("d1")) && targets.contains(&sq("f1")));
    }

    #[test]
    fn back_rank_mate_is_checkmate() {
        let state = parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("FEN should parse");
        assert_eq!(
            game_outcome(&state),
            GameOutcome::Checkmate {
                winner: Color::Light
            }
        );
    }

    #[test]
    fn lone_king_stalemate() {
        let state = parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert_eq!(game_outcome(&state), GameOutcome::Stalemate);
        assert!(legal_noisy_moves(&state).is_empty());
    }

    #[test]
    fn noisy_moves_are_a_subset() {
        let state = parse_fen("r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/8/PPP2PPP/RNBQKBNR b KQkq d3 0 3")
            .expect("FEN should parse");
        let all = legal_moves(&state);
        let noisy = legal_noisy_moves(&state);
        assert!(!noisy.is_empty());
        assert!(noisy.iter().all(|mv| mv.is_noisy() && all.contains(mv)));
    }
}
