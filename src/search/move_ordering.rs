//! Heuristic move ordering for alpha-beta and quiescence.

use std::cmp::Reverse;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::piece_value;

pub const TT_MOVE_BONUS: i32 = 2_500_000;
pub const EN_PASSANT_BONUS: i32 = 8_000;
pub const CASTLE_BONUS: i32 = 2_000;
pub const KING_CASTLE_BONUS: i32 = 4_000;
pub const PROMOTION_BONUS: i32 = 9_000;
pub const CENTER_BONUS: i32 = 600;

/// Ordering key for `mv` in `game_state`; higher is searched first.
///
/// Captures use victim-first, cheapest-attacker tie-breaking. The en-passant
/// victim is not on the target square, so only the flat bonus applies.
pub fn score_move_for_ordering(game_state: &GameState, mv: Move, tt_best: Option<Move>) -> i32 {
    let board = &game_state.board;
    let Some(moving) = board.get(mv.from) else {
        return i32::MIN / 2;
    };

    let mut score = 0;
    if tt_best.is_some_and(|best| best.same_squares(mv)) {
        score += TT_MOVE_BONUS;
    }
    if let Some(victim) = board.get(mv.to) {
        score += piece_value(victim.kind) * 10 - piece_value(moving.kind) / 2;
    }
    if mv.is_en_passant() {
        score += EN_PASSANT_BONUS;
    }
    if mv.castle_side().is_some() {
        score += CASTLE_BONUS;
        if moving.kind == PieceKind::King {
            score += KING_CASTLE_BONUS;
        }
    }
    if moving.kind == PieceKind::Pawn && mv.to.row == moving.color.promotion_row() {
        score += PROMOTION_BONUS;
    }
    if (2..=5).contains(&mv.to.row) && (2..=5).contains(&mv.to.col) {
        score += CENTER_BONUS;
    }
    score
}

/// Sorts `moves` best-first. Equal keys keep their generation order.
pub fn order_moves(game_state: &GameState, moves: &mut [Move], tt_best: Option<Move>) {
    moves.sort_by_cached_key(|&mv| Reverse(score_move_for_ordering(game_state, mv, tt_best)));
}
