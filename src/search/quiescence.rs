//! Capture-only extension below the main search horizon.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::legal_noisy_moves;
use crate::search::board_scoring::BoardScorer;
use crate::search::iterative_deepening::SearchContext;
use crate::search::move_ordering::order_moves;
use crate::search::transposition_table::TTEntry;
use crate::search::zobrist::compute_zobrist_key;

/// Deepest capture sequence followed past the horizon.
pub const QSEARCH_MAX_PLY: u8 = 6;

/// Xored into the position key so quiescence entries never collide with
/// main-search entries for the same position.
pub const QSEARCH_SALT: u64 = 0x5153_4541_5243_4821;

/// Stand-pat search over captures, en passant and promotions.
///
/// Checkmate is not detected here; the main search checks for it before
/// dropping into quiescence.
pub fn quiescence<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &GameState,
    mut alpha: i32,
    beta: i32,
    ply: u8,
) -> i32 {
    ctx.nodes += 1;
    let stand_pat = ctx.scorer.score(game_state, game_state.side_to_move);
    if ctx.time_up() {
        return stand_pat;
    }

    if stand_pat >= beta {
        return stand_pat;
    }
    let alpha_orig = alpha;
    alpha = alpha.max(stand_pat);
    if ply >= QSEARCH_MAX_PLY {
        return stand_pat;
    }

    let mut moves = legal_noisy_moves(game_state);
    if moves.is_empty() {
        return stand_pat;
    }

    let key = compute_zobrist_key(game_state) ^ QSEARCH_SALT;
    let hint = ctx.tt.best_move_hint(key);
    order_moves(game_state, &mut moves, hint);

    let mut best = stand_pat;
    let mut best_move = None;
    for mv in moves {
        if ctx.time_up() {
            break;
        }
        let child = apply_move(game_state, mv);
        let score = -quiescence(ctx, &child, -beta, -alpha, ply + 1);
        if ctx.aborted {
            break;
        }

        if score > best {
            best = score;
            best_move = Some(mv);
        }
        alpha = alpha.max(best);
        if alpha >= beta {
            break;
        }
    }

    if !ctx.aborted {
        ctx.tt.store(TTEntry {
            key,
            depth: 0,
            score: best,
            bound: TTEntry::bound_for(best, alpha_orig, beta),
            best_move,
        });
    }
    best
}
