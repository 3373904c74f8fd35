//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each depth reuses the transposition table filled by the previous one and
//! searches the previous best root move first. A wall-clock deadline is
//! checked at every node; an iteration cut short by it is thrown away.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, MATE_SCORE};
use crate::search::move_ordering::order_moves;
use crate::search::quiescence::quiescence;
use crate::search::transposition_table::{Bound, TTCutoff, TTEntry, TranspositionTable};
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::long_algebraic::move_to_long_algebraic;

/// Window bound; larger than any reachable score.
pub const SCORE_INFINITY: i32 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Wall-clock limit. `None` searches every depth to completion.
    pub time_budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            time_budget: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    /// Deepest fully completed iteration (0 if none finished).
    pub reached_depth: u8,
    pub nodes: u64,
}

/// Per-search state shared by the main search and quiescence.
pub struct SearchContext<'a, S: BoardScorer> {
    pub tt: &'a mut TranspositionTable,
    pub scorer: &'a S,
    pub nodes: u64,
    /// Set once the deadline passes; every caller unwinds without storing.
    pub aborted: bool,
    deadline: Option<Instant>,
}

impl<'a, S: BoardScorer> SearchContext<'a, S> {
    pub fn new(tt: &'a mut TranspositionTable, scorer: &'a S, deadline: Option<Instant>) -> Self {
        Self {
            tt,
            scorer,
            nodes: 0,
            aborted: false,
            deadline,
        }
    }

    #[inline]
    pub fn time_up(&mut self) -> bool {
        if !self.aborted && self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.aborted = true;
        }
        self.aborted
    }
}

pub fn iterative_deepening_search<S: BoardScorer>(
    game_state: &GameState,
    scorer: &S,
    tt: &mut TranspositionTable,
    config: SearchConfig,
) -> SearchResult {
    let mut root_moves = legal_moves(game_state);
    if config.max_depth == 0 || root_moves.is_empty() {
        let best_score = if root_moves.is_empty() {
            terminal_score(game_state, 0)
        } else {
            scorer.score(game_state, game_state.side_to_move)
        };
        return SearchResult {
            best_move: None,
            best_score,
            reached_depth: 0,
            nodes: 1,
        };
    }

    let deadline = config.time_budget.map(|budget| Instant::now() + budget);
    let mut ctx = SearchContext::new(tt, scorer, deadline);
    order_moves(game_state, &mut root_moves, None);

    // Used only when not even depth 1 produced a move.
    let mut result = SearchResult {
        best_move: root_moves.first().copied(),
        best_score: -SCORE_INFINITY,
        reached_depth: 0,
        nodes: 0,
    };

    for depth in 1..=config.max_depth {
        if ctx.time_up() {
            break;
        }
        ctx.tt.new_generation();

        let mut alpha = -SCORE_INFINITY;
        let mut iteration_best: Option<(Move, i32)> = None;
        for &mv in &root_moves {
            if ctx.time_up() {
                break;
            }
            let child = apply_move(game_state, mv);
            let score = -negamax(&mut ctx, &child, depth - 1, -SCORE_INFINITY, -alpha);
            if ctx.aborted {
                break;
            }
            if iteration_best.map_or(true, |(_, best)| score > best) {
                iteration_best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        let Some((best_move, best_score)) = iteration_best else {
            break;
        };

        if ctx.aborted {
            // A partial first iteration still beats the unsearched fallback.
            if depth == 1 {
                result.best_move = Some(best_move);
                result.best_score = best_score;
            }
            debug!(depth, nodes = ctx.nodes, "search iteration aborted by deadline");
            break;
        }

        result.best_move = Some(best_move);
        result.best_score = best_score;
        result.reached_depth = depth;
        debug!(
            depth,
            score = best_score,
            nodes = ctx.nodes,
            best = %move_to_long_algebraic(best_move),
            "search iteration complete"
        );

        order_moves(game_state, &mut root_moves, Some(best_move));
    }

    result.nodes = ctx.nodes;
    result
}

fn negamax<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &GameState,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    ctx.nodes += 1;
    if ctx.time_up() {
        return ctx.scorer.score(game_state, game_state.side_to_move);
    }

    let key = compute_zobrist_key(game_state);
    let mut hint = None;
    if let Some(entry) = ctx.tt.probe(key) {
        hint = entry.best_move;
        match entry.cutoff(depth, alpha, beta) {
            Some(TTCutoff::Score(score)) => return score,
            Some(TTCutoff::Window {
                alpha: narrowed_alpha,
                beta: narrowed_beta,
            }) => {
                alpha = narrowed_alpha;
                beta = narrowed_beta;
            }
            None => {}
        }
    }

    let mut moves = legal_moves(game_state);
    if moves.is_empty() {
        let score = terminal_score(game_state, depth);
        store(ctx, key, depth, score, Bound::Exact, None);
        return score;
    }

    if depth == 0 {
        let score = quiescence(ctx, game_state, alpha, beta, 0);
        store(ctx, key, 0, score, TTEntry::bound_for(score, alpha, beta), None);
        return score;
    }

    order_moves(game_state, &mut moves, hint);

    let alpha_orig = alpha;
    let mut best = -SCORE_INFINITY;
    let mut best_move = None;
    for mv in moves {
        let child = apply_move(game_state, mv);
        let score = -negamax(ctx, &child, depth - 1, -beta, -alpha);
        if ctx.aborted {
            return best.max(score);
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

    let bound = TTEntry::bound_for(best, alpha_orig, beta);
    store(ctx, key, depth, best, bound, best_move);
    best
}

fn store<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    key: u64,
    depth: u8,
    score: i32,
    bound: Bound,
    best_move: Option<Move>,
) {
    if ctx.aborted {
        return;
    }
    ctx.tt.store(TTEntry {
        key,
        depth,
        score,
        bound,
        best_move,
    });
}

/// Score of a position with no legal moves, from the side to move.
/// Mates found with more depth remaining (sooner) score further from zero.
fn terminal_score(game_state: &GameState, depth: u8) -> i32 {
    if is_in_check(&game_state.board, game_state.side_to_move) {
        -(MATE_SCORE + i32::from(depth))
    } else {
        0
    }
}
