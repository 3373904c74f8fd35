//! Perft: exhaustive leaf counting used to validate the move generator.
//!
//! Promotions always produce `AUTO_PROMOTE_TO`, so node counts agree with the
//! published tables only for positions and depths without promotions.

use std::thread;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::{
    has_legal_move, legal_successors, GeneratedMove,
};
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for child in legal_successors(game_state) {
        perft_recurse(&child, depth, 1, &mut total);
    }
    total
}

/// Same totals as [`perft`], with one scoped worker per root move.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth <= 1 {
        return perft(game_state, depth);
    }

    let root_moves = legal_successors(game_state);
    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|child| {
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    perft_recurse(child, depth, 1, &mut local);
                    local
                })
            })
            .collect();

        let mut total = PerftCounts::default();
        for handle in handles {
            match handle.join() {
                Ok(local) => total.merge(local),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        total
    })
}

/// Leaf count below each root move, keyed by long algebraic notation.
pub fn perft_divide(game_state: &GameState, depth: u8) -> Vec<(String, usize)> {
    let child_depth = depth.saturating_sub(1);
    legal_successors(game_state)
        .into_iter()
        .map(|child| {
            (
                move_to_long_algebraic(child.mv),
                perft(&child.game_after_move, child_depth).nodes,
            )
        })
        .collect()
}

fn perft_recurse(
    generated: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    if current_depth == search_depth {
        let mv = generated.mv;
        let after = &generated.game_after_move;
        counts.nodes += 1;

        if mv.is_capture() {
            counts.captures += 1;
        }
        if mv.is_en_passant() {
            counts.en_passant += 1;
        }
        if mv.castle_side().is_some() {
            counts.castles += 1;
        }
        if mv.is_promotion() {
            counts.promotions += 1;
        }
        if is_in_check(&after.board, after.side_to_move) {
            counts.checks += 1;
            if !has_legal_move(after) {
                counts.checkmates += 1;
            }
        }
        return;
    }

    for child in legal_successors(&generated.game_after_move) {
        perft_recurse(&child, search_depth, current_depth + 1, counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_shallow_counts() {
        let game = GameState::new_game();
        assert_eq!(perft(&game, 0).nodes, 1);
        assert_eq!(perft(&game, 1).nodes, 20);

        let depth_two = perft(&game, 2);
        assert_eq!(depth_two.nodes, 400);
        assert_eq!(depth_two.captures, 0);
        assert_eq!(depth_two.checks, 0);
    }

    #[test]
    fn starting_position_depth_three_details() {
        let counts = perft(&GameState::new_game(), 3);
        assert_eq!(counts.nodes, 8902);
        assert_eq!(counts.captures, 34);
        assert_eq!(counts.checks, 12);
        assert_eq!(counts.checkmates, 0);
    }

    #[test]
    fn threaded_perft_matches_single_thread() {
        let game = GameState::new_game();
        assert_eq!(perft_multi_threaded(&game, 3), perft(&game, 3));
    }

    #[test]
    fn divide_sums_to_total() {
        let game = GameState::new_game();
        let divide = perft_divide(&game, 2);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<usize>(), 400);
        assert!(divide.iter().any(|(mv, n)| mv == "e2e4" && *n == 20));
    }
}
