//! Pluggable board evaluation.
//!
//! Search delegates static scoring to [`BoardScorer`] so heuristics can be
//! swapped without touching the search. Scores are millipawns.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Magnitude of a checkmate score before the remaining-depth bonus.
pub const MATE_SCORE: i32 = 100_000_000;

pub const BISHOP_PAIR_BONUS: i32 = 350;
pub const PAWN_COUNT_WEIGHT: i32 = 30;

pub trait BoardScorer: Send + Sync {
    /// Score from `perspective`'s point of view. Must be antisymmetric:
    /// `score(s, c) == -score(s, c.opposite())`.
    fn score(&self, game_state: &GameState, perspective: Color) -> i32;
}

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1_000,
        PieceKind::Knight => 3_000,
        PieceKind::Bishop => 3_200,
        PieceKind::Rook => 5_000,
        PieceKind::Queen => 9_000,
        PieceKind::King => 100_000,
    }
}

/// Material, piece-square terms, bishop pair and pawn count.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScorer;

impl BoardScorer for StandardScorer {
    fn score(&self, game_state: &GameState, perspective: Color) -> i32 {
        evaluate(game_state, perspective)
    }
}

pub fn evaluate(game_state: &GameState, perspective: Color) -> i32 {
    let mut score = 0i32;
    let mut bishops = [0u8; 2];
    let mut pawns = [0i32; 2];

    for (square, piece) in game_state.board.pieces() {
        let sign = if piece.color == perspective { 1 } else { -1 };
        score += sign * (piece_value(piece.kind) + piece_square_bonus(piece, square));

        let side = usize::from(piece.color != perspective);
        match piece.kind {
            PieceKind::Bishop => bishops[side] += 1,
            PieceKind::Pawn => pawns[side] += 1,
            _ => {}
        }
    }

    if bishops[0] >= 2 {
        score += BISHOP_PAIR_BONUS;
    }
    if bishops[1] >= 2 {
        score -= BISHOP_PAIR_BONUS;
    }
    score + (pawns[0] - pawns[1]) * PAWN_COUNT_WEIGHT
}

/// Placement term for `piece` on `square`.
///
/// `rr` counts ranks from the owner's back rank; `cd` is the Manhattan
/// distance to the board centre, which is always a whole number here.
pub fn piece_square_bonus(piece: Piece, square: Square) -> i32 {
    let rr = match piece.color {
        Color::Light => 7 - square.row as i32,
        Color::Dark => square.row as i32,
    };
    let col = square.col as i32;
    let cd = ((7 - 2 * col).abs() + (7 - 2 * rr).abs()) / 2;

    match piece.kind {
        PieceKind::Pawn => (6 - rr) * 50 - cd * 20,
        PieceKind::Knight | PieceKind::Bishop => 200 - cd * 40,
        PieceKind::Rook => (if rr > 0 && rr < 7 { 80 } else { 0 }) - cd * 10,
        PieceKind::Queen => -cd * 15,
        PieceKind::King => {
            if rr <= 1 {
                120
            } else {
                -cd * 30
            }
        }
    }
}
