//! Pseudo-legal move generation.
//!
//! Moves produced here obey piece movement, occupancy and the castling
//! preconditions, but may still leave the mover's own king attacked. The
//! legality filter in `legal_move_generator` removes those.

use crate::game_state::chess_rules::{
    BISHOP_DIRECTIONS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::king_moves::generate_king_moves;
use crate::move_generation::pawn_moves::generate_pawn_moves;
use crate::moves::move_descriptions::{Move, FLAG_CAPTURE};

/// All pseudo-legal moves for the side to move.
pub fn generate_pseudo_moves(game_state: &GameState) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    for (from, _) in game_state.board.pieces_of(game_state.side_to_move) {
        generate_piece_moves(game_state, from, &mut out);
    }
    out
}

/// Pseudo-legal moves of the piece on `from`, whichever color owns it.
/// Empty squares yield nothing.
pub fn generate_piece_moves(game_state: &GameState, from: Square, out: &mut Vec<Move>) {
    let Some(piece) = game_state.board.get(from) else {
        return;
    };
    let board = &game_state.board;

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(game_state, from, piece.color, out),
        PieceKind::Knight => generate_step_moves(board, from, piece.color, &KNIGHT_OFFSETS, out),
        PieceKind::Bishop => generate_ray_moves(board, from, piece.color, &BISHOP_DIRECTIONS, out),
        PieceKind::Rook => generate_ray_moves(board, from, piece.color, &ROOK_DIRECTIONS, out),
        PieceKind::Queen => generate_ray_moves(board, from, piece.color, &QUEEN_DIRECTIONS, out),
        PieceKind::King => generate_king_moves(game_state, from, piece.color, out),
    }
}

/// Single-step moves for leapers (knight, king steps).
pub(crate) fn generate_step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in offsets {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        match board.color_on(to) {
            None => out.push(Move::quiet(from, to)),
            Some(c) if c != color => out.push(Move::new(from, to, FLAG_CAPTURE)),
            Some(_) => {}
        }
    }
}

/// Sliding moves: each ray runs until the edge, stopping before a friendly
/// piece or on an enemy piece.
fn generate_ray_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut cursor = from.offset(d_row, d_col);
        while let Some(to) = cursor {
            match board.color_on(to) {
                None => out.push(Move::quiet(from, to)),
                Some(c) => {
                    if c != color {
                        out.push(Move::new(from, to, FLAG_CAPTURE));
                    }
                    break;
                }
            }
            cursor = to.offset(d_row, d_col);
        }
    }
}
