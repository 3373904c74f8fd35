//! Attack and check detection.
//!
//! Looks outward from the target square: pawn and leaper offsets are probed
//! directly, sliding rays stop at their first occupant.

use crate::game_state::chess_rules::{
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use crate::game_state::chess_types::*;

#[inline]
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board.find(Piece::new(color, PieceKind::King))
}

/// Whether `color`'s king is attacked. A board without that king is treated
/// as not in check.
#[inline]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = king_square(board, color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.opposite())
}

pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    // An attacking pawn sits one step "behind" the target from its own view.
    let pawn_row_delta = -attacker_color.pawn_direction();
    for d_col in [-1i8, 1] {
        if let Some(from) = square.offset(pawn_row_delta, d_col) {
            if board.get(from) == Some(Piece::new(attacker_color, PieceKind::Pawn)) {
                return true;
            }
        }
    }

    if leaper_attacks(board, square, attacker_color, PieceKind::Knight, &KNIGHT_OFFSETS) {
        return true;
    }
    if leaper_attacks(board, square, attacker_color, PieceKind::King, &KING_OFFSETS) {
        return true;
    }

    if slider_attacks(board, square, attacker_color, PieceKind::Bishop, &BISHOP_DIRECTIONS) {
        return true;
    }
    slider_attacks(board, square, attacker_color, PieceKind::Rook, &ROOK_DIRECTIONS)
}

fn leaper_attacks(
    board: &Board,
    square: Square,
    attacker_color: Color,
    kind: PieceKind,
    offsets: &[(i8, i8)],
) -> bool {
    offsets.iter().any(|&(d_row, d_col)| {
        square
            .offset(d_row, d_col)
            .is_some_and(|from| board.get(from) == Some(Piece::new(attacker_color, kind)))
    })
}

/// `kind` is the orthogonal or diagonal slider for `directions`; queens
/// attack along both.
fn slider_attacks(
    board: &Board,
    square: Square,
    attacker_color: Color,
    kind: PieceKind,
    directions: &[(i8, i8)],
) -> bool {
    for &(d_row, d_col) in directions {
        let mut cursor = square.offset(d_row, d_col);
        while let Some(sq) = cursor {
            if let Some(piece) = board.get(sq) {
                if piece.color == attacker_color
                    && (piece.kind == kind || piece.kind == PieceKind::Queen)
                {
                    return true;
                }
                break;
            }
            cursor = sq.offset(d_row, d_col);
        }
    }
    false
}
