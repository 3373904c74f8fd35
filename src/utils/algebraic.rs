//! Square conversions for coordinate notation.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! `Square` values reused by FEN and UCI components.

use crate::errors::{NotationError, NotationResult};
use crate::game_state::chess_types::Square;

/// Convert coordinate notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> NotationResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    let col = file - b'a';
    let row = 7 - (rank - b'1');
    Ok(Square::new(row, col))
}

/// Convert a square to coordinate notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + square.col);
    let rank_char = char::from(b'1' + square.rank_index());
    format!("{file_char}{rank_char}")
}
