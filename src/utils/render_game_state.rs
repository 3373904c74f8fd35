//! Terminal-oriented Unicode board renderer.
//!
//! Rank 8 is printed first. Squares touched by the last move are bracketed.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;

const FILE_HEADER: &str = "   a  b  c  d  e  f  g  h";

/// Render the board to a Unicode string for terminal output.
pub fn render_game_state(game_state: &GameState, last_move: Option<Move>) -> String {
    let mut out = String::new();
    out.push_str(FILE_HEADER);
    out.push('\n');

    for row in 0..8u8 {
        let rank = char::from(b'8' - row);
        out.push(rank);
        out.push(' ');

        for col in 0..8u8 {
            let square = Square::new(row, col);
            let glyph = game_state
                .board
                .get(square)
                .map(piece_to_unicode)
                .unwrap_or('·');
            let marked = last_move.is_some_and(|mv| mv.from == square || mv.to == square);
            if marked {
                out.push('[');
                out.push(glyph);
                out.push(']');
            } else {
                out.push(' ');
                out.push(glyph);
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(rank);
        out.push('\n');
    }

    out.push_str(FILE_HEADER);
    out
}

fn piece_to_unicode(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::Light, PieceKind::Pawn) => '♙',
        (Color::Light, PieceKind::Knight) => '♘',
        (Color::Light, PieceKind::Bishop) => '♗',
        (Color::Light, PieceKind::Rook) => '♖',
        (Color::Light, PieceKind::Queen) => '♕',
        (Color::Light, PieceKind::King) => '♔',
        (Color::Dark, PieceKind::Pawn) => '♟',
        (Color::Dark, PieceKind::Knight) => '♞',
        (Color::Dark, PieceKind::Bishop) => '♝',
        (Color::Dark, PieceKind::Rook) => '♜',
        (Color::Dark, PieceKind::Queen) => '♛',
        (Color::Dark, PieceKind::King) => '♚',
    }
}
