//! Long algebraic move notation (`e2e4`, `e7e8q`), as spoken by UCI engines.

use crate::errors::{NotationError, NotationResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::find_legal_move;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Squares and optional promotion letter of a textual move, before any
/// legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongAlgebraicMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_long_algebraic(text: &str) -> NotationResult<LongAlgebraicMove> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(NotationError::InvalidMove(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => Some(promotion_from_char(ch)?),
    };

    Ok(LongAlgebraicMove {
        from,
        to,
        promotion,
    })
}

/// Resolve `text` against the legal moves of `game_state`.
///
/// A promotion letter is accepted but the piece is always `AUTO_PROMOTE_TO`.
pub fn long_algebraic_to_move(text: &str, game_state: &GameState) -> NotationResult<Move> {
    let parsed = parse_long_algebraic(text)?;
    find_legal_move(game_state, parsed.from, parsed.to)
        .ok_or_else(|| NotationError::InvalidMove(text.trim().to_owned()))
}

pub fn move_to_long_algebraic(mv: Move) -> String {
    let mut out = square_to_algebraic(mv.from);
    out.push_str(&square_to_algebraic(mv.to));
    if mv.is_promotion() {
        out.push(promotion_to_char(AUTO_PROMOTE_TO));
    }
    out
}

fn promotion_from_char(ch: char) -> NotationResult<PieceKind> {
    match ch.to_ascii_lowercase() {
        'q' => Ok(PieceKind::Queen),
        'r' => Ok(PieceKind::Rook),
        'b' => Ok(PieceKind::Bishop),
        'n' => Ok(PieceKind::Knight),
        _ => Err(NotationError::InvalidPromotion(ch)),
    }
}

fn promotion_to_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Rook => 'r',
        PieceKind::Bishop => 'b',
        PieceKind::Knight => 'n',
        _ => 'q',
    }
}
