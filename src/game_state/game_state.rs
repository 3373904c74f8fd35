//! Core position snapshot.
//!
//! `GameState` is the unit handed to move generation and search. It carries
//! every fact the rules need (board, side, castling, en passant, clocks), so
//! hypothetical futures can be explored by value without a shared global.

use crate::errors::FenResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Immutable-by-convention position snapshot. Moves produce new values via
/// `legal_move_apply::apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // Clocks are bookkeeping for FEN output only.
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::empty(),
            side_to_move: Color::Light,
            castling_rights: CastlingRights::NONE,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard initial position, built directly rather than parsed.
    pub fn new_game() -> Self {
        Self {
            board: Board::standard(),
            side_to_move: Color::Light,
            castling_rights: CastlingRights::ALL,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> FenResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }
}
