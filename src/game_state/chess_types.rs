//! Core value types shared by the rules engine and the search.
//!
//! Everything here is a small `Copy` value so positions can be branched by
//! plain copies during search without touching the live game.

pub use crate::game_state::board::Board;
pub use crate::game_state::game_state::GameState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row delta of a single pawn push for this color (rows grow towards rank 1).
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }

    /// Row holding this color's king and rooks at game start.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::Light => 6,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::Light => "White",
            Color::Dark => "Black",
        }
    }
}

/// Piece kind (color is carried separately by [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }
}

/// Promotion policy: a pawn reaching its last rank always becomes this piece.
///
/// Under-promotion is not offered. Changing the policy only requires changing
/// this constant and the promotion letter emitted by `long_algebraic`.
pub const AUTO_PROMOTE_TO: PieceKind = PieceKind::Queen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

/// Board coordinate. `row` 0..=7 runs from rank 8 down to rank 1, `col`
/// 0..=7 from file a to file h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Panics in debug builds on out-of-range coordinates.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Self { row, col }
    }

    /// Step by a signed delta, returning `None` when it leaves the board.
    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Rank index 0..=7 (0 = rank 1).
    #[inline]
    pub const fn rank_index(self) -> u8 {
        7 - self.row
    }

    /// Dense index 0..=63 in row-major order (a8 = 0, h1 = 63).
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
    }
}

/// Castling availability. Flags are only ever cleared during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub light_kingside: bool,
    pub light_queenside: bool,
    pub dark_kingside: bool,
    pub dark_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        light_kingside: true,
        light_queenside: true,
        dark_kingside: true,
        dark_queenside: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        light_kingside: false,
        light_queenside: false,
        dark_kingside: false,
        dark_queenside: false,
    };

    #[inline]
    pub fn has(self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::Light, CastleSide::King) => self.light_kingside,
            (Color::Light, CastleSide::Queen) => self.light_queenside,
            (Color::Dark, CastleSide::King) => self.dark_kingside,
            (Color::Dark, CastleSide::Queen) => self.dark_queenside,
        }
    }

    #[inline]
    pub fn clear(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::Light, CastleSide::King) => self.light_kingside = false,
            (Color::Light, CastleSide::Queen) => self.light_queenside = false,
            (Color::Dark, CastleSide::King) => self.dark_kingside = false,
            (Color::Dark, CastleSide::Queen) => self.dark_queenside = false,
        }
    }

    #[inline]
    pub fn clear_color(&mut self, color: Color) {
        self.clear(color, CastleSide::King);
        self.clear(color, CastleSide::Queen);
    }

    /// Packed `KQkq` nibble, used by hashing.
    #[inline]
    pub fn bits(self) -> u8 {
        (self.light_kingside as u8)
            | (self.light_queenside as u8) << 1
            | (self.dark_kingside as u8) << 2
            | (self.dark_queenside as u8) << 3
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// Column the castling rook starts on.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }

    /// Column the castling rook ends on.
    #[inline]
    pub const fn rook_target_col(self) -> u8 {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }

    /// Column the king ends on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_on_board() {
        let a8 = Square::new(0, 0);
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(1, 1), Some(Square::new(1, 1)));
        assert_eq!(Square::new(7, 7).offset(0, 1), None);
    }

    #[test]
    fn castling_bits_pack_each_flag() {
        assert_eq!(CastlingRights::ALL.bits(), 0b1111);
        assert_eq!(CastlingRights::NONE.bits(), 0);
        let mut rights = CastlingRights::ALL;
        rights.clear_color(Color::Light);
        assert_eq!(rights.bits(), 0b1100);
        assert!(rights.has(Color::Dark, CastleSide::Queen));
        assert!(!rights.has(Color::Light, CastleSide::King));
    }
}
