//! Move descriptions: origin, destination and a small flag set.
//!
//! Flags are recorded by the generator so later stages (application, ordering,
//! quiescence, notation) never have to re-derive what kind of move it was.

use crate::game_state::chess_types::{CastleSide, Square};

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_DOUBLE_PAWN_PUSH: u8 = 1 << 1;
pub const FLAG_EN_PASSANT: u8 = 1 << 2;
pub const FLAG_CASTLE_KINGSIDE: u8 = 1 << 3;
pub const FLAG_CASTLE_QUEENSIDE: u8 = 1 << 4;
pub const FLAG_PROMOTION: u8 = 1 << 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub flags: u8,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, flags: u8) -> Self {
        Self { from, to, flags }
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, 0)
    }

    #[inline]
    pub const fn has(self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// True for normal captures and en passant.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.has(FLAG_CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.has(FLAG_EN_PASSANT)
    }

    #[inline]
    pub const fn is_double_pawn_push(self) -> bool {
        self.has(FLAG_DOUBLE_PAWN_PUSH)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.has(FLAG_PROMOTION)
    }

    #[inline]
    pub fn castle_side(self) -> Option<CastleSide> {
        if self.has(FLAG_CASTLE_KINGSIDE) {
            Some(CastleSide::King)
        } else if self.has(FLAG_CASTLE_QUEENSIDE) {
            Some(CastleSide::Queen)
        } else {
            None
        }
    }

    /// Captures, en passant and promotions: the moves quiescence explores.
    #[inline]
    pub const fn is_noisy(self) -> bool {
        self.has(FLAG_CAPTURE | FLAG_EN_PASSANT | FLAG_PROMOTION)
    }

    /// Two moves with the same origin and destination are the same move in
    /// any one position; flags are derived from the position.
    #[inline]
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_queries() {
        let from = Square::new(7, 4);
        let castle = Move::new(from, Square::new(7, 6), FLAG_CASTLE_KINGSIDE);
        assert_eq!(castle.castle_side(), Some(CastleSide::King));
        assert!(!castle.is_noisy());

        let ep = Move::new(Square::new(3, 4), Square::new(2, 3), FLAG_CAPTURE | FLAG_EN_PASSANT);
        assert!(ep.is_capture() && ep.is_en_passant() && ep.is_noisy());
        assert!(ep.same_squares(Move::quiet(Square::new(3, 4), Square::new(2, 3))));
    }
}
