use bitflags::bitflags;

use crate::piece::Color;

/// The two sides of the board a king may castle toward.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastlingSide {
    pub const COUNT: usize = 2;

    pub const ALL: [CastlingSide; CastlingSide::COUNT] =
        [CastlingSide::Kingside, CastlingSide::Queenside];
}

bitflags! {
    /// Per-color, per-side castling right flags.
    ///
    /// Rights are one-way latches: they start set and are only ever cleared, by a king move, a
    /// rook leaving its home corner, or a capture landing on that corner. A cleared right is
    /// never restored except by undoing the move that cleared it.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRights {
    /// Returns the single right for a color and side.
    pub fn new(color: Color, side: CastlingSide) -> Self {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => CastlingRights::WHITE_KINGSIDE,
            (Color::White, CastlingSide::Queenside) => CastlingRights::WHITE_QUEENSIDE,
            (Color::Black, CastlingSide::Kingside) => CastlingRights::BLACK_KINGSIDE,
            (Color::Black, CastlingSide::Queenside) => CastlingRights::BLACK_QUEENSIDE,
        }
    }

    /// Returns both rights of a color.
    pub fn both(color: Color) -> Self {
        CastlingRights::new(color, CastlingSide::Kingside)
            | CastlingRights::new(color, CastlingSide::Queenside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rights_for_color_and_side() {
        assert_eq!(
            CastlingRights::new(Color::White, CastlingSide::Kingside),
            CastlingRights::WHITE_KINGSIDE
        );
        assert_eq!(
            CastlingRights::new(Color::Black, CastlingSide::Queenside),
            CastlingRights::BLACK_QUEENSIDE
        );
    }

    #[test]
    fn test_both_rights_of_a_color() {
        assert_eq!(
            CastlingRights::both(Color::White),
            CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE
        );
        assert_eq!(
            CastlingRights::all(),
            CastlingRights::both(Color::White) | CastlingRights::both(Color::Black)
        );
    }

    #[test]
    fn test_rights_are_clearable_independently() {
        let mut rights = CastlingRights::all();
        rights.remove(CastlingRights::WHITE_KINGSIDE);
        assert!(!rights.contains(CastlingRights::WHITE_KINGSIDE));
        assert!(rights.contains(CastlingRights::WHITE_QUEENSIDE));
        assert!(rights.contains(CastlingRights::both(Color::Black)));
    }
}
