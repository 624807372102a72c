use crate::castling::CastlingRights;
use crate::coordinates::{File, Square};
use crate::piece::{Piece, PieceType};

/// Marks what, beyond the moving piece itself, a move changed on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Special {
    /// An ordinary move or capture.
    Basic,
    /// A kingside castle; the rook moved from the h-file corner to the f-file.
    CastleKingside,
    /// A queenside castle; the rook moved from the a-file corner to the d-file.
    CastleQueenside,
    /// An en passant capture; the captured pawn was removed from `captured_square`, one rank
    /// behind the destination.
    EnPassant { captured_square: Square },
    /// A promotion; the pawn became `promoted_to` on the destination square.
    Promotion { promoted_to: PieceType },
}

/// Everything needed to reverse one applied move.
///
/// A record is created when a move is applied, pushed onto the session's undo stack once the move
/// commits, and consumed when the move is undone. The castling rights and en-passant file are
/// full snapshots taken before the move touched anything; undo restores them verbatim rather
/// than recomputing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    from: Square,
    to: Square,
    moving: Piece,
    captured: Option<Piece>,
    special: Special,
    rights_before: CastlingRights,
    en_passant_before: Option<File>,
}

impl MoveRecord {
    pub(crate) fn new(
        from: Square,
        to: Square,
        moving: Piece,
        captured: Option<Piece>,
        special: Special,
        rights_before: CastlingRights,
        en_passant_before: Option<File>,
    ) -> Self {
        Self { from, to, moving, captured, special, rights_before, en_passant_before }
    }

    /// The square the piece moved from.
    pub fn from_square(&self) -> Square {
        self.from
    }

    /// The square the piece moved to.
    pub fn to_square(&self) -> Square {
        self.to
    }

    /// The piece that moved. For a promotion this is still the pawn.
    pub fn moving(&self) -> Piece {
        self.moving
    }

    /// The piece captured on the destination square, if any.
    ///
    /// An en passant capture leaves this `None`; the removed pawn is recorded by the special tag
    /// instead, because it did not stand on the destination square.
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// What else the move changed on the board.
    pub fn special(&self) -> Special {
        self.special
    }

    /// The castling rights before the move was applied.
    pub fn rights_before(&self) -> CastlingRights {
        self.rights_before
    }

    /// The en-passant file before the move was applied.
    pub fn en_passant_before(&self) -> Option<File> {
        self.en_passant_before
    }

    /// True if the move captured anything, including en passant.
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || matches!(self.special, Special::EnPassant { .. })
    }

    pub(crate) fn set_promotion(&mut self, promoted_to: PieceType) {
        debug_assert_eq!(self.moving.piece_type(), PieceType::Pawn);
        self.special = Special::Promotion { promoted_to };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    #[test]
    fn test_capture_detection() {
        let quiet = MoveRecord::new(
            Square::E2,
            Square::E4,
            Piece::WHITE_PAWN,
            None,
            Special::Basic,
            CastlingRights::all(),
            None,
        );
        assert!(!quiet.is_capture());

        let capture = MoveRecord::new(
            Square::D4,
            Square::E5,
            Piece::WHITE_PAWN,
            Some(Piece::BLACK_PAWN),
            Special::Basic,
            CastlingRights::all(),
            None,
        );
        assert!(capture.is_capture());

        let en_passant = MoveRecord::new(
            Square::E5,
            Square::D6,
            Piece::WHITE_PAWN,
            None,
            Special::EnPassant { captured_square: Square::D5 },
            CastlingRights::all(),
            Some(File::D),
        );
        assert!(en_passant.is_capture());
        assert_eq!(en_passant.captured(), None);
    }

    #[test]
    fn test_promotion_tagging() {
        let mut record = MoveRecord::new(
            Square::A7,
            Square::A8,
            Piece::new(Color::White, PieceType::Pawn),
            None,
            Special::Basic,
            CastlingRights::empty(),
            None,
        );
        record.set_promotion(PieceType::Knight);
        assert_eq!(record.special(), Special::Promotion { promoted_to: PieceType::Knight });
    }
}
