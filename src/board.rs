use std::ops::Index;

use crate::castling::{CastlingRights, CastlingSide};
use crate::coordinates::{File, Rank, Square};
use crate::piece::{Color, Piece, PieceType};
use crate::record::{MoveRecord, Special};

/// Whether a move application is for real or part of a legality probe.
///
/// A simulated application behaves exactly like a committed one except that a promotion is
/// resolved to a queen internally instead of being surfaced to the caller: the only thing a
/// simulation observes is whether the resulting position leaves the mover in check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApplyMode {
    Commit,
    Simulate,
}

/// The result of applying a move.
#[derive(Debug)]
pub enum AppliedMove {
    /// The move is fully applied; the record reverses it.
    Complete(MoveRecord),
    /// A pawn reached the last rank during a committed application. The pawn stands on the
    /// destination square and the move is finished by [`GameState::promote_pawn`] once a choice
    /// is available. Simulated applications never produce this variant.
    PromotionPending(MoveRecord),
}

const BACK_RANK_TYPES: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The four rook home corners and the castling right each one latches.
///
/// Rights are invalidated by square identity alone: once a right is cleared it can never be
/// re-set, so it does not matter whether the corner still holds the original rook.
const ROOK_CORNERS: [(Square, CastlingRights); 4] = [
    (Square::A1, CastlingRights::WHITE_QUEENSIDE),
    (Square::H1, CastlingRights::WHITE_KINGSIDE),
    (Square::A8, CastlingRights::BLACK_QUEENSIDE),
    (Square::H8, CastlingRights::BLACK_KINGSIDE),
];

fn rook_castling_squares(side: CastlingSide, back: Rank) -> (Square, Square) {
    match side {
        CastlingSide::Kingside => (Square::new(File::H, back), Square::new(File::F, back)),
        CastlingSide::Queenside => (Square::new(File::A, back), Square::new(File::D, back)),
    }
}

/// The complete state of a game in progress.
///
/// This is the single source of truth every engine operation reads and mutates: the 64-square
/// board, the side to move, the castling right latches and the en-passant file. One session owns
/// one `GameState`; independent games are independent values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_file: Option<File>,
}

impl GameState {
    /// Creates the standard starting position: white to move, all castling rights, no en-passant
    /// file.
    pub fn new() -> Self {
        let mut state = GameState::empty();
        for (file, piece_type) in File::ALL.into_iter().zip(BACK_RANK_TYPES) {
            state.put_piece(Piece::new(Color::Black, piece_type), Square::new(file, Rank::R8));
            state.put_piece(Piece::new(Color::White, piece_type), Square::new(file, Rank::R1));
        }
        for file in File::ALL {
            state.put_piece(Piece::new(Color::Black, PieceType::Pawn), Square::new(file, Rank::R7));
            state.put_piece(Piece::new(Color::White, PieceType::Pawn), Square::new(file, Rank::R2));
        }
        state.castling_rights = CastlingRights::all();
        state
    }

    /// Creates an empty board with white to move and no castling rights.
    ///
    /// Together with [`place`](Self::place) and the setters this is the position-setup surface
    /// for hosts and test fixtures; during play all mutation flows through
    /// [`apply_move`](Self::apply_move) and [`unapply_move`](Self::unapply_move).
    pub fn empty() -> Self {
        Self {
            board: [None; Square::COUNT],
            side_to_move: Color::White,
            castling_rights: CastlingRights::empty(),
            en_passant_file: None,
        }
    }

    /// Restores the standard starting position.
    pub fn reset(&mut self) {
        *self = GameState::new();
    }

    /// Places a piece on an empty square during position setup.
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.put_piece(piece, square);
    }

    /// Returns the color of the side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Returns the castling rights of the position.
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights;
    }

    /// Returns the file of the last double pawn push, if the capture window is still open.
    ///
    /// The file is only meaningful for the rank immediately behind that push from the side to
    /// move's point of view, and it is cleared at the start of every move application.
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant_file
    }

    pub fn set_en_passant_file(&mut self, file: Option<File>) {
        self.en_passant_file = file;
    }

    /// Returns the square occupied by the king of the given color.
    ///
    /// # Panics
    /// Panics if that king is missing, which cannot happen in a position the engine produced.
    pub fn king_square(&self, color: Color) -> Square {
        let king = Piece::new(color, PieceType::King);
        Square::ALL
            .into_iter()
            .find(|&square| self[square] == Some(king))
            .expect("there should always be a king of each color on the board")
    }

    /// Puts a piece on an empty square.
    pub(crate) fn put_piece(&mut self, piece: Piece, square: Square) {
        debug_assert_eq!(self.board[usize::from(square)], None);

        self.board[usize::from(square)] = Some(piece);
    }

    /// Removes the piece from a square.
    pub(crate) fn remove_piece(&mut self, square: Square) -> Piece {
        let piece = self.board[usize::from(square)]
            .expect("it is not possible to remove a piece from an empty square");
        self.board[usize::from(square)] = None;
        piece
    }

    /// Moves a known piece from one square to another. The piece must be present on the `from`
    /// square and the `to` square must be empty.
    pub(crate) fn move_piece(&mut self, piece: Piece, from: Square, to: Square) {
        debug_assert_eq!(self.board[usize::from(from)], Some(piece));
        debug_assert_eq!(self.board[usize::from(to)], None);

        self.board[usize::from(from)] = None;
        self.board[usize::from(to)] = Some(piece);
    }

    /// Applies a move and returns the record that reverses it.
    ///
    /// This performs the full application semantics: the en-passant window is closed before
    /// anything else, a castle relocates its rook, an en passant capture removes the pawn behind
    /// the destination, a double push re-opens the window on the pushed file, and the castling
    /// right latches are cleared for king moves and for anything leaving or landing on a rook
    /// home corner.
    ///
    /// A committed application of a pawn reaching the last rank returns
    /// [`AppliedMove::PromotionPending`] with the pawn still on the destination square; the move
    /// is finished with [`promote_pawn`](Self::promote_pawn). A simulated application promotes to
    /// a queen internally and always returns [`AppliedMove::Complete`].
    ///
    /// The move must be pseudo-legal for the piece on the `from` square. Legality (not leaving
    /// the mover's own king in check) is the caller's concern; the session only applies moves
    /// from the legal set.
    pub fn apply_move(&mut self, from: Square, to: Square, mode: ApplyMode) -> AppliedMove {
        let moving = self[from].expect("apply_move requires a piece on the from square");
        let color = moving.color();
        let captured = self[to];
        let rights_before = self.castling_rights;
        let en_passant_before = self.en_passant_file;

        // The capture window lasts exactly one move; close it before possibly re-opening below.
        self.en_passant_file = None;

        let mut special = Special::Basic;
        if moving.piece_type() == PieceType::King && from.file().distance(to.file()) == 2 {
            let side = if to.file() > from.file() {
                CastlingSide::Kingside
            } else {
                CastlingSide::Queenside
            };
            let back = Rank::R1.relative_to_color(color);
            let (rook_from, rook_to) = rook_castling_squares(side, back);
            let rook = self.remove_piece(rook_from);
            debug_assert_eq!(rook, Piece::new(color, PieceType::Rook));
            self.put_piece(rook, rook_to);
            special = match side {
                CastlingSide::Kingside => Special::CastleKingside,
                CastlingSide::Queenside => Special::CastleQueenside,
            };
        } else if moving.piece_type() == PieceType::Pawn
            && from.file() != to.file()
            && captured.is_none()
        {
            // A pawn moving diagonally onto an empty square is an en passant capture; the
            // captured pawn stands one rank behind the destination, on the mover's origin rank.
            let captured_square = Square::new(to.file(), from.rank());
            let captured_pawn = self.remove_piece(captured_square);
            debug_assert_eq!(captured_pawn, Piece::new(!color, PieceType::Pawn));
            special = Special::EnPassant { captured_square };
        }

        if captured.is_some() {
            self.remove_piece(to);
        }
        self.move_piece(moving, from, to);

        if moving.piece_type() == PieceType::Pawn && from.rank().distance(to.rank()) == 2 {
            self.en_passant_file = Some(from.file());
        }

        if moving.piece_type() == PieceType::King {
            self.castling_rights.remove(CastlingRights::both(color));
        }
        for (corner, right) in ROOK_CORNERS {
            if from == corner || to == corner {
                self.castling_rights.remove(right);
            }
        }

        self.side_to_move = !color;

        let mut record =
            MoveRecord::new(from, to, moving, captured, special, rights_before, en_passant_before);

        if moving.piece_type() == PieceType::Pawn
            && to.rank() == Rank::R8.relative_to_color(color)
        {
            return match mode {
                ApplyMode::Simulate => {
                    self.promote_pawn(&mut record, PieceType::Queen);
                    AppliedMove::Complete(record)
                }
                ApplyMode::Commit => AppliedMove::PromotionPending(record),
            };
        }

        AppliedMove::Complete(record)
    }

    /// Replaces the pawn on the record's destination square with the chosen piece.
    ///
    /// # Panics
    /// Panics if the choice is not one of knight, bishop, rook or queen, or if the destination
    /// square does not hold the promoting pawn.
    pub fn promote_pawn(&mut self, record: &mut MoveRecord, choice: PieceType) {
        assert!(choice.is_promotion_choice(), "a pawn cannot promote to a {}", choice);

        let pawn = self.remove_piece(record.to_square());
        debug_assert_eq!(pawn.piece_type(), PieceType::Pawn);
        self.put_piece(Piece::new(pawn.color(), choice), record.to_square());
        record.set_promotion(choice);
    }

    /// Reverts an applied move, restoring every field of the state exactly.
    ///
    /// The moving piece returns to its origin (a promoted piece reverts to the pawn), the
    /// captured piece, if any, reappears on the destination, a castled rook returns to its
    /// corner, an en-passant victim reappears behind the destination, and the castling rights and
    /// en-passant file are restored verbatim from the record's snapshots.
    pub fn unapply_move(&mut self, record: MoveRecord) {
        let moving = record.moving();
        let color = moving.color();

        // Whatever stands on the destination comes off (for a promotion that is the promoted
        // piece, not the pawn) and the original piece returns to its origin.
        self.remove_piece(record.to_square());
        self.put_piece(moving, record.from_square());
        if let Some(captured) = record.captured() {
            self.put_piece(captured, record.to_square());
        }

        match record.special() {
            Special::CastleKingside | Special::CastleQueenside => {
                let side = match record.special() {
                    Special::CastleKingside => CastlingSide::Kingside,
                    _ => CastlingSide::Queenside,
                };
                let back = Rank::R1.relative_to_color(color);
                let (rook_from, rook_to) = rook_castling_squares(side, back);
                let rook = self.remove_piece(rook_to);
                self.put_piece(rook, rook_from);
            }
            Special::EnPassant { captured_square } => {
                self.put_piece(Piece::new(!color, PieceType::Pawn), captured_square);
            }
            Special::Basic | Special::Promotion { .. } => {}
        }

        self.castling_rights = record.rights_before();
        self.en_passant_file = record.en_passant_before();
        self.side_to_move = color;
    }

    /// Generates a compact text rendering of the board, rank 8 at the top.
    ///
    /// Pieces are shown by their standard characters (uppercase white, lowercase black), empty
    /// squares as dots.
    pub fn to_compact_string(&self) -> String {
        let mut board = String::with_capacity(180);
        for rank in Rank::ALL {
            board.push_str(&format!("{}  ", rank));
            for file in File::ALL {
                match self[Square::new(file, rank)] {
                    Some(piece) => board.push(piece.into()),
                    None => board.push('.'),
                }
                if file != File::H {
                    board.push(' ');
                } else {
                    board.push('\n');
                }
            }
        }
        board.push_str("   a b c d e f g h");
        board
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl Index<Square> for GameState {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.board[usize::from(index)]
    }
}
