use std::convert::From;
use std::fmt::Display;

use thiserror::Error;

use crate::piece::Color;

/// Errors produced when constructing or navigating board coordinates.
#[derive(Error, Debug, PartialEq)]
pub enum CoordinatesError {
    /// A square index outside 0..63 was supplied by a caller.
    #[error("square index {0} is outside the board")]
    InvalidSquare(u8),

    /// A file value or character outside a..h.
    #[error("invalid file")]
    InvalidFile,

    /// A rank value or character outside 1..8.
    #[error("invalid rank")]
    InvalidRank,

    /// A string that does not name a square (expects e.g. "e4").
    #[error("cannot parse \"{0}\" as a square")]
    InvalidSquareString(String),

    /// A navigation step that would leave the board.
    #[error("the destination square is off the board")]
    OffTheBoard,
}

/// Represents a file (column) on the board.
///
/// Files are labeled from A to H, going from left to right when viewing the board from White's
/// perspective.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const COUNT: usize = 8;

    /// All files in left-to-right order.
    pub const ALL: [File; File::COUNT] =
        [File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H];

    /// Distance in files between two files.
    pub fn distance(self, other: File) -> u8 {
        (self as i8 - other as i8).unsigned_abs()
    }
}

impl Display for File {
    /// Formats the file as a single lowercase character.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (u8::from(*self) + b'a') as char)
    }
}

impl From<u8> for File {
    fn from(value: u8) -> Self {
        assert!(value <= File::H.into());
        unsafe { std::mem::transmute(value) }
    }
}

impl From<File> for u8 {
    fn from(file: File) -> Self {
        file as u8
    }
}

impl TryFrom<char> for File {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from(value as u8 - b'a')),
            _ => Err(CoordinatesError::InvalidFile),
        }
    }
}

/// Represents a rank (row) on the board.
///
/// Ranks are labeled 1 to 8 from White's side of the board. In storage order the eighth rank
/// comes first, so `Rank::R8` has index 0 and `Rank::R1` has index 7, matching the layout of the
/// board array where square 0 is a8.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    pub const COUNT: usize = 8;

    /// All ranks in storage order (top of the board first).
    pub const ALL: [Rank; Rank::COUNT] =
        [Rank::R8, Rank::R7, Rank::R6, Rank::R5, Rank::R4, Rank::R3, Rank::R2, Rank::R1];

    /// Returns the rank as seen from the given color's side of the board.
    ///
    /// `Rank::R2.relative_to_color(Color::Black)` is `Rank::R7`: the rank a black pawn starts on.
    pub fn relative_to_color(self, color: Color) -> Rank {
        match color {
            Color::White => self,
            Color::Black => Rank::from(7 - u8::from(self)),
        }
    }

    /// Distance in ranks between two ranks.
    pub fn distance(self, other: Rank) -> u8 {
        (self as i8 - other as i8).unsigned_abs()
    }
}

impl Display for Rank {
    /// Formats the rank as a single character.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'8' - u8::from(*self)) as char)
    }
}

impl From<u8> for Rank {
    fn from(value: u8) -> Self {
        assert!(value <= Rank::R1.into());
        unsafe { std::mem::transmute(value) }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank as u8
    }
}

impl TryFrom<char> for Rank {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from(b'8' - value as u8)),
            _ => Err(CoordinatesError::InvalidRank),
        }
    }
}

/// Represents a square on the board.
///
/// Squares are indexed 0 to 63 starting from a8 and ending at h1, row by row: the file is stored
/// in the lower 3 bits and the storage rank in the next 3 bits. This matches the board array of
/// the grid the engine serves, where index 0 is the top-left square from White's perspective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square(u8);

#[allow(dead_code)]
impl Square {
    pub const COUNT: usize = 64;

    // Constants for all squares on the board, in storage order.
    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A7: Square = Square(8);
    pub const B7: Square = Square(9);
    pub const C7: Square = Square(10);
    pub const D7: Square = Square(11);
    pub const E7: Square = Square(12);
    pub const F7: Square = Square(13);
    pub const G7: Square = Square(14);
    pub const H7: Square = Square(15);
    pub const A6: Square = Square(16);
    pub const B6: Square = Square(17);
    pub const C6: Square = Square(18);
    pub const D6: Square = Square(19);
    pub const E6: Square = Square(20);
    pub const F6: Square = Square(21);
    pub const G6: Square = Square(22);
    pub const H6: Square = Square(23);
    pub const A5: Square = Square(24);
    pub const B5: Square = Square(25);
    pub const C5: Square = Square(26);
    pub const D5: Square = Square(27);
    pub const E5: Square = Square(28);
    pub const F5: Square = Square(29);
    pub const G5: Square = Square(30);
    pub const H5: Square = Square(31);
    pub const A4: Square = Square(32);
    pub const B4: Square = Square(33);
    pub const C4: Square = Square(34);
    pub const D4: Square = Square(35);
    pub const E4: Square = Square(36);
    pub const F4: Square = Square(37);
    pub const G4: Square = Square(38);
    pub const H4: Square = Square(39);
    pub const A3: Square = Square(40);
    pub const B3: Square = Square(41);
    pub const C3: Square = Square(42);
    pub const D3: Square = Square(43);
    pub const E3: Square = Square(44);
    pub const F3: Square = Square(45);
    pub const G3: Square = Square(46);
    pub const H3: Square = Square(47);
    pub const A2: Square = Square(48);
    pub const B2: Square = Square(49);
    pub const C2: Square = Square(50);
    pub const D2: Square = Square(51);
    pub const E2: Square = Square(52);
    pub const F2: Square = Square(53);
    pub const G2: Square = Square(54);
    pub const H2: Square = Square(55);
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);

    #[rustfmt::skip]
    pub const ALL: [Square; Square::COUNT] = [
        Square::A8,Square::B8,Square::C8,Square::D8,Square::E8,Square::F8,Square::G8,Square::H8,
        Square::A7,Square::B7,Square::C7,Square::D7,Square::E7,Square::F7,Square::G7,Square::H7,
        Square::A6,Square::B6,Square::C6,Square::D6,Square::E6,Square::F6,Square::G6,Square::H6,
        Square::A5,Square::B5,Square::C5,Square::D5,Square::E5,Square::F5,Square::G5,Square::H5,
        Square::A4,Square::B4,Square::C4,Square::D4,Square::E4,Square::F4,Square::G4,Square::H4,
        Square::A3,Square::B3,Square::C3,Square::D3,Square::E3,Square::F3,Square::G3,Square::H3,
        Square::A2,Square::B2,Square::C2,Square::D2,Square::E2,Square::F2,Square::G2,Square::H2,
        Square::A1,Square::B1,Square::C1,Square::D1,Square::E1,Square::F1,Square::G1,Square::H1,
    ];

    /// Creates a new square from a file and a rank.
    pub fn new(file: File, rank: Rank) -> Square {
        Square(u8::from(rank) << 3 | u8::from(file))
    }

    /// Returns the storage rank of the square.
    pub fn rank(&self) -> Rank {
        (self.0 >> 3).into()
    }

    /// Returns the file of the square.
    pub fn file(&self) -> File {
        (self.0 & 0b111).into()
    }

    /// Returns the square `count` ranks toward the eighth rank, or an error off the board.
    ///
    /// A negative count moves toward the first rank.
    pub fn up(self, count: i8) -> Result<Square, CoordinatesError> {
        let rank = u8::from(self.rank()) as i8 - count;
        if (0..8).contains(&rank) {
            Ok(Square((rank as u8) << 3 | u8::from(self.file())))
        } else {
            Err(CoordinatesError::OffTheBoard)
        }
    }

    /// Returns the square `count` ranks toward the first rank, or an error off the board.
    pub fn down(self, count: i8) -> Result<Square, CoordinatesError> {
        self.up(-count)
    }

    /// Returns the square `count` files toward the a-file, or an error off the board.
    pub fn left(self, count: i8) -> Result<Square, CoordinatesError> {
        self.right(-count)
    }

    /// Returns the square `count` files toward the h-file, or an error off the board.
    pub fn right(self, count: i8) -> Result<Square, CoordinatesError> {
        let file = u8::from(self.file()) as i8 + count;
        if (0..8).contains(&file) {
            Ok(Square(u8::from(self.rank()) << 3 | file as u8))
        } else {
            Err(CoordinatesError::OffTheBoard)
        }
    }

    /// Returns the square `count` ranks ahead of this one from the given color's point of view.
    ///
    /// White pawns advance toward the eighth rank, black pawns toward the first.
    pub fn forward(self, color: Color, count: i8) -> Result<Square, CoordinatesError> {
        match color {
            Color::White => self.up(count),
            Color::Black => self.down(count),
        }
    }
}

impl Display for Square {
    /// Formats the square as a two-character string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl From<Square> for usize {
    fn from(square: Square) -> Self {
        square.0 as usize
    }
}

impl TryFrom<u8> for Square {
    type Error = CoordinatesError;

    /// Converts a raw board index to a `Square`, rejecting indexes outside 0..63.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < Square::COUNT as u8 {
            Ok(Square(value))
        } else {
            Err(CoordinatesError::InvalidSquare(value))
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = CoordinatesError;

    /// Parses a square from its two-character name, e.g. "e4".
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(CoordinatesError::InvalidSquareString(value.to_string())),
        };
        let file = File::try_from(file)
            .map_err(|_| CoordinatesError::InvalidSquareString(value.to_string()))?;
        let rank = Rank::try_from(rank)
            .map_err(|_| CoordinatesError::InvalidSquareString(value.to_string()))?;
        Ok(Square::new(file, rank))
    }
}
