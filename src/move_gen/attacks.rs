use once_cell::sync::Lazy;

use crate::board::GameState;
use crate::coordinates::{CoordinatesError, File, Rank, Square};
use crate::piece::{Color, PieceType};

/// A single-step move along one direction, failing off the board.
pub(crate) type Direction = fn(Square) -> Result<Square, CoordinatesError>;

pub(crate) const ROOK_DIRECTIONS: [Direction; 4] = [
    |square| square.up(1),
    |square| square.down(1),
    |square| square.left(1),
    |square| square.right(1),
];

pub(crate) const BISHOP_DIRECTIONS: [Direction; 4] = [
    |square| square.up(1).and_then(|square| square.left(1)),
    |square| square.up(1).and_then(|square| square.right(1)),
    |square| square.down(1).and_then(|square| square.left(1)),
    |square| square.down(1).and_then(|square| square.right(1)),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] =
    [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];

const KING_OFFSETS: [(i8, i8); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

fn step_table(offsets: &[(i8, i8)]) -> [Vec<Square>; Square::COUNT] {
    std::array::from_fn(|index| {
        let from = Square::ALL[index];
        let row = u8::from(from.rank()) as i8;
        let column = u8::from(from.file()) as i8;
        offsets
            .iter()
            .filter_map(|&(row_step, column_step)| {
                let (row, column) = (row + row_step, column + column_step);
                ((0..8).contains(&row) && (0..8).contains(&column))
                    .then(|| Square::new(File::from(column as u8), Rank::from(row as u8)))
            })
            .collect()
    })
}

static KNIGHT_STEPS: Lazy<[Vec<Square>; Square::COUNT]> =
    Lazy::new(|| step_table(&KNIGHT_OFFSETS));

static KING_STEPS: Lazy<[Vec<Square>; Square::COUNT]> = Lazy::new(|| step_table(&KING_OFFSETS));

/// Returns the squares a knight on `from` jumps to.
pub(crate) fn knight_steps(from: Square) -> &'static [Square] {
    &KNIGHT_STEPS[usize::from(from)]
}

/// Returns the squares adjacent to `from`.
pub(crate) fn king_steps(from: Square) -> &'static [Square] {
    &KING_STEPS[usize::from(from)]
}

/// Walks each direction from `from` and reports whether `target` is reached before any occupied
/// square blocks the ray. The target square itself may be occupied or empty; attack coverage
/// does not depend on what stands there.
fn ray_reaches(state: &GameState, from: Square, target: Square, directions: &[Direction]) -> bool {
    for step in directions {
        let mut current = from;
        while let Ok(next) = step(current) {
            if next == target {
                return true;
            }
            if state[next].is_some() {
                break;
            }
            current = next;
        }
    }
    false
}

/// A pawn attacks exactly its two forward diagonals, occupied or not; pushes attack nothing.
fn pawn_attacks(from: Square, color: Color, target: Square) -> bool {
    let ahead = match from.forward(color, 1) {
        Ok(square) => square,
        Err(_) => return false,
    };
    ahead.left(1) == Ok(target) || ahead.right(1) == Ok(target)
}

/// Determines whether any piece of `by` attacks `target`.
///
/// Every square is scanned and each piece of the attacking color is tested for pseudo-reach with
/// the same ray and jump logic move generation uses, minus any legality concern. This is
/// O(64 x per-piece cost), which is all this board needs.
pub fn is_square_attacked(state: &GameState, target: Square, by: Color) -> bool {
    for from in Square::ALL {
        let piece = match state[from] {
            Some(piece) if piece.color() == by => piece,
            _ => continue,
        };

        let reaches = match piece.piece_type() {
            PieceType::Pawn => pawn_attacks(from, by, target),
            PieceType::Knight => knight_steps(from).contains(&target),
            PieceType::King => king_steps(from).contains(&target),
            PieceType::Bishop => ray_reaches(state, from, target, &BISHOP_DIRECTIONS),
            PieceType::Rook => ray_reaches(state, from, target, &ROOK_DIRECTIONS),
            PieceType::Queen => {
                ray_reaches(state, from, target, &ROOK_DIRECTIONS)
                    || ray_reaches(state, from, target, &BISHOP_DIRECTIONS)
            }
        };

        if reaches {
            return true;
        }
    }
    false
}

/// Determines whether the king of `color` is attacked by the opponent.
///
/// # Panics
/// Panics if that king is missing from the board.
pub fn is_in_check(state: &GameState, color: Color) -> bool {
    is_square_attacked(state, state.king_square(color), !color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    #[test]
    fn test_knight_step_counts() {
        assert_eq!(knight_steps(Square::A1).len(), 2);
        assert_eq!(knight_steps(Square::B1).len(), 3);
        assert_eq!(knight_steps(Square::E4).len(), 8);
        assert_eq!(knight_steps(Square::H8).len(), 2);
    }

    #[test]
    fn test_king_step_counts() {
        assert_eq!(king_steps(Square::A1).len(), 3);
        assert_eq!(king_steps(Square::E1).len(), 5);
        assert_eq!(king_steps(Square::E4).len(), 8);
    }

    #[test]
    fn test_rook_attacks_along_open_lines() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_ROOK, Square::E4);

        assert!(is_square_attacked(&state, Square::E8, Color::White));
        assert!(is_square_attacked(&state, Square::A4, Color::White));
        assert!(is_square_attacked(&state, Square::E1, Color::White));
        assert!(!is_square_attacked(&state, Square::D5, Color::White));
    }

    #[test]
    fn test_rook_rays_stop_at_the_first_occupied_square() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_ROOK, Square::E4);
        state.place(Piece::BLACK_PAWN, Square::E6);

        assert!(is_square_attacked(&state, Square::E6, Color::White));
        assert!(!is_square_attacked(&state, Square::E7, Color::White));
        assert!(!is_square_attacked(&state, Square::E8, Color::White));
    }

    #[test]
    fn test_bishop_and_queen_diagonals() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_BISHOP, Square::C1);
        state.place(Piece::BLACK_QUEEN, Square::D8);

        assert!(is_square_attacked(&state, Square::H6, Color::White));
        assert!(is_square_attacked(&state, Square::A3, Color::White));
        assert!(!is_square_attacked(&state, Square::C4, Color::White));

        assert!(is_square_attacked(&state, Square::D1, Color::Black));
        assert!(is_square_attacked(&state, Square::H4, Color::Black));
    }

    #[test]
    fn test_pawn_attacks_diagonals_only() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_PAWN, Square::E4);

        // The forward square is not attacked, the diagonals are, even while empty.
        assert!(!is_square_attacked(&state, Square::E5, Color::White));
        assert!(is_square_attacked(&state, Square::D5, Color::White));
        assert!(is_square_attacked(&state, Square::F5, Color::White));
        assert!(!is_square_attacked(&state, Square::D3, Color::White));

        let mut state = GameState::empty();
        state.place(Piece::BLACK_PAWN, Square::E5);
        assert!(is_square_attacked(&state, Square::D4, Color::Black));
        assert!(is_square_attacked(&state, Square::F4, Color::Black));
        assert!(!is_square_attacked(&state, Square::E4, Color::Black));
    }

    #[test]
    fn test_knight_jumps_ignore_blockers() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_KNIGHT, Square::B1);
        state.place(Piece::WHITE_PAWN, Square::C2);
        state.place(Piece::BLACK_PAWN, Square::C3);

        assert!(is_square_attacked(&state, Square::C3, Color::White));
        assert!(is_square_attacked(&state, Square::A3, Color::White));
        assert!(is_square_attacked(&state, Square::D2, Color::White));
        assert!(!is_square_attacked(&state, Square::B3, Color::White));
    }

    #[test]
    fn test_start_position_pawn_cover() {
        let state = GameState::new();
        assert!(!is_square_attacked(&state, Square::E4, Color::White));
        assert!(!is_square_attacked(&state, Square::E5, Color::Black));
        // Third-rank squares are covered by the pawns on the second rank.
        assert!(is_square_attacked(&state, Square::E3, Color::White));
        assert!(is_square_attacked(&state, Square::E6, Color::Black));
    }

    #[test]
    fn test_is_in_check() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_KING, Square::E1);
        state.place(Piece::BLACK_KING, Square::E8);
        state.place(Piece::BLACK_ROOK, Square::E5);

        assert!(is_in_check(&state, Color::White));
        assert!(!is_in_check(&state, Color::Black));

        // Interpose a piece and the check disappears.
        state.place(Piece::WHITE_BISHOP, Square::E3);
        assert!(!is_in_check(&state, Color::White));
    }
}
