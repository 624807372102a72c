use crate::board::{AppliedMove, ApplyMode, GameState};
use crate::castling::{CastlingRights, CastlingSide};
use crate::coordinates::{File, Rank, Square};
use crate::piece::{Color, PieceType};

use super::attacks::{
    is_in_check, is_square_attacked, king_steps, knight_steps, Direction, BISHOP_DIRECTIONS,
    ROOK_DIRECTIONS,
};

/// Where the game stands for the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
}

/// Generates the pseudo-legal target squares for the piece on `from`.
///
/// A pseudo-legal move respects the piece's movement pattern and occupancy rules but ignores
/// whether it would leave the mover's own king in check; [`legal_moves`] applies that filter.
/// An empty square yields an empty set.
pub fn pseudo_moves(state: &GameState, from: Square) -> Vec<Square> {
    let piece = match state[from] {
        Some(piece) => piece,
        None => return Vec::new(),
    };
    let color = piece.color();
    let mut targets = Vec::new();

    match piece.piece_type() {
        PieceType::Pawn => pawn_moves(state, from, color, &mut targets),
        PieceType::Knight => step_moves(state, knight_steps(from), color, &mut targets),
        PieceType::Bishop => ray_moves(state, from, color, &BISHOP_DIRECTIONS, &mut targets),
        PieceType::Rook => ray_moves(state, from, color, &ROOK_DIRECTIONS, &mut targets),
        PieceType::Queen => {
            ray_moves(state, from, color, &ROOK_DIRECTIONS, &mut targets);
            ray_moves(state, from, color, &BISHOP_DIRECTIONS, &mut targets);
        }
        PieceType::King => {
            step_moves(state, king_steps(from), color, &mut targets);
            castling_moves(state, from, color, &mut targets);
        }
    }

    targets
}

fn step_moves(state: &GameState, steps: &[Square], color: Color, targets: &mut Vec<Square>) {
    for &to in steps {
        if state[to].map_or(true, |piece| piece.color() != color) {
            targets.push(to);
        }
    }
}

fn ray_moves(
    state: &GameState,
    from: Square,
    color: Color,
    directions: &[Direction],
    targets: &mut Vec<Square>,
) {
    for step in directions {
        let mut current = from;
        while let Ok(next) = step(current) {
            match state[next] {
                None => {
                    targets.push(next);
                    current = next;
                }
                Some(piece) => {
                    if piece.color() != color {
                        targets.push(next);
                    }
                    break;
                }
            }
        }
    }
}

fn pawn_moves(state: &GameState, from: Square, color: Color, targets: &mut Vec<Square>) {
    // Pushes never capture.
    if let Ok(one) = from.forward(color, 1) {
        if state[one].is_none() {
            targets.push(one);
            if from.rank() == Rank::R2.relative_to_color(color) {
                if let Ok(two) = from.forward(color, 2) {
                    if state[two].is_none() {
                        targets.push(two);
                    }
                }
            }
        }
    }

    // Diagonal captures onto enemy-occupied squares.
    for capture in [
        from.forward(color, 1).and_then(|square| square.left(1)),
        from.forward(color, 1).and_then(|square| square.right(1)),
    ] {
        if let Ok(to) = capture {
            if state[to].is_some_and(|piece| piece.color() != color) {
                targets.push(to);
            }
        }
    }

    // En passant: the capturing pawn must stand on the rank beside the pushed pawn, one file
    // over from the recorded capture window. The landed-on square is known empty because the
    // pushed pawn just passed through it.
    if let Some(file) = state.en_passant_file() {
        if from.rank() == Rank::R5.relative_to_color(color) && from.file().distance(file) == 1 {
            targets.push(Square::new(file, Rank::R6.relative_to_color(color)));
        }
    }
}

/// Adds castling targets while generating king moves.
///
/// A castle needs the right latch still set, every square between king and rook empty, and
/// neither the king's square nor the square it transits attacked. The landing square is vetted
/// by the ordinary legality filter like any other king move, and the rook's presence on its
/// corner is implied by the right being set.
fn castling_moves(state: &GameState, from: Square, color: Color, targets: &mut Vec<Square>) {
    let back = Rank::R1.relative_to_color(color);
    if from != Square::new(File::E, back) || is_in_check(state, color) {
        return;
    }
    let opponent = !color;

    if state.castling_rights().contains(CastlingRights::new(color, CastlingSide::Kingside)) {
        let transit = Square::new(File::F, back);
        let landing = Square::new(File::G, back);
        if state[transit].is_none()
            && state[landing].is_none()
            && !is_square_attacked(state, transit, opponent)
        {
            targets.push(landing);
        }
    }

    if state.castling_rights().contains(CastlingRights::new(color, CastlingSide::Queenside)) {
        let rook_neighbor = Square::new(File::B, back);
        let landing = Square::new(File::C, back);
        let transit = Square::new(File::D, back);
        if state[rook_neighbor].is_none()
            && state[landing].is_none()
            && state[transit].is_none()
            && !is_square_attacked(state, transit, opponent)
        {
            targets.push(landing);
        }
    }
}

/// Generates the legal target squares for the piece on `from`.
///
/// Each pseudo-legal move is applied in simulation mode, tested for leaving the mover's king in
/// check, and reverted; the simulate/revert pair leaves the state bit-for-bit identical. Squares
/// not holding a piece of the side to move yield an empty set.
pub fn legal_moves(state: &mut GameState, from: Square) -> Vec<Square> {
    let mover = match state[from] {
        Some(piece) if piece.color() == state.side_to_move() => piece,
        _ => return Vec::new(),
    };
    let color = mover.color();

    pseudo_moves(state, from)
        .into_iter()
        .filter(|&to| {
            let record = match state.apply_move(from, to, ApplyMode::Simulate) {
                AppliedMove::Complete(record) => record,
                AppliedMove::PromotionPending(_) => {
                    unreachable!("a simulated application never suspends")
                }
            };
            let leaves_check = is_in_check(state, color);
            state.unapply_move(record);
            !leaves_check
        })
        .collect()
}

/// Evaluates where the game stands for the side to move.
///
/// If any piece of the side to move has a legal move the game continues (`Check` when the king
/// is attacked); with no legal move anywhere it is `Checkmate` under attack and `Stalemate`
/// otherwise.
pub fn game_outcome(state: &mut GameState) -> GameOutcome {
    let side = state.side_to_move();

    let mut any_legal = false;
    for from in Square::ALL {
        if state[from].is_some_and(|piece| piece.color() == side)
            && !legal_moves(state, from).is_empty()
        {
            any_legal = true;
            break;
        }
    }

    match (any_legal, is_in_check(state, side)) {
        (true, false) => GameOutcome::InProgress,
        (true, true) => GameOutcome::Check,
        (false, true) => GameOutcome::Checkmate,
        (false, false) => GameOutcome::Stalemate,
    }
}
