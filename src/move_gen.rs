pub mod attacks;
pub mod generation;

pub use attacks::{is_in_check, is_square_attacked};
pub use generation::{game_outcome, legal_moves, pseudo_moves, GameOutcome};
