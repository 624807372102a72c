use std::fmt::Display;

use thiserror::Error;

use crate::board::{AppliedMove, ApplyMode, GameState};
use crate::coordinates::Square;
use crate::move_gen::{game_outcome, is_in_check, legal_moves, GameOutcome};
use crate::notation::move_label;
use crate::piece::{Color, PieceType};
use crate::record::MoveRecord;

/// Errors reported by the session surface. All of them are caller-input validation; the engine
/// never partially applies a rejected move.
#[derive(Error, Debug, PartialEq)]
pub enum PlayError {
    /// The requested destination is not in the legal set for the origin square. This also covers
    /// an empty origin square and a piece of the side not to move.
    #[error("{from}{to} is not a legal move")]
    IllegalMove { from: Square, to: Square },

    /// A promotion choice is still outstanding; no other move can be played until
    /// [`Game::complete_promotion`] resolves it.
    #[error("a promotion choice is pending")]
    PromotionPending,

    /// [`Game::complete_promotion`] was called with no promotion outstanding.
    #[error("no promotion is pending")]
    NoPendingPromotion,

    /// The promotion choice is not one of knight, bishop, rook or queen.
    #[error("a pawn cannot promote to a {0}")]
    InvalidPromotion(PieceType),
}

/// The status reported to the status sink after each committed move or timeout event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
    WhiteWinsOnTime,
    BlackWinsOnTime,
}

impl From<GameOutcome> for GameStatus {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::InProgress => GameStatus::InProgress,
            GameOutcome::Check => GameStatus::Check,
            GameOutcome::Checkmate => GameStatus::Checkmate,
            GameOutcome::Stalemate => GameStatus::Stalemate,
        }
    }
}

impl GameStatus {
    /// True once no further moves can be played.
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress | GameStatus::Check)
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Check => write!(f, "Check"),
            GameStatus::Checkmate => write!(f, "Checkmate"),
            GameStatus::Stalemate => write!(f, "Stalemate"),
            GameStatus::WhiteWinsOnTime => write!(f, "White wins on time"),
            GameStatus::BlackWinsOnTime => write!(f, "Black wins on time"),
        }
    }
}

/// Supplies the piece a pawn promotes to.
///
/// When a chooser is registered the session resolves promotions synchronously during
/// [`Game::play`]; without one, `play` returns [`Played::PromotionPending`] and the host resumes
/// with [`Game::complete_promotion`] once its (possibly asynchronous) prompt resolves. Legality
/// probes never consult the chooser.
pub trait PromotionChooser {
    /// Returns one of knight, bishop, rook or queen for the pawn on `square`.
    fn choose(&mut self, square: Square, color: Color) -> PieceType;
}

/// Receives each committed move, for the host's move list display. The engine keeps no notation
/// itself.
pub trait NotationSink {
    fn on_move(&mut self, record: &MoveRecord);
}

/// Receives the game status after each committed move or timeout event.
pub trait StatusSink {
    fn on_status(&mut self, status: GameStatus);
}

/// The result of [`Game::play`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Played {
    /// The move is committed.
    Complete,
    /// A pawn reached the last rank and the session is waiting for
    /// [`Game::complete_promotion`].
    PromotionPending,
}

/// One game at one board.
///
/// The session exclusively owns its [`GameState`] and the undo stack of move records; nothing is
/// shared between sessions, and running several games means holding several `Game` values. All
/// play flows through the checked surface here: moves outside the legal set are rejected before
/// any state is touched.
pub struct Game {
    state: GameState,
    undo_stack: Vec<MoveRecord>,
    pending_promotion: Option<MoveRecord>,
    chooser: Option<Box<dyn PromotionChooser>>,
    notation_sink: Option<Box<dyn NotationSink>>,
    status_sink: Option<Box<dyn StatusSink>>,
}

impl Game {
    /// Creates a session at the standard starting position.
    pub fn new() -> Self {
        Self {
            state: GameState::new(),
            undo_stack: Vec::new(),
            pending_promotion: None,
            chooser: None,
            notation_sink: None,
            status_sink: None,
        }
    }

    /// Creates a session over a prepared position, for setups other than the standard start.
    pub fn with_state(state: GameState) -> Self {
        Self { state, ..Self::new() }
    }

    /// Registers a synchronous promotion chooser.
    pub fn with_promotion_chooser(mut self, chooser: Box<dyn PromotionChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Registers the sink that receives each committed move.
    pub fn with_notation_sink(mut self, sink: Box<dyn NotationSink>) -> Self {
        self.notation_sink = Some(sink);
        self
    }

    /// Registers the sink that receives the status after each committed move or timeout.
    pub fn with_status_sink(mut self, sink: Box<dyn StatusSink>) -> Self {
        self.status_sink = Some(sink);
        self
    }

    /// Returns the game state for display.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The committed moves so far, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.undo_stack
    }

    /// True while a promotion choice is outstanding.
    pub fn promotion_is_pending(&self) -> bool {
        self.pending_promotion.is_some()
    }

    /// Returns the legal destination squares for the piece on `from`.
    ///
    /// An empty square, or a piece of the side not to move, yields an empty set; the host treats
    /// that as "no selection possible".
    pub fn legal_moves(&mut self, from: Square) -> Vec<Square> {
        legal_moves(&mut self.state, from)
    }

    /// True if the side to move is in check.
    pub fn in_check(&self) -> bool {
        is_in_check(&self.state, self.state.side_to_move())
    }

    /// Evaluates where the game stands for the side to move.
    pub fn outcome(&mut self) -> GameOutcome {
        game_outcome(&mut self.state)
    }

    /// Plays a move.
    ///
    /// The destination must be in the legal set for `from`, otherwise the move is rejected with
    /// no state mutated. A pawn reaching the last rank completes immediately through a
    /// registered chooser, or suspends as [`Played::PromotionPending`] until
    /// [`complete_promotion`](Self::complete_promotion) is called.
    pub fn play(&mut self, from: Square, to: Square) -> Result<Played, PlayError> {
        if self.pending_promotion.is_some() {
            return Err(PlayError::PromotionPending);
        }
        if !self.legal_moves(from).contains(&to) {
            return Err(PlayError::IllegalMove { from, to });
        }

        match self.state.apply_move(from, to, ApplyMode::Commit) {
            AppliedMove::Complete(record) => {
                self.commit(record);
                Ok(Played::Complete)
            }
            AppliedMove::PromotionPending(mut record) => {
                let color = record.moving().color();
                if let Some(chooser) = self.chooser.as_mut() {
                    let choice = chooser.choose(to, color);
                    assert!(
                        choice.is_promotion_choice(),
                        "the promotion chooser returned a {}",
                        choice
                    );
                    self.state.promote_pawn(&mut record, choice);
                    self.commit(record);
                    Ok(Played::Complete)
                } else {
                    log::debug!("{} promotion pending on {}", color, to);
                    self.pending_promotion = Some(record);
                    Ok(Played::PromotionPending)
                }
            }
        }
    }

    /// Resolves the outstanding promotion with the chosen piece and commits the move.
    pub fn complete_promotion(&mut self, choice: PieceType) -> Result<(), PlayError> {
        if !choice.is_promotion_choice() {
            return Err(PlayError::InvalidPromotion(choice));
        }
        let mut record =
            self.pending_promotion.take().ok_or(PlayError::NoPendingPromotion)?;
        self.state.promote_pawn(&mut record, choice);
        self.commit(record);
        Ok(())
    }

    fn commit(&mut self, record: MoveRecord) {
        log::debug!("{} played {}", record.moving().color(), move_label(&record));

        if let Some(sink) = self.notation_sink.as_mut() {
            sink.on_move(&record);
        }
        self.undo_stack.push(record);

        let status = GameStatus::from(game_outcome(&mut self.state));
        if status.is_game_over() {
            log::info!("game over: {}", status);
        }
        if let Some(sink) = self.status_sink.as_mut() {
            sink.on_status(status);
        }
    }

    /// Reverts the most recent move. With no history this is a no-op returning `false`.
    ///
    /// A pending promotion counts as the most recent move: undoing it cancels the half-applied
    /// pawn move instead of touching the committed history.
    pub fn undo(&mut self) -> bool {
        if let Some(record) = self.pending_promotion.take() {
            self.state.unapply_move(record);
            return true;
        }
        match self.undo_stack.pop() {
            Some(record) => {
                log::debug!("undid {}{}", record.from_square(), record.to_square());
                self.state.unapply_move(record);
                true
            }
            None => false,
        }
    }

    /// Starts a new game: standard position, empty history, no pending promotion.
    pub fn reset(&mut self) {
        log::info!("new game");
        self.state.reset();
        self.undo_stack.clear();
        self.pending_promotion = None;
    }

    /// Reports that `loser` ran out of time, pushing the on-time status to the status sink.
    ///
    /// The clock is driven by the host; the engine itself never reads it.
    pub fn report_timeout(&mut self, loser: Color) -> GameStatus {
        let status = match loser {
            Color::White => GameStatus::BlackWinsOnTime,
            Color::Black => GameStatus::WhiteWinsOnTime,
        };
        log::info!("game over: {}", status);
        if let Some(sink) = self.status_sink.as_mut() {
            sink.on_status(status);
        }
        status
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::castling::CastlingRights;
    use crate::piece::Piece;
    use crate::record::Special;

    struct FixedChooser(PieceType);

    impl PromotionChooser for FixedChooser {
        fn choose(&mut self, _square: Square, _color: Color) -> PieceType {
            self.0
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        labels: Rc<RefCell<Vec<String>>>,
        statuses: Rc<RefCell<Vec<GameStatus>>>,
    }

    impl NotationSink for Recorder {
        fn on_move(&mut self, record: &MoveRecord) {
            self.labels.borrow_mut().push(move_label(record));
        }
    }

    impl StatusSink for Recorder {
        fn on_status(&mut self, status: GameStatus) {
            self.statuses.borrow_mut().push(status);
        }
    }

    #[test]
    fn test_playing_a_legal_move() {
        let mut game = Game::new();
        assert_eq!(game.play(Square::E2, Square::E4), Ok(Played::Complete));
        assert_eq!(game.state()[Square::E4], Some(Piece::WHITE_PAWN));
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_illegal_moves_are_rejected_without_mutation() {
        let mut game = Game::new();
        let before = game.state().clone();

        assert_eq!(
            game.play(Square::E2, Square::E5),
            Err(PlayError::IllegalMove { from: Square::E2, to: Square::E5 })
        );
        // An opponent piece and an empty square are rejected the same way.
        assert!(game.play(Square::E7, Square::E5).is_err());
        assert!(game.play(Square::E4, Square::E5).is_err());

        assert_eq!(game.state(), &before);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_undo_restores_the_previous_position() {
        let mut game = Game::new();
        let before = game.state().clone();

        game.play(Square::E2, Square::E4).unwrap();
        game.play(Square::E7, Square::E5).unwrap();
        assert!(game.undo());
        assert!(game.undo());

        assert_eq!(game.state(), &before);
        assert!(!game.undo(), "an empty history undo must be a no-op");
    }

    #[test]
    fn test_promotion_through_a_registered_chooser() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_KING, Square::E1);
        state.place(Piece::BLACK_KING, Square::H5);
        state.place(Piece::WHITE_PAWN, Square::A7);

        let mut game = Game::with_state(state)
            .with_promotion_chooser(Box::new(FixedChooser(PieceType::Knight)));
        assert_eq!(game.play(Square::A7, Square::A8), Ok(Played::Complete));
        assert_eq!(game.state()[Square::A8], Some(Piece::WHITE_KNIGHT));

        assert!(game.undo());
        assert_eq!(game.state()[Square::A7], Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn test_promotion_suspends_without_a_chooser() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_KING, Square::E1);
        state.place(Piece::BLACK_KING, Square::H5);
        state.place(Piece::WHITE_PAWN, Square::A7);

        let mut game = Game::with_state(state);
        assert_eq!(game.play(Square::A7, Square::A8), Ok(Played::PromotionPending));
        assert!(game.promotion_is_pending());

        // Nothing else may be played while the choice is outstanding.
        assert_eq!(game.play(Square::E1, Square::E2), Err(PlayError::PromotionPending));
        assert_eq!(game.complete_promotion(PieceType::King), Err(PlayError::InvalidPromotion(PieceType::King)));

        game.complete_promotion(PieceType::Queen).unwrap();
        assert_eq!(game.state()[Square::A8], Some(Piece::WHITE_QUEEN));
        assert!(!game.promotion_is_pending());
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_completing_without_a_pending_promotion_fails() {
        let mut game = Game::new();
        assert_eq!(game.complete_promotion(PieceType::Queen), Err(PlayError::NoPendingPromotion));
    }

    #[test]
    fn test_undo_cancels_a_pending_promotion() {
        let mut state = GameState::empty();
        state.place(Piece::WHITE_KING, Square::E1);
        state.place(Piece::BLACK_KING, Square::H5);
        state.place(Piece::WHITE_PAWN, Square::A7);
        let before = state.clone();

        let mut game = Game::with_state(state);
        game.play(Square::A7, Square::A8).unwrap();
        assert!(game.undo());

        assert_eq!(game.state(), &before);
        assert!(game.history().is_empty());
        assert!(!game.promotion_is_pending());
    }

    #[test]
    fn test_sinks_receive_moves_and_statuses() {
        let recorder = Recorder::default();
        let mut game = Game::new()
            .with_notation_sink(Box::new(recorder.clone()))
            .with_status_sink(Box::new(recorder.clone()));

        game.play(Square::E2, Square::E4).unwrap();
        game.play(Square::E7, Square::E5).unwrap();
        game.play(Square::D1, Square::H5).unwrap();
        game.play(Square::B8, Square::C6).unwrap();
        game.play(Square::H5, Square::F7).unwrap();

        assert_eq!(
            *recorder.labels.borrow(),
            vec!["e4", "e5", "Qh5", "Nc6", "Qxf7"]
        );
        assert_eq!(
            *recorder.statuses.borrow(),
            vec![
                GameStatus::InProgress,
                GameStatus::InProgress,
                GameStatus::InProgress,
                GameStatus::InProgress,
                GameStatus::Check,
            ]
        );
    }

    #[test]
    fn test_fools_mate_reports_checkmate() {
        let recorder = Recorder::default();
        let mut game = Game::new().with_status_sink(Box::new(recorder.clone()));

        game.play(Square::F2, Square::F3).unwrap();
        game.play(Square::E7, Square::E5).unwrap();
        game.play(Square::G2, Square::G4).unwrap();
        game.play(Square::D8, Square::H4).unwrap();

        assert_eq!(recorder.statuses.borrow().last(), Some(&GameStatus::Checkmate));
        assert_eq!(game.outcome(), crate::move_gen::GameOutcome::Checkmate);
    }

    #[test]
    fn test_timeout_reporting() {
        let recorder = Recorder::default();
        let mut game = Game::new().with_status_sink(Box::new(recorder.clone()));

        assert_eq!(game.report_timeout(Color::White), GameStatus::BlackWinsOnTime);
        assert_eq!(game.report_timeout(Color::Black), GameStatus::WhiteWinsOnTime);
        assert_eq!(
            *recorder.statuses.borrow(),
            vec![GameStatus::BlackWinsOnTime, GameStatus::WhiteWinsOnTime]
        );
    }

    #[test]
    fn test_reset_starts_over() {
        let mut game = Game::new();
        game.play(Square::E2, Square::E4).unwrap();
        game.reset();

        assert_eq!(game.state(), &GameState::new());
        assert!(game.history().is_empty());
        assert_eq!(game.state().castling_rights(), CastlingRights::all());
    }

    #[test]
    fn test_castling_through_the_session() {
        let mut game = Game::new();
        game.play(Square::E2, Square::E4).unwrap();
        game.play(Square::E7, Square::E5).unwrap();
        game.play(Square::G1, Square::F3).unwrap();
        game.play(Square::B8, Square::C6).unwrap();
        game.play(Square::F1, Square::C4).unwrap();
        game.play(Square::G8, Square::F6).unwrap();
        game.play(Square::E1, Square::G1).unwrap();

        assert_eq!(game.history().last().unwrap().special(), Special::CastleKingside);
        assert_eq!(game.state()[Square::G1], Some(Piece::WHITE_KING));
        assert_eq!(game.state()[Square::F1], Some(Piece::WHITE_ROOK));
    }
}
