//! Live game: selection handling, human and computer moves, status.
//!
//! The controller is the only owner of the live [`GameState`]. Every move
//! that reaches it has been checked against the legal move list first.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::engines::engine_trait::Engine;
use crate::engines::strength::Strength;
use crate::errors::{GameError, GameResult};
use crate::game_state::chess_types::{Color, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::{
    find_legal_move, game_outcome, legal_moves, legal_moves_from, GameOutcome,
};
use crate::moves::move_descriptions::Move;
use crate::uci::uci_adapter::{ChosenMove, ExternalEngineAdapter, MoveSource};
use crate::utils::algebraic::square_to_algebraic;
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub vs_computer: bool,
    pub computer_color: Color,
    pub strength: Strength,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            vs_computer: true,
            computer_color: Color::Dark,
            strength: Strength::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    AwaitingSelection,
    Check,
    Checkmate { winner: Color },
    Stalemate,
    ComputerThinking,
    EngineUnavailable,
}

impl GameStatus {
    pub fn status_text(self) -> String {
        match self {
            GameStatus::AwaitingSelection => "Select a piece to move.".to_owned(),
            GameStatus::Check => "Check.".to_owned(),
            GameStatus::Checkmate { winner } => format!("Checkmate. {} wins.", winner.name()),
            GameStatus::Stalemate => "Stalemate.".to_owned(),
            GameStatus::ComputerThinking => "Computer is thinking...".to_owned(),
            GameStatus::EngineUnavailable => "External engine unavailable, using backup AI.".to_owned(),
        }
    }

    #[inline]
    pub fn is_game_over(self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

/// Result of a square click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected { square: Square, targets: Vec<Square> },
    Moved(Move),
    Cleared,
    Ignored,
}

pub struct GameController {
    settings: ControllerSettings,
    initial: GameState,
    state: GameState,
    outcome: GameOutcome,
    selected: Option<Square>,
    last_move: Option<Move>,
    computer_pending: bool,
    engine_unavailable: bool,
}

impl GameController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self::from_state(settings, GameState::new_game())
    }

    /// Start from an arbitrary position; `reset` returns to it.
    pub fn from_state(settings: ControllerSettings, state: GameState) -> Self {
        Self {
            settings,
            initial: state,
            state,
            outcome: game_outcome(&state),
            selected: None,
            last_move: None,
            computer_pending: false,
            engine_unavailable: false,
        }
    }

    pub fn reset(&mut self) {
        self.state = self.initial;
        self.outcome = game_outcome(&self.state);
        self.selected = None;
        self.last_move = None;
        self.computer_pending = false;
        self.engine_unavailable = false;
        debug!("game reset");
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn settings(&self) -> ControllerSettings {
        self.settings
    }

    #[inline]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn status(&self) -> GameStatus {
        match self.outcome {
            GameOutcome::Checkmate { winner } => GameStatus::Checkmate { winner },
            GameOutcome::Stalemate => GameStatus::Stalemate,
            _ if self.computer_pending && self.engine_unavailable => GameStatus::EngineUnavailable,
            _ if self.computer_pending => GameStatus::ComputerThinking,
            GameOutcome::InProgress { in_check: true } => GameStatus::Check,
            // Kept after the backup move until the human moves again.
            _ if self.engine_unavailable => GameStatus::EngineUnavailable,
            GameOutcome::InProgress { in_check: false } => GameStatus::AwaitingSelection,
        }
    }

    #[inline]
    pub fn status_text(&self) -> String {
        self.status().status_text()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    #[inline]
    pub fn is_computer_pending(&self) -> bool {
        self.computer_pending
    }

    /// Destinations of the selected piece.
    pub fn legal_targets(&self) -> Vec<Square> {
        match self.selected {
            Some(from) => legal_moves_from(&self.state, from).into_iter().map(|mv| mv.to).collect(),
            None => Vec::new(),
        }
    }

    /// Click handling: select an own piece, move the selected piece, switch
    /// selection or clear it. Anything else is ignored.
    pub fn select_square(&mut self, square: Square) -> GameResult<SelectionOutcome> {
        self.check_human_may_act()?;
        if self.is_computer_turn() {
            return Ok(SelectionOutcome::Ignored);
        }

        let own_piece = self.state.board.color_on(square) == Some(self.state.side_to_move);
        match self.selected {
            Some(from) if from == square => {
                self.selected = None;
                Ok(SelectionOutcome::Cleared)
            }
            Some(from) => {
                if let Some(mv) = find_legal_move(&self.state, from, square) {
                    self.play_human(mv);
                    Ok(SelectionOutcome::Moved(mv))
                } else if own_piece {
                    Ok(self.select(square))
                } else {
                    self.selected = None;
                    Ok(SelectionOutcome::Cleared)
                }
            }
            None if own_piece => Ok(self.select(square)),
            None => Ok(SelectionOutcome::Ignored),
        }
    }

    /// Play `from -> to` for the human side. A move that is not legal here
    /// is ignored and leaves the game unchanged.
    ///
    /// Rejected with [`GameError::ComputerMovePending`] when it is the
    /// computer's turn but its move has not been requested yet.
    pub fn submit_move(&mut self, from: Square, to: Square) -> GameResult<SelectionOutcome> {
        self.check_human_may_act()?;
        if self.is_computer_turn() {
            return Err(GameError::ComputerMovePending);
        }
        let Some(mv) = find_legal_move(&self.state, from, to) else {
            debug!(
                from = %square_to_algebraic(from),
                to = %square_to_algebraic(to),
                "ignored illegal move"
            );
            return Ok(SelectionOutcome::Ignored);
        };
        self.play_human(mv);
        Ok(SelectionOutcome::Moved(mv))
    }

    pub fn is_computer_turn(&self) -> bool {
        self.settings.vs_computer
            && self.state.side_to_move == self.settings.computer_color
            && !self.outcome.is_terminal()
    }

    /// Mark a computer move as pending and hand out the position to search.
    pub fn begin_computer_turn(&mut self) -> GameResult<GameState> {
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver);
        }
        if self.computer_pending {
            return Err(GameError::ComputerMovePending);
        }
        if !self.is_computer_turn() {
            return Err(GameError::NotComputerTurn);
        }
        self.computer_pending = true;
        self.selected = None;
        Ok(self.state)
    }

    /// Show the backup-engine notice; it stays up until the next human move.
    pub fn report_engine_unavailable(&mut self) {
        if self.computer_pending {
            self.engine_unavailable = true;
        }
    }

    pub fn commit_computer_move(&mut self, mv: Move) -> GameResult<()> {
        if !self.computer_pending {
            return Err(GameError::NoComputerTurnPending);
        }
        if !legal_moves(&self.state).contains(&mv) {
            return Err(GameError::IllegalMove(move_to_long_algebraic(mv)));
        }
        self.play(mv);
        Ok(())
    }

    pub fn cancel_computer_turn(&mut self) {
        self.computer_pending = false;
        self.engine_unavailable = false;
    }

    pub fn set_vs_computer(&mut self, vs_computer: bool) {
        self.settings.vs_computer = vs_computer;
        if !vs_computer {
            self.cancel_computer_turn();
        }
    }

    /// Takes effect on the next computer turn.
    pub fn set_strength(&mut self, strength: Strength) {
        self.settings.strength = strength;
    }

    /// Full computer turn: ask the adapter (which falls back on its own) and
    /// play the answer. Both engines are brought to the current strength
    /// first.
    pub fn play_computer_move(
        &mut self,
        adapter: &mut ExternalEngineAdapter,
        fallback: &mut dyn Engine,
    ) -> GameResult<ChosenMove> {
        let snapshot = self.begin_computer_turn()?;
        self.sync_strength(adapter, fallback);
        if !adapter.ensure_ready(Instant::now()) && adapter.is_unavailable() {
            self.report_engine_unavailable();
            info!(status = %self.status_text(), "computer turn");
        }

        let Some(chosen) = adapter.choose_move(&snapshot, fallback) else {
            self.cancel_computer_turn();
            return Err(GameError::NoMoveAvailable);
        };
        // The engine may also drop out during the request itself.
        if chosen.source == MoveSource::Fallback && adapter.is_unavailable() {
            self.report_engine_unavailable();
        }
        if let Err(e) = self.commit_computer_move(chosen.mv) {
            self.cancel_computer_turn();
            return Err(e);
        }
        Ok(chosen)
    }

    fn sync_strength(&self, adapter: &mut ExternalEngineAdapter, fallback: &mut dyn Engine) {
        let strength = self.settings.strength;
        if adapter.strength() != strength {
            adapter.set_strength(strength);
        }
        let rating = strength.rating.to_string();
        if let Err(e) = fallback.set_option("UCI_Elo", &rating) {
            warn!(engine = fallback.name(), error = %e, "fallback engine rejected rating");
        }
    }

    fn check_human_may_act(&self) -> GameResult<()> {
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver);
        }
        if self.computer_pending {
            return Err(GameError::ComputerMovePending);
        }
        Ok(())
    }

    fn select(&mut self, square: Square) -> SelectionOutcome {
        self.selected = Some(square);
        SelectionOutcome::Selected {
            square,
            targets: self.legal_targets(),
        }
    }

    fn play_human(&mut self, mv: Move) {
        self.engine_unavailable = false;
        self.play(mv);
    }

    fn play(&mut self, mv: Move) {
        self.state = apply_move(&self.state, mv);
        self.outcome = game_outcome(&self.state);
        self.last_move = Some(mv);
        self.selected = None;
        self.computer_pending = false;
        debug!(mv = %move_to_long_algebraic(mv), fen = %self.state.get_fen(), "move played");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;
    use std::time::Duration;

    use super::*;
    use crate::engines::engine_fallback::FallbackEngine;
    use crate::search::transposition_table::TranspositionTable;
    use crate::uci::engine_channel::ScriptedChannel;
    use crate::uci::uci_adapter::AdapterTimeouts;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    fn two_player() -> GameController {
        GameController::new(ControllerSettings {
            vs_computer: false,
            ..ControllerSettings::default()
        })
    }

    #[test]
    fn select_then_move() {
        let mut game = two_player();
        assert_eq!(game.status_text(), "Select a piece to move.");

        let outcome = game.select_square(sq("e2")).expect("game in progress");
        let SelectionOutcome::Selected { square, targets } = outcome else {
            panic!("expected a selection, got {outcome:?}");
        };
        assert_eq!(square, sq("e2"));
        assert_eq!(targets.len(), 2);

        let outcome = game.select_square(sq("e4")).expect("game in progress");
        assert!(matches!(outcome, SelectionOutcome::Moved(mv) if mv.to == sq("e4")));
        assert_eq!(game.side_to_move(), Color::Dark);
        assert_eq!(game.selected(), None);
        assert!(game.last_move().is_some());
    }

    #[test]
    fn reselect_clear_and_ignore() {
        let mut game = two_player();
        assert_eq!(game.select_square(sq("e7")), Ok(SelectionOutcome::Ignored));
        assert_eq!(game.select_square(sq("e5")), Ok(SelectionOutcome::Ignored));

        game.select_square(sq("g1")).expect("in progress");
        let outcome = game.select_square(sq("b1")).expect("in progress");
        assert!(matches!(outcome, SelectionOutcome::Selected { square, .. } if square == sq("b1")));

        assert_eq!(game.select_square(sq("b1")), Ok(SelectionOutcome::Cleared));
        game.select_square(sq("b1")).expect("in progress");
        assert_eq!(game.select_square(sq("h5")), Ok(SelectionOutcome::Cleared));
        assert_eq!(game.state(), &GameState::new_game());
    }

    #[test]
    fn illegal_submission_leaves_state_untouched() {
        let mut game = two_player();
        let before = *game.state();
        assert_eq!(
            game.submit_move(sq("e2"), sq("e5")),
            Ok(SelectionOutcome::Ignored)
        );
        assert_eq!(game.submit_move(sq("e7"), sq("e5")), Ok(SelectionOutcome::Ignored));
        assert_eq!(game.state(), &before);
        assert_eq!(game.last_move(), None);
    }

    #[test]
    fn checkmate_ends_the_game() {
        let mut game = two_player();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            game.submit_move(sq(from), sq(to)).expect("legal move");
        }
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Dark });
        assert_eq!(game.status_text(), "Checkmate. Black wins.");
        assert_eq!(game.submit_move(sq("a2"), sq("a3")), Err(GameError::GameOver));
        assert_eq!(game.select_square(sq("a2")), Err(GameError::GameOver));

        game.reset();
        assert_eq!(game.state(), &GameState::new_game());
        assert_eq!(game.status(), GameStatus::AwaitingSelection);
    }

    #[test]
    fn check_status() {
        let mut game = two_player();
        for (from, to) in [("e2", "e4"), ("f7", "f6"), ("d1", "h5")] {
            game.submit_move(sq(from), sq(to)).expect("legal move");
        }
        assert_eq!(game.status_text(), "Check.");
    }

    #[test]
    fn pending_computer_move_blocks_human_input() {
        let mut game = GameController::new(ControllerSettings::default());
        game.submit_move(sq("e2"), sq("e4")).expect("human plays white");
        assert!(game.is_computer_turn());
        assert_eq!(
            game.submit_move(sq("e7"), sq("e5")),
            Err(GameError::ComputerMovePending)
        );
        assert_eq!(game.select_square(sq("e7")), Ok(SelectionOutcome::Ignored));

        let snapshot = game.begin_computer_turn().expect("computer to move");
        assert_eq!(game.status_text(), "Computer is thinking...");
        assert_eq!(game.begin_computer_turn(), Err(GameError::ComputerMovePending));
        assert_eq!(game.select_square(sq("e7")), Err(GameError::ComputerMovePending));

        game.report_engine_unavailable();
        assert_eq!(game.status(), GameStatus::EngineUnavailable);

        let reply = find_legal_move(&snapshot, sq("e7"), sq("e5")).expect("legal reply");
        game.commit_computer_move(reply).expect("pending move");
        assert_eq!(game.side_to_move(), Color::Light);
        assert_eq!(game.status(), GameStatus::EngineUnavailable);
        assert_eq!(game.commit_computer_move(reply), Err(GameError::NoComputerTurnPending));

        game.submit_move(sq("g1"), sq("f3")).expect("human move");
        assert_eq!(game.status(), GameStatus::AwaitingSelection);
    }

    fn silent_after_handshake() -> (ScriptedChannel, Receiver<String>) {
        ScriptedChannel::new(|line| match line {
            "uci" => vec!["uciok".to_owned()],
            "isready" => vec!["readyok".to_owned()],
            _ => Vec::new(),
        })
    }

    fn answering_engine() -> (ScriptedChannel, Receiver<String>) {
        let mut replies = ["e7e5", "b8c6"].into_iter();
        ScriptedChannel::new(move |line| match line {
            "uci" => vec!["uciok".to_owned()],
            "isready" => vec!["readyok".to_owned()],
            l if l.starts_with("go ") => replies
                .next()
                .map(|mv| vec![format!("bestmove {mv}")])
                .unwrap_or_default(),
            _ => Vec::new(),
        })
    }

    fn small_fallback(rating: u32) -> FallbackEngine {
        FallbackEngine::with_table(Strength::new(rating), TranspositionTable::with_entries(1 << 12))
    }

    #[test]
    fn engine_dropping_out_mid_request_shows_notice() {
        let (chan, _sent) = silent_after_handshake();
        let mut adapter = ExternalEngineAdapter::with_channel(Strength::default(), Box::new(chan))
            .with_timeouts(AdapterTimeouts {
                handshake: Duration::from_millis(10),
                ready: Duration::from_millis(10),
                bestmove_grace: Duration::from_millis(1),
            });
        let mut engine = small_fallback(1000);
        let mut game = GameController::new(ControllerSettings {
            strength: Strength::new(1000),
            ..ControllerSettings::default()
        });

        game.submit_move(sq("e2"), sq("e4")).expect("human move");
        let chosen = game
            .play_computer_move(&mut adapter, &mut engine)
            .expect("backup move");
        assert_eq!(chosen.source, MoveSource::Fallback);
        assert!(adapter.is_unavailable());
        assert_eq!(game.side_to_move(), Color::Light);
        assert_eq!(game.status(), GameStatus::EngineUnavailable);
        assert_eq!(game.status_text(), "External engine unavailable, using backup AI.");

        game.submit_move(sq("d2"), sq("d4")).expect("human move");
        assert_ne!(game.status(), GameStatus::EngineUnavailable);
    }

    #[test]
    fn strength_changes_reach_both_engines() {
        let (chan, sent) = answering_engine();
        let mut adapter = ExternalEngineAdapter::with_channel(Strength::new(2800), Box::new(chan));
        let mut engine = small_fallback(2800);
        let mut game = GameController::new(ControllerSettings {
            strength: Strength::new(1000),
            ..ControllerSettings::default()
        });

        game.submit_move(sq("e2"), sq("e4")).expect("human move");
        let chosen = game
            .play_computer_move(&mut adapter, &mut engine)
            .expect("computer move");
        assert_eq!(chosen.source, MoveSource::External);
        assert_eq!(engine.strength(), Strength::new(1000));
        let lines: Vec<String> = sent.try_iter().collect();
        assert!(lines.contains(&"setoption name UCI_LimitStrength value true".to_owned()));
        assert!(lines.contains(&"setoption name UCI_Elo value 1000".to_owned()));
        assert!(!lines.contains(&"setoption name UCI_LimitStrength value false".to_owned()));
        assert_eq!(lines.last().map(String::as_str), Some("go movetime 1150"));

        game.set_strength(Strength::new(2800));
        game.submit_move(sq("g1"), sq("f3")).expect("human move");
        game.play_computer_move(&mut adapter, &mut engine)
            .expect("computer move");
        assert_eq!(engine.strength(), Strength::new(2800));
        let lines: Vec<String> = sent.try_iter().collect();
        assert!(lines.contains(&"setoption name UCI_LimitStrength value false".to_owned()));
        assert!(!lines.iter().any(|l| l.starts_with("setoption name UCI_Elo")));
        assert_eq!(lines.last().map(String::as_str), Some("go movetime 3220"));
    }

    #[test]
    fn computer_commit_must_be_legal() {
        let mut game = GameController::from_state(
            ControllerSettings {
                computer_color: Color::Light,
                ..ControllerSettings::default()
            },
            GameState::new_game(),
        );
        assert_eq!(game.begin_computer_turn().map(|s| s.side_to_move), Ok(Color::Light));
        let bogus = Move::quiet(sq("e2"), sq("e5"));
        assert!(matches!(game.commit_computer_move(bogus), Err(GameError::IllegalMove(_))));
        assert!(game.is_computer_pending());

        game.cancel_computer_turn();
        assert!(!game.is_computer_pending());
        game.set_vs_computer(false);
        assert!(!game.is_computer_turn());
        assert_eq!(game.begin_computer_turn(), Err(GameError::NotComputerTurn));
    }

    #[test]
    fn stalemate_is_terminal() {
        let state = parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        let game = GameController::from_state(ControllerSettings::default(), state);
        assert_eq!(game.status(), GameStatus::Stalemate);
        assert_eq!(game.status_text(), "Stalemate.");
        assert!(!game.is_computer_turn());
    }
}
