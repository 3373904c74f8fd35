//! Drives an external UCI engine for the computer side, with the local
//! search as a fallback whenever the engine is missing, slow or wrong.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::engines::engine_trait::{Engine, GoParams};
use crate::engines::strength::Strength;
use crate::errors::{EngineError, EngineResult};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::{has_legal_move, legal_moves};
use crate::moves::move_descriptions::Move;
use crate::uci::engine_channel::EngineChannel;
use crate::uci::process_channel::ProcessChannel;
use crate::utils::fen_generator::generate_fen;
use crate::utils::long_algebraic::long_algebraic_to_move;

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(6_000);
pub const READY_TIMEOUT: Duration = Duration::from_millis(6_000);
/// Slack on top of the requested movetime before a reply counts as lost.
pub const BESTMOVE_GRACE: Duration = Duration::from_millis(2_000);
pub const FAILURE_COOLDOWN: Duration = Duration::from_millis(10_000);
pub const RETRY_COOLDOWN: Duration = Duration::from_millis(12_000);

pub const EXTERNAL_HASH_MB: u32 = 128;
pub const MAX_EXTERNAL_THREADS: usize = 2;

pub type Connector = Box<dyn FnMut() -> EngineResult<Box<dyn EngineChannel>> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// No external engine configured; always use the fallback.
    Disabled,
    /// Configured but not connected yet.
    Idle,
    Ready,
    /// Last attempt failed; retried once the cooldown expires.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    External,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenMove {
    pub mv: Move,
    pub source: MoveSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterTimeouts {
    pub handshake: Duration,
    pub ready: Duration,
    pub bestmove_grace: Duration,
}

impl Default for AdapterTimeouts {
    fn default() -> Self {
        Self {
            handshake: HANDSHAKE_TIMEOUT,
            ready: READY_TIMEOUT,
            bestmove_grace: BESTMOVE_GRACE,
        }
    }
}

/// `Threads` value sent to the engine.
pub fn external_thread_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_EXTERNAL_THREADS)
}

/// `setoption` lines for a rating, in the order they are sent.
pub fn option_commands(strength: Strength, threads: usize) -> Vec<String> {
    let limited = strength.limit_strength();
    let mut commands = vec![
        format!("setoption name Threads value {threads}"),
        format!("setoption name Hash value {EXTERNAL_HASH_MB}"),
        format!("setoption name UCI_LimitStrength value {limited}"),
    ];
    if limited {
        commands.push(format!("setoption name UCI_Elo value {}", strength.rating));
    }
    commands.push(format!(
        "setoption name Skill Level value {}",
        strength.skill_level()
    ));
    commands
}

pub struct ExternalEngineAdapter {
    strength: Strength,
    connector: Option<Connector>,
    channel: Option<Box<dyn EngineChannel>>,
    state: AdapterState,
    awaiting_best_move: bool,
    retry_after: Option<Instant>,
    timeouts: AdapterTimeouts,
}

impl ExternalEngineAdapter {
    pub fn disabled(strength: Strength) -> Self {
        Self {
            strength,
            connector: None,
            channel: None,
            state: AdapterState::Disabled,
            awaiting_best_move: false,
            retry_after: None,
            timeouts: AdapterTimeouts::default(),
        }
    }

    /// Connects lazily through `connector`, and again after each cooldown.
    pub fn with_connector(strength: Strength, connector: Connector) -> Self {
        Self {
            connector: Some(connector),
            state: AdapterState::Idle,
            ..Self::disabled(strength)
        }
    }

    /// Wraps an already-open channel. Once it fails it is not reopened.
    pub fn with_channel(strength: Strength, channel: Box<dyn EngineChannel>) -> Self {
        Self {
            channel: Some(channel),
            state: AdapterState::Idle,
            ..Self::disabled(strength)
        }
    }

    /// Spawns the executable at `path` on first use.
    pub fn spawn(strength: Strength, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_connector(
            strength,
            Box::new(move || {
                let channel = ProcessChannel::spawn(&path)?;
                Ok(Box::new(channel) as Box<dyn EngineChannel>)
            }),
        )
    }

    pub fn with_timeouts(mut self, timeouts: AdapterTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    #[inline]
    pub fn state(&self) -> AdapterState {
        self.state
    }

    #[inline]
    pub fn strength(&self) -> Strength {
        self.strength
    }

    #[inline]
    pub fn is_unavailable(&self) -> bool {
        self.state == AdapterState::Failed
    }

    #[inline]
    pub fn awaiting_best_move(&self) -> bool {
        self.awaiting_best_move
    }

    #[inline]
    pub fn retry_after(&self) -> Option<Instant> {
        self.retry_after
    }

    /// Make sure a handshaken engine is available at `now`, connecting or
    /// retrying if the cooldown allows it.
    pub fn ensure_ready(&mut self, now: Instant) -> bool {
        match self.state {
            AdapterState::Disabled => false,
            AdapterState::Ready => true,
            AdapterState::Idle | AdapterState::Failed => {
                if self.retry_after.is_some_and(|at| now < at) {
                    return false;
                }
                let retrying = self.state == AdapterState::Failed;
                match self.connect() {
                    Ok(()) => {
                        self.state = AdapterState::Ready;
                        self.retry_after = None;
                        info!(rating = self.strength.rating, "external engine ready");
                        true
                    }
                    Err(e) => {
                        self.mark_failed(now, retrying, &e);
                        false
                    }
                }
            }
        }
    }

    /// Change the rating; a connected engine gets its options re-sent.
    pub fn set_strength(&mut self, strength: Strength) {
        self.strength = strength;
        if self.state == AdapterState::Ready {
            if let Err(e) = self.apply_options() {
                self.mark_failed(Instant::now(), false, &e);
            }
        }
    }

    pub fn new_game(&mut self) {
        self.awaiting_best_move = false;
        if self.state != AdapterState::Ready {
            return;
        }
        if let Err(e) = self.reset_engine() {
            self.mark_failed(Instant::now(), false, &e);
        }
    }

    fn reset_engine(&mut self) -> EngineResult<()> {
        let ready = self.timeouts.ready;
        self.send("stop")?;
        self.send("ucinewgame")?;
        self.send("isready")?;
        self.expect_line("readyok", ready)?;
        self.apply_options()
    }

    /// Sends `stop`, the position and `go movetime`. At most one request
    /// may be outstanding.
    pub fn request_best_move(&mut self, game_state: &GameState) -> EngineResult<()> {
        if self.awaiting_best_move {
            return Err(EngineError::Busy);
        }
        if self.state != AdapterState::Ready {
            return Err(EngineError::Unavailable);
        }
        let fen = generate_fen(game_state);
        self.send("stop")?;
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!(
            "go movetime {}",
            self.strength.external_movetime_ms()
        ))?;
        self.awaiting_best_move = true;
        Ok(())
    }

    /// Drain whatever the engine has printed without blocking.
    pub fn poll_best_move(&mut self) -> EngineResult<Option<String>> {
        loop {
            let Some(line) = self.channel_mut()?.recv_timeout(Duration::ZERO)? else {
                return Ok(None);
            };
            if let Some(reply) = self.accept_line(&line) {
                return Ok(Some(reply));
            }
        }
    }

    /// Block until the pending request is answered or `timeout` passes.
    pub fn wait_best_move(&mut self, timeout: Duration) -> EngineResult<String> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(line) = self.channel_mut()?.recv_timeout(remaining)? else {
                return Err(EngineError::Timeout {
                    expected: "bestmove",
                    timeout_ms: timeout.as_millis() as u64,
                });
            };
            if let Some(reply) = self.accept_line(&line) {
                return Ok(reply);
            }
        }
    }

    /// Map a `bestmove` token to a legal move. `(none)`, garbage and moves
    /// that are not legal here all yield `None`.
    pub fn resolve_reply(game_state: &GameState, text: &str) -> Option<Move> {
        if text == "(none)" {
            debug!("external engine reports no move");
            return None;
        }
        match long_algebraic_to_move(text, game_state) {
            Ok(mv) => Some(mv),
            Err(e) => {
                warn!(reply = text, error = %e, "rejected external engine reply");
                None
            }
        }
    }

    pub fn choose_move(&mut self, game_state: &GameState, fallback: &mut dyn Engine) -> Option<ChosenMove> {
        self.choose_move_at(game_state, fallback, Instant::now())
    }

    /// External engine first, then `fallback`. Returns `None` only when the
    /// side to move has no legal move.
    pub fn choose_move_at(
        &mut self,
        game_state: &GameState,
        fallback: &mut dyn Engine,
        now: Instant,
    ) -> Option<ChosenMove> {
        if !has_legal_move(game_state) {
            return None;
        }

        if self.ensure_ready(now) {
            match self.ask_external(game_state) {
                Ok(Some(mv)) => {
                    return Some(ChosenMove {
                        mv,
                        source: MoveSource::External,
                    });
                }
                Ok(None) => {}
                Err(e) => self.mark_failed(now, false, &e),
            }
        }

        Self::fallback_move(game_state, fallback)
    }

    fn ask_external(&mut self, game_state: &GameState) -> EngineResult<Option<Move>> {
        self.request_best_move(game_state)?;
        let timeout =
            Duration::from_millis(self.strength.external_movetime_ms()) + self.timeouts.bestmove_grace;
        let reply = self.wait_best_move(timeout)?;
        Ok(Self::resolve_reply(game_state, &reply))
    }

    fn fallback_move(game_state: &GameState, fallback: &mut dyn Engine) -> Option<ChosenMove> {
        let mv = match fallback.choose_move(game_state, &GoParams::default()) {
            Ok(out) => out.best_move,
            Err(e) => {
                warn!(engine = fallback.name(), error = %e, "fallback engine failed");
                None
            }
        };
        mv.or_else(|| legal_moves(game_state).first().copied())
            .map(|mv| ChosenMove {
                mv,
                source: MoveSource::Fallback,
            })
    }

    fn connect(&mut self) -> EngineResult<()> {
        if self.channel.is_none() {
            let connector = self.connector.as_mut().ok_or(EngineError::Unavailable)?;
            self.channel = Some(connector()?);
        }
        let AdapterTimeouts { handshake, ready, .. } = self.timeouts;
        self.send("uci")?;
        self.expect_line("uciok", handshake)?;
        self.send("isready")?;
        self.expect_line("readyok", ready)?;
        self.apply_options()
    }

    fn apply_options(&mut self) -> EngineResult<()> {
        for command in option_commands(self.strength, external_thread_count()) {
            self.send(&command)?;
        }
        Ok(())
    }

    fn mark_failed(&mut self, now: Instant, retrying: bool, error: &EngineError) {
        let cooldown = if retrying { RETRY_COOLDOWN } else { FAILURE_COOLDOWN };
        warn!(
            error = %error,
            cooldown_ms = cooldown.as_millis() as u64,
            "External engine unavailable, using backup AI."
        );
        self.state = AdapterState::Failed;
        self.awaiting_best_move = false;
        self.retry_after = Some(now + cooldown);
        self.channel = None;
    }

    /// Returns the move token of a `bestmove` line answering the pending
    /// request. Everything else, including stale replies, is dropped.
    fn accept_line(&mut self, line: &str) -> Option<String> {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("bestmove") {
            trace!(line, "ignored engine output");
            return None;
        }
        if !self.awaiting_best_move {
            debug!(line, "discarding stale bestmove");
            return None;
        }
        self.awaiting_best_move = false;
        Some(parts.next().unwrap_or("(none)").to_owned())
    }

    fn expect_line(&mut self, expected: &'static str, timeout: Duration) -> EngineResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.channel_mut()?.recv_timeout(remaining)? {
                Some(line) if line.trim() == expected => return Ok(()),
                Some(line) => trace!(line = %line, expected, "skipped engine output"),
                None => {
                    return Err(EngineError::Timeout {
                        expected,
                        timeout_ms: timeout.as_millis() as u64,
                    })
                }
            }
        }
    }

    fn send(&mut self, line: &str) -> EngineResult<()> {
        self.channel_mut()?.send(line)
    }

    fn channel_mut(&mut self) -> EngineResult<&mut Box<dyn EngineChannel>> {
        self.channel.as_mut().ok_or(EngineError::Unavailable)
    }
}
