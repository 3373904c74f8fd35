//! Engine abstraction used by the adapter and the game controller.
//!
//! Common input parameters and output payloads so the local search and any
//! future strategy sit behind one trait.

use crate::errors::EngineResult;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;

/// Per-request limits. Unset fields fall back to the engine's own settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> EngineResult<()> {
        Ok(())
    }

    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> EngineResult<EngineOutput>;
}
