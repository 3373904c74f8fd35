use std::time::Duration;

use tracing::info;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::engines::strength::Strength;
use crate::errors::{EngineError, EngineResult};
use crate::game_state::game_state::GameState;
use crate::search::board_scoring::StandardScorer;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig};
use crate::search::transposition_table::TranspositionTable;
use crate::utils::long_algebraic::move_to_long_algebraic;

pub const FALLBACK_TT_MB: usize = 16;

/// Local iterative-deepening engine, used whenever the external engine
/// cannot answer.
pub struct FallbackEngine {
    strength: Strength,
    scorer: StandardScorer,
    tt: TranspositionTable,
}

impl FallbackEngine {
    pub fn new(strength: Strength) -> Self {
        Self::with_table(strength, TranspositionTable::new_with_mb(FALLBACK_TT_MB))
    }

    pub fn with_table(strength: Strength, tt: TranspositionTable) -> Self {
        Self {
            strength,
            scorer: StandardScorer,
            tt,
        }
    }

    #[inline]
    pub fn strength(&self) -> Strength {
        self.strength
    }

    #[inline]
    pub fn set_strength(&mut self, strength: Strength) {
        self.strength = strength;
    }

    fn config_for(&self, params: &GoParams) -> SearchConfig {
        let mut config = self.strength.search_config();
        if let Some(depth) = params.depth {
            config.max_depth = depth;
        }
        if let Some(ms) = params.movetime_ms {
            config.time_budget = Some(Duration::from_millis(ms));
        }
        config
    }
}

impl Default for FallbackEngine {
    fn default() -> Self {
        Self::new(Strength::default())
    }
}

impl Engine for FallbackEngine {
    fn name(&self) -> &str {
        "boardside fallback"
    }

    fn new_game(&mut self) {
        self.tt.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> EngineResult<()> {
        if name.eq_ignore_ascii_case("UCI_Elo") {
            let rating = value.trim().parse::<u32>().map_err(|_| EngineError::InvalidOption {
                name: name.to_owned(),
                value: value.to_owned(),
            })?;
            self.strength = Strength::new(rating);
        }
        Ok(())
    }

    fn choose_move(&mut self, game_state: &GameState, params: &GoParams) -> EngineResult<EngineOutput> {
        let config = self.config_for(params);
        // Each decision starts from an empty table.
        self.tt.clear();
        let result = iterative_deepening_search(game_state, &self.scorer, &mut self.tt, config);

        let mut out = EngineOutput {
            best_move: result.best_move,
            info_lines: Vec::with_capacity(2),
        };
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {}",
            result.reached_depth,
            result.best_score / 10,
            result.nodes
        ));
        if let Some(mv) = result.best_move {
            let text = move_to_long_algebraic(mv);
            let tt_stats = self.tt.stats();
            info!(
                best = %text,
                depth = result.reached_depth,
                score = result.best_score,
                nodes = result.nodes,
                tt_hits = tt_stats.hits,
                tt_probes = tt_stats.probes,
                "fallback search chose a move"
            );
            out.info_lines.push(format!("info string fallback pv {text}"));
        }

        Ok(out)
    }
}
