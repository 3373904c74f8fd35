//! Crate root module declarations for the boardside chess engine.
//!
//! Rules (game state, move generation), the local fallback search, the
//! external UCI engine adapter and the live game controller are exposed here
//! so the binary, tests and benches share the same module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod king_moves;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod pawn_moves;
    pub mod perft;
    pub mod pseudo_moves;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod quiescence;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_fallback;
    pub mod engine_trait;
    pub mod strength;
}

pub mod uci {
    pub mod engine_channel;
    pub mod process_channel;
    pub mod uci_adapter;
}

pub mod game {
    pub mod controller;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
