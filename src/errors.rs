//! Error types for the rules engine, the game controller and the engine
//! adapter.
//!
//! Illegal human input and terminal positions are not errors; they surface
//! through `SelectionOutcome` and `GameStatus` instead.

use std::io;

use thiserror::Error;

/// Failures while parsing a FEN string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("missing {0} field in FEN")]
    MissingField(&'static str),

    #[error("FEN has extra trailing fields")]
    TrailingFields,

    #[error("FEN board must have 8 ranks, got {0}")]
    RankCount(usize),

    #[error("FEN rank {rank} describes {files} files")]
    RankWidth { rank: usize, files: usize },

    #[error("invalid piece character '{0}' in FEN")]
    InvalidPiece(char),

    #[error("invalid side to move '{0}'")]
    InvalidSide(String),

    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),

    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid {field} '{value}'")]
    InvalidClock { field: &'static str, value: String },
}

pub type FenResult<T> = Result<T, FenError>;

/// Failures while reading coordinate or long-algebraic notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid algebraic square '{0}'")]
    InvalidSquare(String),

    #[error("invalid long algebraic move '{0}'")]
    InvalidMove(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

pub type NotationResult<T> = Result<T, NotationError>;

/// Rejections from the live game controller. None of these change the game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,

    #[error("a computer move is already being selected")]
    ComputerMovePending,

    #[error("it is not the computer's turn")]
    NotComputerTurn,

    #[error("no computer move is pending")]
    NoComputerTurnPending,

    #[error("move {0} is not legal in the current position")]
    IllegalMove(String),

    #[error("the computer found no move to play")]
    NoMoveAvailable,
}

pub type GameResult<T> = Result<T, GameError>;

/// Failures talking to an external engine process.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine channel closed")]
    ChannelClosed,

    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("engine did not answer '{expected}' within {timeout_ms} ms")]
    Timeout { expected: &'static str, timeout_ms: u64 },

    #[error("engine is unavailable until its retry cooldown expires")]
    Unavailable,

    #[error("a best-move request is already outstanding")]
    Busy,

    #[error("engine executable could not be started: {0}")]
    Spawn(String),

    #[error("invalid value '{value}' for engine option '{name}'")]
    InvalidOption { name: String, value: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
