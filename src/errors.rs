//! Error types for the checkers settlement core
//!
//! Two tiers: [`FatalError`] (and storage failures) mean the ledger state is
//! broken and the whole block transition must be aborted; [`GameError`] is a
//! rejection of a single message that leaves state untouched.

use thiserror::Error;

/// Root error type for all keeper operations
#[derive(Debug, Error)]
pub enum CheckersError {
    /// Broken invariant or corrupted state
    #[error("Fatal error: {0}")]
    Fatal(#[from] FatalError),

    /// User-facing rejection of a message
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Storage system errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Conditions that can only arise from corrupted state or a logic error upstream
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FatalError {
    #[error("SystemInfo not found")]
    SystemInfoNotFound,

    #[error("Fifo game not found: {0}")]
    FifoGameNotFound(String),

    #[error("Fifo corrupted: {0}")]
    FifoCorrupted(String),

    #[error("cannot find winner by color: {0}")]
    CannotFindWinnerByColor(String),

    #[error("there is nothing to pay, should not have been called (game {0})")]
    NothingToPay(String),

    #[error("game {index} is not in a state to refund, move count: {move_count}")]
    NotInRefundState { index: String, move_count: u64 },

    #[error("cannot pay winnings for game {index}: {reason}")]
    CannotPayWinnings { index: String, reason: String },

    #[error("cannot refund wager for game {index}: {reason}")]
    CannotRefundWager { index: String, reason: String },

    #[error("deadline cannot be parsed for game {index}: {value}")]
    InvalidDeadline { index: String, value: String },

    #[error("wager overflow for game {0}")]
    WagerOverflow(String),

    #[error("deadline overflows from block time {block_time} plus {turn_secs}s")]
    DeadlineOverflow { block_time: String, turn_secs: u64 },
}

/// Message rejections reported back to the sender
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("black address is invalid: {0}")]
    InvalidBlack(String),

    #[error("red address is invalid: {0}")]
    InvalidRed(String),

    #[error("game by id not found: {0}")]
    GameNotFound(String),

    #[error("game is already finished")]
    GameFinished,

    #[error("message creator is not a player: {0}")]
    CreatorNotPlayer(String),

    #[error("player tried to play out of turn: {0}")]
    NotPlayerTurn(String),

    #[error("wrong move: {0}")]
    WrongMove(String),

    #[error("game cannot be parsed: {0}")]
    GameNotParseable(String),

    #[error("black cannot pay the wager: {0}")]
    BlackCannotPay(String),

    #[error("red cannot pay the wager: {0}")]
    RedCannotPay(String),

    #[error("black player has already played")]
    BlackAlreadyPlayed,

    #[error("red player has already played")]
    RedAlreadyPlayed,
}

/// Storage system errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database open failed: {0}")]
    DatabaseOpenFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupted data: {0}")]
    CorruptedData(String),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

impl CheckersError {
    /// True when the enclosing block transition must be aborted
    pub fn is_fatal(&self) -> bool {
        matches!(self, CheckersError::Fatal(_) | CheckersError::Storage(_))
    }
}

// External error conversions
impl From<rocksdb::Error> for CheckersError {
    fn from(e: rocksdb::Error) -> Self {
        CheckersError::Storage(StorageError::WriteFailed(e.to_string()))
    }
}

impl From<toml::de::Error> for CheckersError {
    fn from(e: toml::de::Error) -> Self {
        CheckersError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<std::io::Error> for CheckersError {
    fn from(e: std::io::Error) -> Self {
        CheckersError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type CheckersResult<T> = Result<T, CheckersError>;
