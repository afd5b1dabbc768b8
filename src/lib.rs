//! Checkers Ledger - Wagered Checkers Settlement Core
//!
//! Stores wagered checkers games, keeps them in a deadline-ordered queue and,
//! at every block boundary, forfeits the games whose player to move ran out
//! of time. Escrow moves through a host-provided [`BankKeeper`]; the board
//! rules come from a [`RulesEngine`].

pub mod config;
pub mod context;
pub mod end_block;
pub mod errors;
pub mod game_store;
pub mod games;
pub mod keeper;
pub mod logging;
pub mod metrics;
pub mod msg_server;
pub mod query;
pub mod storage;
pub mod testing;

pub use config::CheckersConfig;
pub use context::BlockContext;
pub use end_block::{ForfeitOutcome, ForfeitedGame};
pub use errors::{CheckersError, CheckersResult, FatalError, GameError};
pub use game_store::GameStore;
pub use games::{
    BankError, BankKeeper, Coin, GameEvent, LeaderboardKeeper, Player, Pos, RulesEngine,
    RulesError, StoredGame, SystemInfo,
};
pub use keeper::Keeper;
pub use metrics::{MetricsSnapshot, SettlementMetrics};
pub use storage::{KvStore, MemoryStore, RocksStore};
