pub mod escrow;
pub mod events;
pub mod fifo;
pub mod leaderboard;
pub mod messages;
pub mod rules;
pub mod types;

pub use escrow::{BankError, BankKeeper};
pub use events::GameEvent;
pub use leaderboard::LeaderboardKeeper;
pub use rules::{RulesEngine, RulesError};
pub use types::*;
