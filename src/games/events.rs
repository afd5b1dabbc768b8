//! Events emitted by the keeper, in the key/value form clients subscribe to

use serde::{Deserialize, Serialize};

pub const GAME_CREATED_EVENT_TYPE: &str = "new-game-created";
pub const MOVE_PLAYED_EVENT_TYPE: &str = "move-played";
pub const GAME_REJECTED_EVENT_TYPE: &str = "game-rejected";
pub const GAME_FORFEITED_EVENT_TYPE: &str = "game-forfeited";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    #[serde(rename = "new-game-created")]
    GameCreated {
        creator: String,
        game_index: String,
        black: String,
        red: String,
        wager: u64,
        denom: String,
    },
    MovePlayed {
        creator: String,
        game_index: String,
        captured_x: i32,
        captured_y: i32,
        winner: String,
        board: String,
    },
    GameRejected {
        creator: String,
        game_index: String,
    },
    GameForfeited {
        game_index: String,
        winner: String,
        /// Board as it was before settlement cleared it
        board: String,
    },
}

impl GameEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameCreated { .. } => GAME_CREATED_EVENT_TYPE,
            GameEvent::MovePlayed { .. } => MOVE_PLAYED_EVENT_TYPE,
            GameEvent::GameRejected { .. } => GAME_REJECTED_EVENT_TYPE,
            GameEvent::GameForfeited { .. } => GAME_FORFEITED_EVENT_TYPE,
        }
    }

    pub fn game_index(&self) -> &str {
        match self {
            GameEvent::GameCreated { game_index, .. }
            | GameEvent::MovePlayed { game_index, .. }
            | GameEvent::GameRejected { game_index, .. }
            | GameEvent::GameForfeited { game_index, .. } => game_index,
        }
    }

    /// Flattened attributes in emission order
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            GameEvent::GameCreated {
                creator,
                game_index,
                black,
                red,
                wager,
                denom,
            } => vec![
                ("creator", creator.clone()),
                ("game-index", game_index.clone()),
                ("black", black.clone()),
                ("red", red.clone()),
                ("wager", wager.to_string()),
                ("denom", denom.clone()),
            ],
            GameEvent::MovePlayed {
                creator,
                game_index,
                captured_x,
                captured_y,
                winner,
                board,
            } => vec![
                ("creator", creator.clone()),
                ("game-index", game_index.clone()),
                ("captured-x", captured_x.to_string()),
                ("captured-y", captured_y.to_string()),
                ("winner", winner.clone()),
                ("board", board.clone()),
            ],
            GameEvent::GameRejected {
                creator,
                game_index,
            } => vec![
                ("creator", creator.clone()),
                ("game-index", game_index.clone()),
            ],
            GameEvent::GameForfeited {
                game_index,
                winner,
                board,
            } => vec![
                ("game-index", game_index.clone()),
                ("winner", winner.clone()),
                ("board", board.clone()),
            ],
        }
    }
}
