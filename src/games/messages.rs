//! Requests and responses of the keeper's message and query handlers

use crate::games::types::Pos;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgCreateGame {
    pub creator: String,
    pub black: String,
    pub red: String,
    pub wager: u64,
    pub denom: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgCreateGameResponse {
    pub game_index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgPlayMove {
    pub creator: String,
    pub game_index: String,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

impl MsgPlayMove {
    pub fn from_pos(&self) -> Pos {
        Pos::new(self.from_x, self.from_y)
    }

    pub fn to_pos(&self) -> Pos {
        Pos::new(self.to_x, self.to_y)
    }
}

/// `captured_x`/`captured_y` are -1 when the move captured nothing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgPlayMoveResponse {
    pub captured_x: i32,
    pub captured_y: i32,
    pub winner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgRejectGame {
    pub creator: String,
    pub game_index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgRejectGameResponse {}

/// `player` is a color tag: "b", "r", or "*" for whichever color is to move
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryCanPlayMoveRequest {
    pub game_index: String,
    pub player: String,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryCanPlayMoveResponse {
    pub possible: bool,
    pub reason: String,
}
