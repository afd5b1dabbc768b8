//! Boundary to the checkers rule set.
//!
//! The keeper never inspects a board itself: it asks the engine for a fresh
//! board, for whose turn it is, to apply a move, and for the winner.

use crate::games::types::{Player, Pos};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("{0}")]
    IllegalMove(String),
}

pub trait RulesEngine {
    type Board: Clone;

    fn new_board(&self) -> Self::Board;

    fn serialize(&self, board: &Self::Board) -> String;

    /// Rebuild a board from its serialized form and the stored turn tag
    fn deserialize(&self, board: &str, turn: Player) -> Result<Self::Board, RulesError>;

    fn turn_of(&self, board: &Self::Board) -> Player;

    /// Apply a move for the side to play; returns the captured square, if any
    fn apply_move(
        &self,
        board: &mut Self::Board,
        from: Pos,
        to: Pos,
    ) -> Result<Option<Pos>, RulesError>;

    /// [`Player::NoPlayer`] while the game is still open
    fn winner(&self, board: &Self::Board) -> Player;
}
