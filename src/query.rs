//! Read-only queries. Nothing here writes to the store.

use crate::{
    errors::{CheckersResult, GameError},
    game_store::GameStore,
    games::{
        escrow::BankKeeper,
        leaderboard::LeaderboardKeeper,
        messages::{QueryCanPlayMoveRequest, QueryCanPlayMoveResponse},
        rules::RulesEngine,
        types::{Player, Pos, StoredGame, SystemInfo},
    },
    keeper::Keeper,
    storage::KvStore,
};

impl QueryCanPlayMoveResponse {
    fn impossible(reason: impl Into<String>) -> Self {
        Self {
            possible: false,
            reason: reason.into(),
        }
    }
}

impl<S, B, R, L> Keeper<S, B, R, L>
where
    S: KvStore,
    B: BankKeeper,
    R: RulesEngine,
    L: LeaderboardKeeper,
{
    pub fn stored_game(&self, index: &str) -> CheckersResult<StoredGame> {
        self.store
            .get_stored_game(index)?
            .ok_or_else(|| GameError::GameNotFound(index.to_string()).into())
    }

    pub fn system_info(&self) -> CheckersResult<SystemInfo> {
        self.must_get_system_info()
    }

    /// Dry-run a move against the stored board.
    ///
    /// Only a missing or unreadable game is an error; every other reason the
    /// move cannot be played is reported in the response.
    pub fn can_play_move(
        &self,
        req: &QueryCanPlayMoveRequest,
    ) -> CheckersResult<QueryCanPlayMoveResponse> {
        let game = self.stored_game(&req.game_index)?;

        if game.has_winner() {
            return Ok(QueryCanPlayMoveResponse::impossible(
                GameError::GameFinished.to_string(),
            ));
        }

        let turn = Player::from_tag(&game.turn)
            .filter(|turn| *turn != Player::NoPlayer)
            .ok_or_else(|| GameError::GameNotParseable(format!("turn {}", game.turn)))?;
        let player = match Player::from_tag(&req.player) {
            Some(Player::NoPlayer) => turn,
            Some(color) => color,
            None => {
                return Ok(QueryCanPlayMoveResponse::impossible(
                    GameError::CreatorNotPlayer(req.player.clone()).to_string(),
                ))
            }
        };

        let mut board = self
            .rules
            .deserialize(&game.board, turn)
            .map_err(|e| GameError::GameNotParseable(e.to_string()))?;
        if self.rules.turn_of(&board) != player {
            return Ok(QueryCanPlayMoveResponse::impossible(
                GameError::NotPlayerTurn(player.color().to_string()).to_string(),
            ));
        }

        // board is a local copy, the stored game is untouched
        let attempt = self.rules.apply_move(
            &mut board,
            Pos::new(req.from_x, req.from_y),
            Pos::new(req.to_x, req.to_y),
        );
        if let Err(e) = attempt {
            return Ok(QueryCanPlayMoveResponse::impossible(
                GameError::WrongMove(e.to_string()).to_string(),
            ));
        }

        Ok(QueryCanPlayMoveResponse {
            possible: true,
            reason: "ok".to_string(),
        })
    }
}
