//! Message handlers: create, play, reject.
//!
//! A handler either fails before touching any state (user-facing
//! [`GameError`]) or runs to completion. Fatal errors abort mid-way and rely
//! on the host discarding the block.

use crate::{
    context::BlockContext,
    errors::{CheckersResult, GameError},
    game_store::GameStore,
    games::{
        escrow::{self, BankKeeper},
        events::GameEvent,
        fifo,
        leaderboard::LeaderboardKeeper,
        messages::{
            MsgCreateGame, MsgCreateGameResponse, MsgPlayMove, MsgPlayMoveResponse,
            MsgRejectGame, MsgRejectGameResponse,
        },
        rules::RulesEngine,
        types::{Player, StoredGame, NO_FIFO_INDEX},
    },
    keeper::Keeper,
    storage::KvStore,
};

impl<S, B, R, L> Keeper<S, B, R, L>
where
    S: KvStore,
    B: BankKeeper,
    R: RulesEngine,
    L: LeaderboardKeeper,
{
    pub fn create_game(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgCreateGame,
    ) -> CheckersResult<MsgCreateGameResponse> {
        let mut info = self.must_get_system_info()?;
        let new_index = info.next_id.to_string();
        let deadline = self.next_deadline(ctx)?;

        let board = self.rules.new_board();
        let mut game = StoredGame {
            index: new_index.clone(),
            board: self.rules.serialize(&board),
            turn: self.rules.turn_of(&board).tag().to_string(),
            black: msg.black.clone(),
            red: msg.red.clone(),
            move_count: 0,
            before_index: NO_FIFO_INDEX.to_string(),
            after_index: NO_FIFO_INDEX.to_string(),
            deadline,
            winner: Player::NoPlayer.tag().to_string(),
            wager: msg.wager,
            denom: msg.denom.clone(),
        };
        game.validate()?;

        fifo::send_to_fifo_tail(&mut self.store, &mut game, &mut info)?;
        self.store.set_stored_game(&game)?;

        info.next_id += 1;
        self.store.set_system_info(&info)?;

        ctx.consume_gas(self.gas_config.create_game, "Create game");
        ctx.emit(GameEvent::GameCreated {
            creator: msg.creator,
            game_index: new_index.clone(),
            black: msg.black,
            red: msg.red,
            wager: msg.wager,
            denom: msg.denom,
        });
        self.metrics.record_game_created();
        tracing::info!(game_index = %new_index, deadline = %game.deadline, "Created game");

        Ok(MsgCreateGameResponse {
            game_index: new_index,
        })
    }

    pub fn play_move(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgPlayMove,
    ) -> CheckersResult<MsgPlayMoveResponse> {
        let mut game = self
            .store
            .get_stored_game(&msg.game_index)?
            .ok_or_else(|| GameError::GameNotFound(msg.game_index.clone()))?;

        if game.has_winner() {
            return Err(GameError::GameFinished.into());
        }

        let is_black = game.black == msg.creator;
        let is_red = game.red == msg.creator;
        let turn = Player::from_tag(&game.turn)
            .ok_or_else(|| GameError::GameNotParseable(format!("turn {}", game.turn)))?;
        let player = match (is_black, is_red) {
            (true, true) => turn,
            (true, false) => Player::Black,
            (false, true) => Player::Red,
            (false, false) => return Err(GameError::CreatorNotPlayer(msg.creator).into()),
        };

        let mut board = self
            .rules
            .deserialize(&game.board, turn)
            .map_err(|e| GameError::GameNotParseable(e.to_string()))?;
        if self.rules.turn_of(&board) != player {
            return Err(GameError::NotPlayerTurn(player.color().to_string()).into());
        }

        let captured = self
            .rules
            .apply_move(&mut board, msg.from_pos(), msg.to_pos())
            .map_err(|e| {
                tracing::warn!(game_index = %game.index, error = %e, "Rejected move");
                GameError::WrongMove(e.to_string())
            })?;

        let mut info = self.must_get_system_info()?;
        let deadline = self.next_deadline(ctx)?;
        // last fallible step before any write
        escrow::collect_wager(&mut self.bank, &game)?;

        let winner = self.rules.winner(&board);

        game.move_count += 1;
        game.deadline = deadline;
        game.board = self.rules.serialize(&board);
        game.turn = self.rules.turn_of(&board).tag().to_string();
        game.winner = winner.tag().to_string();

        let event_board = game.board.clone();
        if winner == Player::NoPlayer {
            fifo::send_to_fifo_tail(&mut self.store, &mut game, &mut info)?;
        } else {
            fifo::remove_from_fifo(&mut self.store, &mut game, &mut info)?;
            game.board.clear();
            let paid = escrow::pay_winnings(&mut self.bank, &game)?;
            self.metrics.record_payout(paid.amount);

            if let (Some(won), Some(lost)) = (
                game.player_address(winner),
                winner.opponent().and_then(|loser| game.player_address(loser)),
            ) {
                self.leaderboard.add_won_game(won);
                self.leaderboard.add_lost_game(lost);
            }
            tracing::info!(game_index = %game.index, winner = %winner, "Game won by move");
        }

        self.store.set_stored_game(&game)?;
        self.store.set_system_info(&info)?;

        let (captured_x, captured_y) = captured.map_or((-1, -1), |pos| (pos.x, pos.y));
        ctx.consume_gas(self.gas_config.play_move, "Play a move");
        ctx.emit(GameEvent::MovePlayed {
            creator: msg.creator,
            game_index: game.index.clone(),
            captured_x,
            captured_y,
            winner: game.winner.clone(),
            board: event_board,
        });
        self.metrics.record_move();

        Ok(MsgPlayMoveResponse {
            captured_x,
            captured_y,
            winner: game.winner,
        })
    }

    pub fn reject_game(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgRejectGame,
    ) -> CheckersResult<MsgRejectGameResponse> {
        let mut game = self
            .store
            .get_stored_game(&msg.game_index)?
            .ok_or_else(|| GameError::GameNotFound(msg.game_index.clone()))?;

        if game.has_winner() {
            return Err(GameError::GameFinished.into());
        }

        if game.black == msg.creator {
            if game.move_count > 0 {
                return Err(GameError::BlackAlreadyPlayed.into());
            }
        } else if game.red == msg.creator {
            if game.move_count > 1 {
                return Err(GameError::RedAlreadyPlayed.into());
            }
        } else {
            return Err(GameError::CreatorNotPlayer(msg.creator).into());
        }

        let mut info = self.must_get_system_info()?;
        if let Some(refund) = escrow::refund_wager(&mut self.bank, &game)? {
            self.metrics.record_refund(refund.amount);
        }
        fifo::remove_from_fifo(&mut self.store, &mut game, &mut info)?;
        self.store.remove_stored_game(&game.index)?;
        self.store.set_system_info(&info)?;

        ctx.refund_gas(self.gas_config.reject_game_refund, "Reject game");
        ctx.emit(GameEvent::GameRejected {
            creator: msg.creator,
            game_index: game.index.clone(),
        });
        self.metrics.record_rejection();
        tracing::info!(game_index = %game.index, "Rejected game");

        Ok(MsgRejectGameResponse {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckersConfig;
    use crate::errors::CheckersError;
    use crate::storage::MemoryStore;
    use crate::testing::{MemoryBank, RecordingLeaderboard, SimpleRules};
    use chrono::{TimeZone, Utc};

    type TestKeeper = Keeper<MemoryStore, MemoryBank, SimpleRules, RecordingLeaderboard>;

    fn setup() -> (TestKeeper, BlockContext) {
        let mut bank = MemoryBank::new();
        bank.mint("alice", 100, "stake");
        bank.mint("bob", 100, "stake");
        let mut keeper = Keeper::new(
            MemoryStore::new(),
            bank,
            SimpleRules,
            RecordingLeaderboard::new(),
            &CheckersConfig::default(),
        )
        .unwrap();
        keeper.init_genesis().unwrap();
        let ctx = BlockContext::new(1, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        (keeper, ctx)
    }

    fn create(keeper: &mut TestKeeper, ctx: &mut BlockContext) -> String {
        keeper
            .create_game(
                ctx,
                MsgCreateGame {
                    creator: "carol".to_string(),
                    black: "alice".to_string(),
                    red: "bob".to_string(),
                    wager: 45,
                    denom: "stake".to_string(),
                },
            )
            .unwrap()
            .game_index
    }

    fn play(creator: &str, index: &str, from: (i32, i32), to: (i32, i32)) -> MsgPlayMove {
        MsgPlayMove {
            creator: creator.to_string(),
            game_index: index.to_string(),
            from_x: from.0,
            from_y: from.1,
            to_x: to.0,
            to_y: to.1,
        }
    }

    #[test]
    fn test_create_game_fields() {
        let (mut keeper, mut ctx) = setup();
        let index = create(&mut keeper, &mut ctx);
        assert_eq!(index, "1");

        let game = keeper.store().get_stored_game("1").unwrap().unwrap();
        assert_eq!(game.turn, "b");
        assert_eq!(game.winner, "*");
        assert_eq!(game.deadline, "2024-03-02 12:00:00.000000000 +0000 UTC");

        let info = keeper.store().get_system_info().unwrap().unwrap();
        assert_eq!(info.next_id, 2);
        assert_eq!(info.fifo_head_index, "1");
        assert_eq!(info.fifo_tail_index, "1");
        assert_eq!(ctx.gas_consumed(), 15_000);
        assert_eq!(ctx.events()[0].event_type(), "new-game-created");
    }

    #[test]
    fn test_create_game_rejects_bad_address() {
        let (mut keeper, mut ctx) = setup();
        let err = keeper
            .create_game(
                &mut ctx,
                MsgCreateGame {
                    creator: "carol".to_string(),
                    black: "".to_string(),
                    red: "bob".to_string(),
                    wager: 45,
                    denom: "stake".to_string(),
                },
            )
            .unwrap_err();

        assert!(matches!(err, CheckersError::Game(GameError::InvalidBlack(_))));
        assert_eq!(keeper.store().get_system_info().unwrap().unwrap().next_id, 1);
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn test_create_without_genesis_is_fatal() {
        let mut keeper: TestKeeper = Keeper::new(
            MemoryStore::new(),
            MemoryBank::new(),
            SimpleRules,
            RecordingLeaderboard::new(),
            &CheckersConfig::default(),
        )
        .unwrap();
        let mut ctx = BlockContext::new(1, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        let err = keeper
            .create_game(
                &mut ctx,
                MsgCreateGame {
                    creator: "carol".to_string(),
                    black: "alice".to_string(),
                    red: "bob".to_string(),
                    wager: 1,
                    denom: "stake".to_string(),
                },
            )
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_play_move_collects_and_extends_deadline() {
        let (mut keeper, mut ctx) = setup();
        create(&mut keeper, &mut ctx);
        ctx.advance(2, Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap());

        let response = keeper
            .play_move(&mut ctx, play("alice", "1", (1, 2), (2, 3)))
            .unwrap();
        assert_eq!(response.captured_x, -1);
        assert_eq!(response.winner, "*");

        let game = keeper.store().get_stored_game("1").unwrap().unwrap();
        assert_eq!(game.move_count, 1);
        assert_eq!(game.turn, "r");
        assert_eq!(game.deadline, "2024-03-02 13:00:00.000000000 +0000 UTC");
        assert_eq!(keeper.bank().balance("alice", "stake"), 55);
        assert_eq!(keeper.bank().module_balance("stake"), 45);
    }

    #[test]
    fn test_play_move_rejections_leave_state_untouched() {
        let (mut keeper, mut ctx) = setup();
        create(&mut keeper, &mut ctx);
        let before = keeper.store().get_stored_game("1").unwrap();

        let cases = vec![
            (play("alice", "9", (1, 2), (2, 3)), GameError::GameNotFound("9".into())),
            (play("dave", "1", (1, 2), (2, 3)), GameError::CreatorNotPlayer("dave".into())),
            (play("bob", "1", (0, 5), (1, 4)), GameError::NotPlayerTurn("red".into())),
        ];
        for (msg, expected) in cases {
            match keeper.play_move(&mut ctx, msg) {
                Err(CheckersError::Game(err)) => assert_eq!(err, expected),
                other => panic!("unexpected result {:?}", other),
            }
        }

        let err = keeper
            .play_move(&mut ctx, play("alice", "1", (1, 2), (1, 3)))
            .unwrap_err();
        assert!(matches!(err, CheckersError::Game(GameError::WrongMove(_))));

        assert_eq!(keeper.store().get_stored_game("1").unwrap(), before);
        assert!(keeper.bank().transfers().is_empty());
    }

    #[test]
    fn test_play_move_without_funds_is_rejected() {
        let (mut keeper, mut ctx) = setup();
        keeper
            .create_game(
                &mut ctx,
                MsgCreateGame {
                    creator: "carol".to_string(),
                    black: "alice".to_string(),
                    red: "bob".to_string(),
                    wager: 1_000,
                    denom: "stake".to_string(),
                },
            )
            .unwrap();

        let err = keeper
            .play_move(&mut ctx, play("alice", "1", (1, 2), (2, 3)))
            .unwrap_err();
        assert!(matches!(err, CheckersError::Game(GameError::BlackCannotPay(_))));

        let game = keeper.store().get_stored_game("1").unwrap().unwrap();
        assert_eq!(game.move_count, 0);
        assert_eq!(ctx.events().len(), 1);

        keeper.bank_mut().mint("alice", 900, "stake");
        keeper
            .play_move(&mut ctx, play("alice", "1", (1, 2), (2, 3)))
            .unwrap();
        assert_eq!(keeper.bank().balance("alice", "stake"), 0);
        assert_eq!(keeper.bank().module_balance("stake"), 1_000);
    }

    #[test]
    fn test_self_play_uses_turn() {
        let (mut keeper, mut ctx) = setup();
        keeper
            .create_game(
                &mut ctx,
                MsgCreateGame {
                    creator: "alice".to_string(),
                    black: "alice".to_string(),
                    red: "alice".to_string(),
                    wager: 10,
                    denom: "stake".to_string(),
                },
            )
            .unwrap();

        keeper.play_move(&mut ctx, play("alice", "1", (1, 2), (2, 3))).unwrap();
        keeper.play_move(&mut ctx, play("alice", "1", (0, 5), (1, 4))).unwrap();

        assert_eq!(keeper.bank().balance("alice", "stake"), 80);
        assert_eq!(keeper.store().get_stored_game("1").unwrap().unwrap().move_count, 2);
    }

    #[test]
    fn test_reject_by_black_before_playing() {
        let (mut keeper, mut ctx) = setup();
        create(&mut keeper, &mut ctx);
        create(&mut keeper, &mut ctx);

        keeper
            .reject_game(
                &mut ctx,
                MsgRejectGame {
                    creator: "alice".to_string(),
                    game_index: "1".to_string(),
                },
            )
            .unwrap();

        assert_eq!(keeper.store().get_stored_game("1").unwrap(), None);
        let info = keeper.store().get_system_info().unwrap().unwrap();
        assert_eq!(info.fifo_head_index, "2");
        assert_eq!(info.fifo_tail_index, "2");
        assert_eq!(ctx.gas_consumed(), 30_000 - 14_000);
        assert!(keeper.bank().transfers().is_empty());
    }

    #[test]
    fn test_reject_by_red_refunds_black() {
        let (mut keeper, mut ctx) = setup();
        create(&mut keeper, &mut ctx);
        keeper.play_move(&mut ctx, play("alice", "1", (1, 2), (2, 3))).unwrap();

        let err = keeper
            .reject_game(
                &mut ctx,
                MsgRejectGame {
                    creator: "alice".to_string(),
                    game_index: "1".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, CheckersError::Game(GameError::BlackAlreadyPlayed)));

        keeper
            .reject_game(
                &mut ctx,
                MsgRejectGame {
                    creator: "bob".to_string(),
                    game_index: "1".to_string(),
                },
            )
            .unwrap();
        assert_eq!(keeper.bank().balance("alice", "stake"), 100);
        assert!(keeper.store().get_system_info().unwrap().unwrap().fifo_is_empty());
        assert_eq!(keeper.metrics().snapshot().refunded_amount, 45);
    }

    #[test]
    fn test_reject_after_both_played() {
        let (mut keeper, mut ctx) = setup();
        create(&mut keeper, &mut ctx);
        keeper.play_move(&mut ctx, play("alice", "1", (1, 2), (2, 3))).unwrap();
        keeper.play_move(&mut ctx, play("bob", "1", (0, 5), (1, 4))).unwrap();

        let err = keeper
            .reject_game(
                &mut ctx,
                MsgRejectGame {
                    creator: "bob".to_string(),
                    game_index: "1".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, CheckersError::Game(GameError::RedAlreadyPlayed)));
    }
}
