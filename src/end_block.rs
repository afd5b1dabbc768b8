//! Block-boundary forfeiture of games whose move deadline has passed.
//!
//! The deadline queue is ordered by deadline, so the sweep only ever looks at
//! the head: it settles the head while it is expired and stops at the first
//! game that is not. Work per block is bounded by the number of expired games.

use crate::{
    context::BlockContext,
    errors::{CheckersResult, FatalError},
    game_store::GameStore,
    games::{
        escrow::{self, BankKeeper},
        events::GameEvent,
        fifo,
        leaderboard::LeaderboardKeeper,
        rules::RulesEngine,
        types::{Coin, Player, NO_FIFO_INDEX},
    },
    keeper::Keeper,
    storage::KvStore,
};
use serde::{Deserialize, Serialize};

/// How a single expired game was settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForfeitOutcome {
    /// Never played: deleted, nothing was escrowed
    Erased,
    /// Only black moved: deleted, black got the stake back
    Refunded { refund: Coin },
    /// The player to move ran out of time and the opponent won the pot
    Forfeited { winner: Player, payout: Coin },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitedGame {
    pub game_index: String,
    pub outcome: ForfeitOutcome,
}

impl<S, B, R, L> Keeper<S, B, R, L>
where
    S: KvStore,
    B: BankKeeper,
    R: RulesEngine,
    L: LeaderboardKeeper,
{
    /// Everything the module does at the end of a block
    pub fn end_block(&mut self, ctx: &mut BlockContext) -> CheckersResult<Vec<ForfeitedGame>> {
        self.forfeit_expired_games(ctx)
    }

    /// Settle, in queue order, every game whose deadline is strictly before the
    /// block time. Any error returned here is fatal.
    pub fn forfeit_expired_games(
        &mut self,
        ctx: &mut BlockContext,
    ) -> CheckersResult<Vec<ForfeitedGame>> {
        let now = ctx.block_time();
        let mut info = self.must_get_system_info()?;
        let mut settled = Vec::new();

        let mut game_index = info.fifo_head_index.clone();
        while game_index != NO_FIFO_INDEX {
            let mut game = self.store.get_stored_game(&game_index)?.ok_or_else(|| {
                tracing::error!(game_index = %game_index, "Fifo head game not found");
                FatalError::FifoGameNotFound(game_index.clone())
            })?;

            let deadline = game.deadline_as_time()?;
            if deadline >= now {
                // everything behind the head expires later
                break;
            }

            fifo::remove_from_fifo(&mut self.store, &mut game, &mut info)?;

            let last_board = game.board.clone();
            let outcome = if game.move_count <= 1 {
                // never really played, pretend it did not exist
                self.store.remove_stored_game(&game.index)?;
                match escrow::refund_wager(&mut self.bank, &game)? {
                    Some(refund) => {
                        self.metrics.record_refund(refund.amount);
                        ForfeitOutcome::Refunded { refund }
                    }
                    None => ForfeitOutcome::Erased,
                }
            } else {
                let winner = Player::from_tag(&game.turn)
                    .and_then(|stalled| stalled.opponent())
                    .ok_or_else(|| {
                        tracing::error!(
                            game_index = %game.index,
                            turn = %game.turn,
                            "No opponent for turn"
                        );
                        FatalError::CannotFindWinnerByColor(game.turn.clone())
                    })?;
                game.winner = winner.tag().to_string();
                game.board.clear();

                let payout = escrow::pay_winnings(&mut self.bank, &game)?;
                self.metrics.record_payout(payout.amount);
                self.store.set_stored_game(&game)?;

                if let (Some(won), Some(forfeited)) = (
                    game.player_address(winner),
                    winner.opponent().and_then(|loser| game.player_address(loser)),
                ) {
                    self.leaderboard.add_won_game(won);
                    self.leaderboard.add_forfeited_game(forfeited);
                }
                ForfeitOutcome::Forfeited { winner, payout }
            };

            match &outcome {
                ForfeitOutcome::Forfeited { .. } => self.metrics.record_forfeit(),
                _ => self.metrics.record_erased(),
            }
            tracing::info!(
                game_index = %game.index,
                move_count = game.move_count,
                winner = %game.winner,
                deadline = %game.deadline,
                "Forfeited expired game"
            );

            ctx.emit(GameEvent::GameForfeited {
                game_index: game.index.clone(),
                winner: game.winner.clone(),
                board: last_board,
            });
            settled.push(ForfeitedGame {
                game_index: game.index,
                outcome,
            });

            game_index = info.fifo_head_index.clone();
        }

        self.store.set_system_info(&info)?;
        self.metrics.record_sweep();
        if !settled.is_empty() {
            tracing::info!(
                height = ctx.height(),
                count = settled.len(),
                head = %info.fifo_head_index,
                "Forfeit sweep settled games"
            );
        }
        Ok(settled)
    }
}
