//! Wager escrow and settlement.
//!
//! Players pay on their first move: black when `move_count` goes 0 -> 1, red
//! when it goes 1 -> 2. The amount owed back at settlement therefore depends
//! only on how far the game progressed.

use crate::{
    errors::{CheckersResult, FatalError, GameError},
    games::types::{Coin, StoredGame},
};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient funds: {account} has {available}, needs {needed}")]
    InsufficientFunds {
        account: String,
        available: u64,
        needed: u64,
    },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("module account cannot cover {0}")]
    ModuleUnderfunded(String),
}

/// Moves coins between player accounts and the pooled module account
pub trait BankKeeper {
    fn send_coins_from_account_to_module(
        &mut self,
        account: &str,
        coin: &Coin,
    ) -> Result<(), BankError>;

    fn send_coins_from_module_to_account(
        &mut self,
        account: &str,
        coin: &Coin,
    ) -> Result<(), BankError>;
}

/// Escrow the wager of whoever is about to make their first move.
///
/// Must be called before `move_count` is incremented. Returns the escrowed
/// coin, or `None` when this move carries no payment.
pub fn collect_wager<B: BankKeeper + ?Sized>(
    bank: &mut B,
    game: &StoredGame,
) -> Result<Option<Coin>, GameError> {
    let coin = game.wager_coin();
    match game.move_count {
        0 => {
            let black = game.black_address()?;
            bank.send_coins_from_account_to_module(black, &coin)
                .map_err(|e| GameError::BlackCannotPay(e.to_string()))?;
        }
        1 => {
            let red = game.red_address()?;
            bank.send_coins_from_account_to_module(red, &coin)
                .map_err(|e| GameError::RedCannotPay(e.to_string()))?;
        }
        _ => return Ok(None),
    }

    tracing::debug!(
        game_index = %game.index,
        move_count = game.move_count,
        wager = %coin,
        "Collected wager"
    );
    Ok(Some(coin))
}

/// Amount owed to the winner of `game`
pub fn winnings(game: &StoredGame) -> Result<Coin, FatalError> {
    match game.move_count {
        0 => Err(FatalError::NothingToPay(game.index.clone())),
        // only black has paid; reachable when black wins on the first move
        1 => Ok(game.wager_coin()),
        _ => {
            let amount = game
                .wager
                .checked_mul(2)
                .ok_or_else(|| FatalError::WagerOverflow(game.index.clone()))?;
            Ok(Coin::new(amount, game.denom.clone()))
        }
    }
}

/// Pay the pot to the player named by `game.winner`
pub fn pay_winnings<B: BankKeeper + ?Sized>(
    bank: &mut B,
    game: &StoredGame,
) -> CheckersResult<Coin> {
    let winner = game
        .winner_address()?
        .ok_or_else(|| FatalError::CannotFindWinnerByColor(game.winner.clone()))?;
    let coin = winnings(game)?;

    bank.send_coins_from_module_to_account(winner, &coin)
        .map_err(|e| FatalError::CannotPayWinnings {
            index: game.index.clone(),
            reason: e.to_string(),
        })?;

    tracing::info!(game_index = %game.index, winner, amount = %coin, "Paid winnings");
    Ok(coin)
}

/// Give black back the stake of a game that was never really played.
///
/// Returns `None` when nothing had been escrowed yet.
pub fn refund_wager<B: BankKeeper + ?Sized>(
    bank: &mut B,
    game: &StoredGame,
) -> CheckersResult<Option<Coin>> {
    match game.move_count {
        0 => Ok(None),
        1 => {
            let coin = game.wager_coin();
            bank.send_coins_from_module_to_account(&game.black, &coin)
                .map_err(|e| FatalError::CannotRefundWager {
                    index: game.index.clone(),
                    reason: e.to_string(),
                })?;

            tracing::info!(
                game_index = %game.index,
                black = %game.black,
                amount = %coin,
                "Refunded wager"
            );
            Ok(Some(coin))
        }
        // TODO: draws would need both stakes refunded here
        move_count => Err(FatalError::NotInRefundState {
            index: game.index.clone(),
            move_count,
        }
        .into()),
    }
}
