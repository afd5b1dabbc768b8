//! Deadline queue: an intrusive doubly-linked list threaded through the
//! stored games by index.
//!
//! Every move pushes its game to the tail with the furthest deadline, so the
//! head always holds the game that expires first. The game being moved is
//! owned by the caller and is NOT written here; only its neighbours are. The
//! caller persists both the game and the [`SystemInfo`] afterwards.

use crate::{
    errors::{CheckersResult, FatalError},
    game_store::GameStore,
    games::types::{StoredGame, SystemInfo, NO_FIFO_INDEX},
};

fn load_neighbour<S: GameStore + ?Sized>(
    store: &S,
    index: &str,
    role: &str,
) -> CheckersResult<StoredGame> {
    store.get_stored_game(index)?.ok_or_else(|| {
        tracing::error!(game_index = index, role, "Fifo neighbour missing from store");
        FatalError::FifoGameNotFound(format!("{} {}", role, index)).into()
    })
}

/// Detach `game` from the queue, relinking its neighbours or moving the
/// head/tail. Must only be called on a game that is in the queue (a game with
/// sentinel links that is neither head nor tail is left untouched).
pub fn remove_from_fifo<S: GameStore + ?Sized>(
    store: &mut S,
    game: &mut StoredGame,
    info: &mut SystemInfo,
) -> CheckersResult<()> {
    if game.before_index != NO_FIFO_INDEX {
        let mut before = load_neighbour(store, &game.before_index, "before")?;
        before.after_index = game.after_index.clone();
        store.set_stored_game(&before)?;
        if game.after_index == NO_FIFO_INDEX {
            info.fifo_tail_index = before.index.clone();
        }
    } else if info.fifo_head_index == game.index {
        info.fifo_head_index = game.after_index.clone();
    }

    if game.after_index != NO_FIFO_INDEX {
        let mut after = load_neighbour(store, &game.after_index, "after")?;
        after.before_index = game.before_index.clone();
        store.set_stored_game(&after)?;
        if game.before_index == NO_FIFO_INDEX {
            info.fifo_head_index = after.index.clone();
        }
    } else if info.fifo_tail_index == game.index {
        info.fifo_tail_index = game.before_index.clone();
    }

    tracing::debug!(
        game_index = %game.index,
        head = %info.fifo_head_index,
        tail = %info.fifo_tail_index,
        "Removed game from fifo"
    );

    game.before_index = NO_FIFO_INDEX.to_string();
    game.after_index = NO_FIFO_INDEX.to_string();
    Ok(())
}

/// Put `game` at the tail of the queue, excising it first if it is queued
/// elsewhere. A game already at the tail stays where it is.
pub fn send_to_fifo_tail<S: GameStore + ?Sized>(
    store: &mut S,
    game: &mut StoredGame,
    info: &mut SystemInfo,
) -> CheckersResult<()> {
    let head_empty = info.fifo_head_index == NO_FIFO_INDEX;
    let tail_empty = info.fifo_tail_index == NO_FIFO_INDEX;

    if head_empty && tail_empty {
        game.before_index = NO_FIFO_INDEX.to_string();
        game.after_index = NO_FIFO_INDEX.to_string();
        info.fifo_head_index = game.index.clone();
        info.fifo_tail_index = game.index.clone();
    } else if head_empty || tail_empty {
        tracing::error!(
            head = %info.fifo_head_index,
            tail = %info.fifo_tail_index,
            "Fifo has only one boundary"
        );
        return Err(FatalError::FifoCorrupted(
            "fifo should have both head and tail or none".to_string(),
        )
        .into());
    } else if info.fifo_tail_index == game.index {
        // already last
    } else {
        remove_from_fifo(store, game, info)?;

        let mut current_tail = load_neighbour(store, &info.fifo_tail_index, "tail")?;
        current_tail.after_index = game.index.clone();
        store.set_stored_game(&current_tail)?;

        game.before_index = current_tail.index.clone();
        info.fifo_tail_index = game.index.clone();
    }

    tracing::debug!(
        game_index = %game.index,
        head = %info.fifo_head_index,
        tail = %info.fifo_tail_index,
        "Sent game to fifo tail"
    );
    Ok(())
}
