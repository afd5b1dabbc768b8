//! Persistent game records and the system counter, stored as JSON.

use crate::{
    errors::{CheckersResult, StorageError},
    games::types::{StoredGame, SystemInfo},
    storage::KvStore,
};

const STORED_GAME_PREFIX: &str = "StoredGame/value/";
pub const SYSTEM_INFO_KEY: &[u8] = b"SystemInfo-value-";

pub fn stored_game_key(index: &str) -> Vec<u8> {
    format!("{}{}/", STORED_GAME_PREFIX, index).into_bytes()
}

/// Typed access to games and the system counter
pub trait GameStore {
    fn get_stored_game(&self, index: &str) -> CheckersResult<Option<StoredGame>>;

    fn set_stored_game(&mut self, game: &StoredGame) -> CheckersResult<()>;

    fn remove_stored_game(&mut self, index: &str) -> CheckersResult<()>;

    fn get_system_info(&self) -> CheckersResult<Option<SystemInfo>>;

    fn set_system_info(&mut self, info: &SystemInfo) -> CheckersResult<()>;
}

impl<S: KvStore + ?Sized> GameStore for S {
    fn get_stored_game(&self, index: &str) -> CheckersResult<Option<StoredGame>> {
        let Some(bytes) = self.get(&stored_game_key(index))? else {
            return Ok(None);
        };

        let game = serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::CorruptedData(format!("Failed to decode game {}: {}", index, e))
        })?;
        Ok(Some(game))
    }

    fn set_stored_game(&mut self, game: &StoredGame) -> CheckersResult<()> {
        let bytes = serde_json::to_vec(game).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to encode game {}: {}", game.index, e))
        })?;
        self.set(&stored_game_key(&game.index), &bytes)
    }

    fn remove_stored_game(&mut self, index: &str) -> CheckersResult<()> {
        tracing::debug!(game_index = index, "Removing stored game");
        self.delete(&stored_game_key(index))
    }

    fn get_system_info(&self) -> CheckersResult<Option<SystemInfo>> {
        let Some(bytes) = self.get(SYSTEM_INFO_KEY)? else {
            return Ok(None);
        };

        let info = serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::CorruptedData(format!("Failed to decode system info: {}", e))
        })?;
        Ok(Some(info))
    }

    fn set_system_info(&mut self, info: &SystemInfo) -> CheckersResult<()> {
        let bytes = serde_json::to_vec(info).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to encode system info: {}", e))
        })?;
        self.set(SYSTEM_INFO_KEY, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CheckersError;
    use crate::games::types::NO_FIFO_INDEX;
    use crate::storage::MemoryStore;

    fn game(index: &str) -> StoredGame {
        StoredGame {
            index: index.to_string(),
            board: "board".to_string(),
            turn: "b".to_string(),
            black: "alice".to_string(),
            red: "bob".to_string(),
            move_count: 0,
            before_index: NO_FIFO_INDEX.to_string(),
            after_index: NO_FIFO_INDEX.to_string(),
            deadline: "2024-01-01 00:00:00.000000000 +0000 UTC".to_string(),
            winner: "*".to_string(),
            wager: 1,
            denom: "coin".to_string(),
        }
    }

    #[test]
    fn test_stored_game_crud() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_stored_game("1").unwrap(), None);

        store.set_stored_game(&game("1")).unwrap();
        assert_eq!(store.get_stored_game("1").unwrap(), Some(game("1")));

        store.remove_stored_game("1").unwrap();
        assert_eq!(store.get_stored_game("1").unwrap(), None);
    }

    #[test]
    fn test_games_do_not_collide_on_prefix() {
        let mut store = MemoryStore::new();
        store.set_stored_game(&game("1")).unwrap();
        store.set_stored_game(&game("11")).unwrap();
        store.remove_stored_game("1").unwrap();

        assert!(store.get_stored_game("11").unwrap().is_some());
    }

    #[test]
    fn test_system_info_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_system_info().unwrap(), None);

        store.set_system_info(&SystemInfo::default()).unwrap();
        assert_eq!(store.get_system_info().unwrap(), Some(SystemInfo::default()));
    }

    #[test]
    fn test_corrupted_record_is_storage_error() {
        let mut store = MemoryStore::new();
        store.set(&stored_game_key("1"), b"not json").unwrap();

        let err = store.get_stored_game("1").unwrap_err();
        assert!(matches!(err, CheckersError::Storage(StorageError::CorruptedData(_))));
        assert!(err.is_fatal());
    }
}
