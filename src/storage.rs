//! Key-value storage backends: in-memory and RocksDB

use crate::config::{CompressionType, StorageConfig};
use crate::errors::{CheckersResult, StorageError};
use rocksdb::{Options, DB};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Minimal synchronous key-value store the keeper persists into
pub trait KvStore {
    fn get(&self, key: &[u8]) -> CheckersResult<Option<Vec<u8>>>;

    fn set(&mut self, key: &[u8], value: &[u8]) -> CheckersResult<()>;

    fn delete(&mut self, key: &[u8]) -> CheckersResult<()>;
}

/// Ordered in-memory store, used by tests and by hosts that snapshot state themselves
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> CheckersResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> CheckersResult<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> CheckersResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// RocksDB-backed store
#[derive(Clone)]
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    pub fn open<P: AsRef<Path>>(path: P, config: &StorageConfig) -> CheckersResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size_mb * 1024 * 1024);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_compression_type(match config.compression_type {
            CompressionType::None => rocksdb::DBCompressionType::None,
            CompressionType::Snappy => rocksdb::DBCompressionType::Snappy,
            CompressionType::Lz4 => rocksdb::DBCompressionType::Lz4,
            CompressionType::Zstd => rocksdb::DBCompressionType::Zstd,
        });

        let db = DB::open(&opts, path)
            .map_err(|e| StorageError::DatabaseOpenFailed(e.to_string()))?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open the store at the configured data directory
    pub fn from_config(config: &StorageConfig) -> CheckersResult<Self> {
        Self::open(&config.data_directory, config)
    }
}

impl KvStore for RocksStore {
    fn get(&self, key: &[u8]) -> CheckersResult<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|e| StorageError::ReadFailed(e.to_string()).into())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> CheckersResult<()> {
        self.db.put(key, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> CheckersResult<()> {
        self.db.delete(key)?;
        Ok(())
    }
}
