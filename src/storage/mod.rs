//! Key-value persistence for wallet state.
//!
//! The registry talks to a `KeyValueStore` capability rather than any concrete
//! backend, so tests substitute `MemoryStore` and the binary uses `FileStore`.

pub mod file_store;
pub mod models;

pub use file_store::FileStore;
pub use models::{Balances, WalletRecord};

use std::collections::HashMap;

use crate::error::StorageError;

/// Storage key for the JSON-encoded wallet collection.
pub const WALLETS_KEY: &str = "wallets";
/// Storage key for the active wallet address (plain string).
pub const ACTIVE_ADDRESS_KEY: &str = "active_address";
/// Legacy single-wallet storage key, consumed by the one-shot migration.
pub const LEGACY_WALLET_KEY: &str = "wallet";

/// String-keyed persistence capability with get/set/remove semantics.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
