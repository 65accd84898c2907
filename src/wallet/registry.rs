//! Wallet registry: the persisted, ordered collection of managed accounts
//! plus the at-most-one active selection.

use crate::error::StorageError;
use crate::storage::{
    KeyValueStore, WalletRecord, ACTIVE_ADDRESS_KEY, LEGACY_WALLET_KEY, WALLETS_KEY,
};

pub struct WalletRegistry {
    store: Box<dyn KeyValueStore>,
    wallets: Vec<WalletRecord>,
    active_address: Option<String>,
}

impl WalletRegistry {
    /// Load the registry from storage, running the one-shot migration from
    /// the legacy single-wallet format when applicable.
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let wallets: Vec<WalletRecord> = match store.get(WALLETS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        let active_address = store.get(ACTIVE_ADDRESS_KEY)?;

        let mut registry = Self {
            store,
            wallets,
            active_address,
        };
        registry.migrate_legacy()?;
        Ok(registry)
    }

    /// If a legacy single-wallet entry exists and the collection is empty,
    /// the legacy record becomes the sole member. The legacy key is removed
    /// either way only after a successful adoption, so the migration is
    /// self-clearing and runs at most once per storage lifetime.
    fn migrate_legacy(&mut self) -> Result<(), StorageError> {
        let Some(json) = self.store.get(LEGACY_WALLET_KEY)? else {
            return Ok(());
        };
        if !self.wallets.is_empty() {
            return Ok(());
        }

        let legacy: WalletRecord = serde_json::from_str(&json)?;
        log::info!("Migrating legacy single-wallet entry for {}", legacy.address);

        self.active_address = Some(legacy.address.clone());
        self.wallets.push(legacy);
        self.store.remove(LEGACY_WALLET_KEY)?;
        self.persist()
    }

    /// Full-snapshot write of the collection and the active pointer.
    fn persist(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.wallets)?;
        self.store.set(WALLETS_KEY, &json)?;
        match &self.active_address {
            Some(address) => self.store.set(ACTIVE_ADDRESS_KEY, address)?,
            None => self.store.remove(ACTIVE_ADDRESS_KEY)?,
        }
        Ok(())
    }

    /// Add a record and make it active. Adding an address that already
    /// exists does not grow the collection; it just reselects that address.
    pub fn add(&mut self, record: WalletRecord) -> Result<(), StorageError> {
        if self.wallets.iter().any(|w| w.address == record.address) {
            log::debug!("Wallet {} already registered, reselecting", record.address);
            self.active_address = Some(record.address);
            return self.persist();
        }

        self.active_address = Some(record.address.clone());
        self.wallets.push(record);
        self.persist()
    }

    /// Point the active selection at the given address. No existence check;
    /// a dangling pointer simply reads back as no active wallet.
    pub fn select(&mut self, address: &str) -> Result<(), StorageError> {
        self.active_address = Some(address.to_string());
        self.persist()
    }

    /// Remove a record. Deleting the active address falls back to the first
    /// remaining record, or clears the selection when none remain.
    pub fn delete(&mut self, address: &str) -> Result<(), StorageError> {
        self.wallets.retain(|w| w.address != address);

        if self.active_address.as_deref() == Some(address) {
            self.active_address = self.wallets.first().map(|w| w.address.clone());
        }
        self.persist()
    }

    /// Apply a field patch to the matching record. No-op when the address is
    /// absent; returns whether a record was touched.
    pub fn update<F>(&mut self, address: &str, patch: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut WalletRecord),
    {
        let Some(record) = self.wallets.iter_mut().find(|w| w.address == address) else {
            return Ok(false);
        };
        patch(record);
        self.persist()?;
        Ok(true)
    }

    /// The record the active pointer references, if it references anything.
    pub fn active_record(&self) -> Option<&WalletRecord> {
        let address = self.active_address.as_deref()?;
        self.wallets.iter().find(|w| w.address == address)
    }

    pub fn active_address(&self) -> Option<&str> {
        self.active_address.as_deref()
    }

    pub fn get(&self, address: &str) -> Option<&WalletRecord> {
        self.wallets.iter().find(|w| w.address == address)
    }

    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn record(address: &str) -> WalletRecord {
        WalletRecord::new(
            address.to_string(),
            format!("seed-{}", address),
            String::new(),
            String::new(),
        )
    }

    fn empty_registry() -> WalletRegistry {
        WalletRegistry::load(Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_add_selects_new_wallet() {
        let mut registry = empty_registry();
        registry.add(record("rA")).unwrap();
        registry.add(record("rB")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_address(), Some("rB"));
    }

    #[test]
    fn test_duplicate_add_reselects_without_growing() {
        let mut registry = empty_registry();
        registry.add(record("rA")).unwrap();
        registry.add(record("rB")).unwrap();
        registry.add(record("rA")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_address(), Some("rA"));
    }

    #[test]
    fn test_delete_active_falls_back_to_first() {
        let mut registry = empty_registry();
        registry.add(record("rA")).unwrap();
        registry.add(record("rB")).unwrap();
        registry.add(record("rC")).unwrap();

        registry.delete("rC").unwrap();
        assert_eq!(registry.active_address(), Some("rA"));

        // Deleting a non-active wallet leaves the selection alone.
        registry.delete("rB").unwrap();
        assert_eq!(registry.active_address(), Some("rA"));

        registry.delete("rA").unwrap();
        assert_eq!(registry.active_address(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dangling_selection_reads_as_no_active_wallet() {
        let mut registry = empty_registry();
        registry.add(record("rA")).unwrap();
        registry.select("rMissing").unwrap();

        assert_eq!(registry.active_address(), Some("rMissing"));
        assert!(registry.active_record().is_none());
    }

    #[test]
    fn test_update_patches_matching_record_only() {
        let mut registry = empty_registry();
        registry.add(record("rA")).unwrap();

        let touched = registry
            .update("rA", |w| w.native_balance = "25".to_string())
            .unwrap();
        assert!(touched);
        assert_eq!(registry.get("rA").unwrap().native_balance, "25");

        let touched = registry
            .update("rGone", |w| w.native_balance = "99".to_string())
            .unwrap();
        assert!(!touched);
    }

    #[test]
    fn test_state_survives_reload() {
        let mut store = MemoryStore::new();
        // Seed via one registry instance, reload through the raw snapshot.
        {
            let mut registry = WalletRegistry::load(Box::new(MemoryStore::new())).unwrap();
            registry.add(record("rA")).unwrap();
            registry.add(record("rB")).unwrap();
            registry.select("rA").unwrap();

            let wallets = serde_json::to_string(registry.wallets()).unwrap();
            store.set(WALLETS_KEY, &wallets).unwrap();
            store.set(ACTIVE_ADDRESS_KEY, "rA").unwrap();
        }

        let reloaded = WalletRegistry::load(Box::new(store)).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.active_address(), Some("rA"));
    }

    #[test]
    fn test_legacy_migration_is_one_shot() {
        let mut store = MemoryStore::new();
        let legacy = serde_json::to_string(&record("rLegacy")).unwrap();
        store.set(LEGACY_WALLET_KEY, &legacy).unwrap();

        let registry = WalletRegistry::load(Box::new(store)).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_address(), Some("rLegacy"));

        // Legacy key was consumed by the migration.
        assert_eq!(registry.store.get(LEGACY_WALLET_KEY).unwrap(), None);
        // And the migrated collection was persisted.
        assert!(registry.store.get(WALLETS_KEY).unwrap().is_some());
    }

    #[test]
    fn test_legacy_entry_ignored_when_collection_exists() {
        let mut store = MemoryStore::new();
        let wallets = serde_json::to_string(&vec![record("rA")]).unwrap();
        store.set(WALLETS_KEY, &wallets).unwrap();
        let legacy = serde_json::to_string(&record("rLegacy")).unwrap();
        store.set(LEGACY_WALLET_KEY, &legacy).unwrap();

        let registry = WalletRegistry::load(Box::new(store)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("rLegacy").is_none());
    }
}
