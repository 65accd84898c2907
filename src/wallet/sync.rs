//! Synchronization controller: owns the loading flag and writes refreshed
//! balances back into the registry.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::LedgerClient;
use crate::storage::Balances;
use crate::wallet::normalize;
use crate::wallet::registry::WalletRegistry;

/// Two observable states, `idle` and `refreshing`, surfaced as a boolean.
/// The flag never sticks: it is cleared once the fetch settles, success or
/// not (the fetch itself is fail-soft and cannot error).
pub struct SyncController {
    refreshing: AtomicBool,
}

impl SyncController {
    pub fn new() -> Self {
        Self {
            refreshing: AtomicBool::new(false),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Refresh balances for `address` and write them into its registry
    /// record. The result is written to the record it was fetched for even
    /// if the active selection moved while the fetch was in flight; late
    /// writes to a now-inactive record are harmless and deliberate.
    pub async fn refresh(
        &self,
        client: &dyn LedgerClient,
        config: &WalletConfig,
        registry: &mut WalletRegistry,
        address: &str,
    ) -> Result<Balances, WalletError> {
        self.refreshing.store(true, Ordering::SeqCst);
        log::debug!("Refreshing balances for {}", address);

        let balances = normalize::fetch_balances(client, config, address).await;
        let write = registry.update(address, |record| {
            record.native_balance = balances.native.clone();
            record.token_balance = balances.token.clone();
        });

        self.refreshing.store(false, Ordering::SeqCst);
        write?;
        Ok(balances)
    }
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new()
    }
}
