//! Orchestrator for all wallet operations: the single entry point the API
//! layer talks to. Owns the registry, the sync controller, the funding
//! orchestrator and the ledger/keypair collaborators.

use std::collections::HashSet;
use std::sync::{Mutex as StdMutex, PoisonError};

use tokio::sync::Mutex;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::{FamilySeedDeriver, JsonRpcLedgerClient, KeyDeriver, LedgerClient};
use crate::storage::{Balances, FileStore, KeyValueStore, WalletRecord};
use crate::wallet::funding::{FundingOrchestrator, FundingPhase};
use crate::wallet::normalize::{self, Transaction};
use crate::wallet::registry::WalletRegistry;
use crate::wallet::send;
use crate::wallet::sync::SyncController;

pub struct WalletManager {
    config: WalletConfig,
    registry: Mutex<WalletRegistry>,
    sync: SyncController,
    orchestrator: FundingOrchestrator,
    client: Box<dyn LedgerClient>,
    deriver: Box<dyn KeyDeriver>,
    /// Addresses with a funding call outstanding. Funding is not re-entrant
    /// per wallet; this is the call-site in-flight flag.
    funding_in_flight: StdMutex<HashSet<String>>,
    /// Latest funding progress string, cleared on completion or failure.
    funding_status: StdMutex<Option<String>>,
}

impl WalletManager {
    /// Production wiring: file-backed store, JSON-RPC node client, family
    /// seed key derivation.
    pub fn new(config: WalletConfig) -> Result<Self, WalletError> {
        let store = FileStore::open_default()?;
        let client = JsonRpcLedgerClient::new(&config);
        Self::with_components(config, Box::new(store), Box::new(client), Box::new(FamilySeedDeriver::new()))
    }

    /// Explicit wiring, used by tests to substitute fakes.
    pub fn with_components(
        config: WalletConfig,
        store: Box<dyn KeyValueStore>,
        client: Box<dyn LedgerClient>,
        deriver: Box<dyn KeyDeriver>,
    ) -> Result<Self, WalletError> {
        let registry = WalletRegistry::load(store)?;
        Ok(Self {
            orchestrator: FundingOrchestrator::new(config.clone()),
            config,
            registry: Mutex::new(registry),
            sync: SyncController::new(),
            client,
            deriver,
            funding_in_flight: StdMutex::new(HashSet::new()),
            funding_status: StdMutex::new(None),
        })
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Startup refresh: if an active wallet was persisted, bring its
    /// balances up to date before serving.
    pub async fn bootstrap(&self) -> Result<(), WalletError> {
        let active = {
            let registry = self.registry.lock().await;
            registry.active_record().map(|w| w.address.clone())
        };
        if let Some(address) = active {
            log::info!("Active wallet {} found on startup, refreshing", address);
            self.refresh(&address).await?;
        }
        Ok(())
    }

    /// Generate a fresh wallet locally and register it with zero balances.
    pub async fn create_wallet(&self) -> Result<WalletRecord, WalletError> {
        let keypair = self.deriver.generate()?;
        let record = WalletRecord::new(
            keypair.address,
            keypair.secret,
            keypair.public_key,
            keypair.private_key,
        );

        self.registry.lock().await.add(record.clone())?;
        log::info!("Created wallet {}", record.address);
        Ok(record)
    }

    /// Import a wallet from a family seed. A malformed seed fails before the
    /// registry is touched; balances are fetched best-effort so an unfunded
    /// account imports cleanly with zeros.
    pub async fn import_wallet(&self, secret: &str) -> Result<WalletRecord, WalletError> {
        let keypair = self.deriver.from_secret(secret)?;

        let balances =
            normalize::fetch_balances(self.client.as_ref(), &self.config, &keypair.address).await;

        let mut record = WalletRecord::new(
            keypair.address,
            keypair.secret,
            keypair.public_key,
            keypair.private_key,
        );
        record.native_balance = balances.native;
        record.token_balance = balances.token;

        self.registry.lock().await.add(record.clone())?;
        log::info!("Imported wallet {}", record.address);
        Ok(record)
    }

    pub async fn list_wallets(&self) -> (Vec<WalletRecord>, Option<String>) {
        let registry = self.registry.lock().await;
        (
            registry.wallets().to_vec(),
            registry.active_address().map(str::to_string),
        )
    }

    /// Switch the active wallet and refresh its balances.
    pub async fn select_wallet(&self, address: &str) -> Result<Balances, WalletError> {
        self.registry.lock().await.select(address)?;
        self.refresh(address).await
    }

    pub async fn delete_wallet(&self, address: &str) -> Result<(), WalletError> {
        let mut registry = self.registry.lock().await;
        if registry.get(address).is_none() {
            return Err(WalletError::WalletNotFound(address.to_string()));
        }
        registry.delete(address)?;
        log::info!("Deleted wallet {}", address);
        Ok(())
    }

    /// Run the funding workflow for a registered wallet and persist the
    /// refreshed balances on success. A failed step leaves the record's
    /// balance fields untouched; the next refresh picks up whatever the
    /// ledger actually holds.
    pub async fn fund_wallet(&self, address: &str) -> Result<Balances, WalletError> {
        let record = self
            .registry
            .lock()
            .await
            .get(address)
            .cloned()
            .ok_or_else(|| WalletError::WalletNotFound(address.to_string()))?;

        {
            let mut in_flight = self.lock_in_flight();
            if !in_flight.insert(address.to_string()) {
                return Err(WalletError::InvalidInput(
                    "funding already in progress for this wallet".to_string(),
                ));
            }
        }

        let result = self
            .orchestrator
            .fund(
                self.client.as_ref(),
                self.deriver.as_ref(),
                &record,
                |phase| self.set_funding_status(phase),
            )
            .await;

        self.lock_in_flight().remove(address);
        self.clear_funding_status();

        let balances = result?;
        self.registry.lock().await.update(address, |w| {
            w.native_balance = balances.native.clone();
            w.token_balance = balances.token.clone();
        })?;
        Ok(balances)
    }

    /// Send tracked tokens from a registered wallet, then refresh it.
    pub async fn send_token(
        &self,
        address: &str,
        destination: &str,
        amount: &str,
    ) -> Result<Balances, WalletError> {
        let record = self
            .registry
            .lock()
            .await
            .get(address)
            .cloned()
            .ok_or_else(|| WalletError::WalletNotFound(address.to_string()))?;

        send::send_token(
            self.client.as_ref(),
            self.deriver.as_ref(),
            &self.config,
            &record,
            destination,
            amount,
        )
        .await?;

        self.refresh(address).await
    }

    /// Explicit balance refresh for one address.
    pub async fn refresh(&self, address: &str) -> Result<Balances, WalletError> {
        let mut registry = self.registry.lock().await;
        self.sync
            .refresh(self.client.as_ref(), &self.config, &mut registry, address)
            .await
    }

    /// Normalized transaction history for one address.
    pub async fn transactions(&self, address: &str) -> Vec<Transaction> {
        normalize::fetch_transactions(self.client.as_ref(), &self.config, address).await
    }

    pub fn is_refreshing(&self) -> bool {
        self.sync.is_refreshing()
    }

    pub fn funding_status(&self) -> Option<String> {
        self.funding_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_funding_status(&self, phase: FundingPhase) {
        let mut status = self
            .funding_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *status = match phase {
            FundingPhase::Done => None,
            phase => Some(phase.to_string()),
        };
    }

    fn clear_funding_status(&self) {
        self.funding_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.funding_in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
