/// Common test utilities for the wallet engine integration tests.
///
/// Provides a scriptable in-process `LedgerClient` so the funding workflow,
/// sync controller and manager can be exercised without a node, plus a
/// helper that wires a `WalletManager` over an in-memory store.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use xrpl_wallet::config::WalletConfig;
use xrpl_wallet::error::WalletError;
use xrpl_wallet::ledger::{AccountLine, FamilySeedDeriver, Keypair, LedgerClient};
use xrpl_wallet::storage::MemoryStore;
use xrpl_wallet::wallet::WalletManager;

/// Call counters recorded by the mock.
#[derive(Debug, Default, Clone)]
pub struct CallCounts {
    pub connects: usize,
    pub disconnects: usize,
    pub faucet_calls: usize,
    pub submissions: usize,
}

#[derive(Default)]
pub struct MockState {
    /// Fail the next connect attempts.
    pub connect_fails: bool,
    /// Fail faucet requests.
    pub faucet_fails: bool,
    /// Fail balance/line/history queries with a transport error.
    pub queries_fail: bool,
    /// Native balance in display units; `None` simulates account-not-found.
    pub native_balance: Option<String>,
    /// Amount the faucet credits an account that does not exist yet.
    pub faucet_credit: String,
    /// Trust lines reported by `account_lines`.
    pub lines: Vec<AccountLine>,
    /// Raw entries returned by `account_tx`.
    pub transactions: Vec<Value>,
    /// Engine code returned by `submit_and_wait`.
    pub submit_result: String,
    pub counts: CallCounts,
}

/// Scriptable ledger double. State is behind a mutex so tests can inspect
/// and reconfigure it mid-scenario through a shared handle.
#[derive(Clone)]
pub struct MockLedger {
    pub state: Arc<Mutex<MockState>>,
}

impl MockLedger {
    pub fn new() -> Self {
        let state = MockState {
            faucet_credit: "1000".to_string(),
            submit_result: "tesSUCCESS".to_string(),
            ..MockState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn counts(&self) -> CallCounts {
        self.lock().counts.clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn connect(&self) -> Result<(), WalletError> {
        let mut state = self.lock();
        state.counts.connects += 1;
        if state.connect_fails {
            return Err(WalletError::Connection("mock node unreachable".to_string()));
        }
        Ok(())
    }

    async fn disconnect(&self) {
        self.lock().counts.disconnects += 1;
    }

    async fn get_native_balance(&self, _address: &str) -> Result<String, WalletError> {
        let state = self.lock();
        if state.queries_fail {
            return Err(WalletError::Connection("mock transport error".to_string()));
        }
        match &state.native_balance {
            Some(balance) => Ok(balance.clone()),
            None => Err(WalletError::Internal("account_info: actNotFound".to_string())),
        }
    }

    async fn account_lines(&self, _address: &str) -> Result<Vec<AccountLine>, WalletError> {
        let state = self.lock();
        if state.queries_fail {
            return Err(WalletError::Connection("mock transport error".to_string()));
        }
        Ok(state.lines.clone())
    }

    async fn account_tx(&self, _address: &str, limit: u32) -> Result<Vec<Value>, WalletError> {
        let state = self.lock();
        if state.queries_fail {
            return Err(WalletError::Connection("mock transport error".to_string()));
        }
        Ok(state
            .transactions
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fund_from_faucet(&self, _address: &str) -> Result<(), WalletError> {
        let mut state = self.lock();
        state.counts.faucet_calls += 1;
        if state.faucet_fails {
            return Err(WalletError::Faucet("mock faucet is busy".to_string()));
        }
        // The faucet activates unfunded accounts and tops up funded ones.
        if state.native_balance.is_none() {
            state.native_balance = Some(state.faucet_credit.clone());
        }
        Ok(())
    }

    async fn submit_and_wait(&self, tx: Value, _keypair: &Keypair) -> Result<String, WalletError> {
        let mut state = self.lock();
        state.counts.submissions += 1;
        let code = state.submit_result.clone();

        // A successful TrustSet becomes visible as a zero-balance line.
        if code == "tesSUCCESS" && tx["TransactionType"] == "TrustSet" {
            let limit = &tx["LimitAmount"];
            state.lines.push(AccountLine {
                currency: limit["currency"].as_str().unwrap_or_default().to_string(),
                account: limit["issuer"].as_str().unwrap_or_default().to_string(),
                balance: "0".to_string(),
                limit: limit["value"].as_str().unwrap_or_default().to_string(),
            });
        }
        Ok(code)
    }
}

/// Manager over an in-memory store, the mock ledger and real seed derivation.
pub fn test_manager(ledger: &MockLedger) -> WalletManager {
    WalletManager::with_components(
        WalletConfig::default(),
        Box::new(MemoryStore::new()),
        Box::new(ledger.clone()),
        Box::new(FamilySeedDeriver::new()),
    )
    .expect("manager construction cannot fail over a memory store")
}

/// A trust line to the tracked issuer, as the node would report it.
pub fn tracked_line(config: &WalletConfig, balance: &str) -> AccountLine {
    AccountLine {
        currency: config.token_currency.clone(),
        account: config.token_issuer.clone(),
        balance: balance.to_string(),
        limit: config.trust_line_limit.clone(),
    }
}
