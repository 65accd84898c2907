use async_trait::async_trait;
use serde_json::{json, Value};

use super::keys::Keypair;
use super::types::AccountLine;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::wallet::normalize::drops_to_xrp;

/// RPC capability the engine drives.
///
/// One implementor instance corresponds to one node session: the engine
/// brackets every operation with `connect`/`disconnect` and never shares a
/// session across concurrent calls.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn connect(&self) -> Result<(), WalletError>;

    async fn disconnect(&self);

    /// Native balance in display units. Errors on account-not-found; callers
    /// on the query path treat that as an expected case.
    async fn get_native_balance(&self, address: &str) -> Result<String, WalletError>;

    async fn account_lines(&self, address: &str) -> Result<Vec<AccountLine>, WalletError>;

    /// Most recent transactions for the address, raw node shape, newest first.
    async fn account_tx(&self, address: &str, limit: u32) -> Result<Vec<Value>, WalletError>;

    /// Ask the testnet faucet to credit the address. The faucet tops up
    /// already-funded accounts, so this asserts protocol success only.
    async fn fund_from_faucet(&self, address: &str) -> Result<(), WalletError>;

    /// Autofill, sign and submit a transaction, returning the engine result
    /// code once the node has processed it.
    async fn submit_and_wait(&self, tx: Value, keypair: &Keypair) -> Result<String, WalletError>;
}

/// XRPL JSON-RPC client over HTTP.
pub struct JsonRpcLedgerClient {
    http: reqwest::Client,
    node_url: String,
    faucet_url: String,
}

impl JsonRpcLedgerClient {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            node_url: config.node_url.clone(),
            faucet_url: config.faucet_url.clone(),
        }
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let body = json!({
            "method": method,
            "params": [params],
        });

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Connection(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| WalletError::Connection(e.to_string()))?;

        let result = envelope["result"].clone();
        if let Some(error) = result["error"].as_str() {
            return Err(WalletError::Internal(format!("{}: {}", method, error)));
        }
        Ok(result)
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn connect(&self) -> Result<(), WalletError> {
        self.rpc("ping", json!({})).await?;
        log::debug!("Node session opened: {}", self.node_url);
        Ok(())
    }

    async fn disconnect(&self) {
        // HTTP transport is connectionless; the bracket exists so the engine
        // treats every session as a scoped resource regardless of transport.
        log::debug!("Node session closed");
    }

    async fn get_native_balance(&self, address: &str) -> Result<String, WalletError> {
        let result = self
            .rpc(
                "account_info",
                json!({ "account": address, "ledger_index": "validated" }),
            )
            .await?;

        let drops = result["account_data"]["Balance"]
            .as_str()
            .ok_or_else(|| WalletError::Internal("account_info missing Balance".to_string()))?;
        Ok(drops_to_xrp(drops))
    }

    async fn account_lines(&self, address: &str) -> Result<Vec<AccountLine>, WalletError> {
        let result = self
            .rpc("account_lines", json!({ "account": address }))
            .await?;

        let lines = result["lines"].clone();
        serde_json::from_value(lines)
            .map_err(|e| WalletError::Internal(format!("account_lines shape: {}", e)))
    }

    async fn account_tx(&self, address: &str, limit: u32) -> Result<Vec<Value>, WalletError> {
        let result = self
            .rpc(
                "account_tx",
                json!({ "account": address, "limit": limit }),
            )
            .await?;

        match result["transactions"].as_array() {
            Some(entries) => Ok(entries.clone()),
            None => Ok(Vec::new()),
        }
    }

    async fn fund_from_faucet(&self, address: &str) -> Result<(), WalletError> {
        let response = self
            .http
            .post(&self.faucet_url)
            .json(&json!({ "destination": address }))
            .send()
            .await
            .map_err(|e| WalletError::Faucet(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Faucet(format!(
                "faucet returned HTTP {}",
                response.status()
            )));
        }

        log::info!("Faucet credited {}", address);
        Ok(())
    }

    async fn submit_and_wait(&self, tx: Value, keypair: &Keypair) -> Result<String, WalletError> {
        let mut tx = tx;

        // Autofill: sequence from the live account, flat testnet fee.
        if tx.get("Sequence").is_none() {
            let info = self
                .rpc(
                    "account_info",
                    json!({ "account": tx["Account"], "ledger_index": "validated" }),
                )
                .await?;
            tx["Sequence"] = info["account_data"]["Sequence"].clone();
        }
        if tx.get("Fee").is_none() {
            tx["Fee"] = json!("12");
        }

        tx["SigningPubKey"] = json!(keypair.public_key);
        let signature = keypair.sign(&tx.to_string());
        tx["TxnSignature"] = json!(signature);

        let result = self.rpc("submit", json!({ "tx_json": tx })).await?;

        let code = result["engine_result"]
            .as_str()
            .ok_or_else(|| WalletError::Internal("submit missing engine_result".to_string()))?;
        Ok(code.to_string())
    }
}
