//! Funding orchestration: bring a freshly created or imported wallet from
//! zero balance to a funded, token-ready state.
//!
//! Steps run strictly in order: connect, derive keypair, faucet request,
//! trust-line check, trust-line creation (skipped when already present),
//! balance refresh. The node session is released on every exit path. Calls
//! are not re-entrant per wallet; the call site holds the in-flight flag.

use std::fmt;

use serde_json::json;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::{KeyDeriver, LedgerClient};
use crate::storage::{Balances, WalletRecord};
use crate::wallet::normalize;

/// Outcome code a trust-line submission must report to count as success.
pub const ENGINE_SUCCESS: &str = "tesSUCCESS";

/// Step currently executing, surfaced to the caller as a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingPhase {
    Connecting,
    RequestingFunds,
    CheckingTrustLine,
    EstablishingTrustLine,
    RefreshingBalances,
    Done,
}

impl fmt::Display for FundingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FundingPhase::Connecting => "Connecting to XRPL Testnet...",
            FundingPhase::RequestingFunds => "Requesting funds from faucet (approx 10s)...",
            FundingPhase::CheckingTrustLine => "Checking trust line...",
            FundingPhase::EstablishingTrustLine => "Establishing trust line...",
            FundingPhase::RefreshingBalances => "Refreshing balances...",
            FundingPhase::Done => "Done",
        };
        f.write_str(text)
    }
}

pub struct FundingOrchestrator {
    config: WalletConfig,
}

impl FundingOrchestrator {
    pub fn new(config: WalletConfig) -> Self {
        Self { config }
    }

    /// Run the funding workflow for one wallet and return its refreshed
    /// balances. `progress` receives each phase as it starts.
    pub async fn fund<F>(
        &self,
        client: &dyn LedgerClient,
        deriver: &dyn KeyDeriver,
        record: &WalletRecord,
        mut progress: F,
    ) -> Result<Balances, WalletError>
    where
        F: FnMut(FundingPhase) + Send,
    {
        progress(FundingPhase::Connecting);
        client
            .connect()
            .await
            .map_err(|e| WalletError::Connection(e.to_string()))?;

        // Session is open from here on; release it whatever happens next.
        let outcome = self
            .run_funded_steps(client, deriver, record, &mut progress)
            .await;
        client.disconnect().await;

        match &outcome {
            Ok(balances) => log::info!(
                "Funded {}: {} XRP / {} {}",
                record.address,
                balances.native,
                balances.token,
                self.config.token_symbol
            ),
            Err(e) => log::warn!("Funding {} failed: {}", record.address, e),
        }
        outcome
    }

    async fn run_funded_steps<F>(
        &self,
        client: &dyn LedgerClient,
        deriver: &dyn KeyDeriver,
        record: &WalletRecord,
        progress: &mut F,
    ) -> Result<Balances, WalletError>
    where
        F: FnMut(FundingPhase) + Send,
    {
        let keypair = deriver.from_secret(&record.secret).map_err(|e| match e {
            WalletError::ImportFormat(msg) => WalletError::KeyDerivation(msg),
            other => other,
        })?;

        progress(FundingPhase::RequestingFunds);
        client
            .fund_from_faucet(&keypair.address)
            .await
            .map_err(|e| match e {
                f @ WalletError::Faucet(_) => f,
                other => WalletError::Faucet(other.to_string()),
            })?;

        progress(FundingPhase::CheckingTrustLine);
        let lines = client.account_lines(&keypair.address).await?;
        let has_line = lines.iter().any(|line| {
            line.currency == self.config.token_currency
                && line.account == self.config.token_issuer
        });

        if has_line {
            log::debug!("{} already trusts the issuer, skipping TrustSet", keypair.address);
        } else {
            progress(FundingPhase::EstablishingTrustLine);
            let trust_set = json!({
                "TransactionType": "TrustSet",
                "Account": keypair.address,
                "LimitAmount": {
                    "currency": self.config.token_currency,
                    "issuer": self.config.token_issuer,
                    "value": self.config.trust_line_limit,
                }
            });

            let code = client.submit_and_wait(trust_set, &keypair).await?;
            if code != ENGINE_SUCCESS {
                return Err(WalletError::TrustLine(code));
            }
        }

        // Fail-soft like every other balance query: a hiccup here must not
        // fail a funding run that already succeeded on-ledger.
        progress(FundingPhase::RefreshingBalances);
        let balances = normalize::query_balances(client, &self.config, &keypair.address)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Post-funding balance query failed: {}", e);
                Balances::zero()
            });

        progress(FundingPhase::Done);
        Ok(balances)
    }
}
