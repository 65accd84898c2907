/// Wallet configuration.
///
/// The ledger constants (node endpoint, faucet endpoint, tracked token) are
/// fixed: this wallet targets the XRPL Testnet and a single issued-currency
/// pair. Only the server bind address comes from the environment.

use std::env;

/// Seconds between the Unix epoch and the XRPL epoch (2000-01-01T00:00:00Z).
pub const XRPL_EPOCH_OFFSET: i64 = 946_684_800;

/// Indivisible base units per one unit of the native asset.
pub const DROPS_PER_XRP: u64 = 1_000_000;

#[derive(Clone, Debug)]
pub struct WalletConfig {
    /// XRPL Testnet JSON-RPC endpoint
    pub node_url: String,
    /// Testnet faucet endpoint
    pub faucet_url: String,
    /// Currency code of the tracked issued token
    pub token_currency: String,
    /// Issuer account of the tracked token
    pub token_issuer: String,
    /// Display symbol for the tracked token
    pub token_symbol: String,
    /// Limit value used when establishing the trust line
    pub trust_line_limit: String,
    /// Number of transactions fetched per history query
    pub tx_page_size: u32,
}

impl WalletConfig {
    /// Load configuration. `NODE_URL` and `FAUCET_URL` may be overridden for
    /// local testing against a mock node; everything else is fixed.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("NODE_URL") {
            log::info!("Using node endpoint override: {}", url);
            config.node_url = url;
        }
        if let Ok(url) = env::var("FAUCET_URL") {
            log::info!("Using faucet endpoint override: {}", url);
            config.faucet_url = url;
        }

        config
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            node_url: "https://s.altnet.rippletest.net:51234/".to_string(),
            faucet_url: "https://faucet.altnet.rippletest.net/accounts".to_string(),
            token_currency: "USD".to_string(),
            token_issuer: "rHqn5evLMHVbXdyq7Wu9WEa7nSB3kR3YNJ".to_string(),
            token_symbol: "USDC".to_string(),
            trust_line_limit: "1000000000".to_string(),
            tx_page_size: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_testnet() {
        let config = WalletConfig::default();
        assert!(config.node_url.contains("altnet.rippletest.net"));
        assert_eq!(config.token_symbol, "USDC");
        assert_eq!(config.tx_page_size, 20);
    }
}
