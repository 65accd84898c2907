//! Data models for wallet storage

use serde::{Deserialize, Serialize};

/// One managed account. `address` is the unique key within the registry.
///
/// Field names stay camelCase on the wire to match the persisted format the
/// original browser build used, so existing stores migrate cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub address: String,
    /// Family seed that reconstructs the signing keypair. Kept in plaintext
    /// by design: this is a throwaway testnet wallet.
    #[serde(alias = "seed")]
    pub secret: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default = "zero", alias = "balance")]
    pub native_balance: String,
    #[serde(default = "zero", alias = "usdcBalance")]
    pub token_balance: String,
}

fn zero() -> String {
    "0".to_string()
}

impl WalletRecord {
    /// Fresh record with zeroed balances.
    pub fn new(address: String, secret: String, public_key: String, private_key: String) -> Self {
        Self {
            address,
            secret,
            public_key,
            private_key,
            native_balance: zero(),
            token_balance: zero(),
        }
    }
}

/// Balance pair returned by a balance query; only used to patch a record,
/// never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balances {
    pub native: String,
    pub token: String,
}

impl Balances {
    pub fn zero() -> Self {
        Self {
            native: zero(),
            token: zero(),
        }
    }
}
