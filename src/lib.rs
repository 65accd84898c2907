//! XRPL Testnet wallet engine.
//!
//! Manages a registry of testnet accounts, drives the faucet/trust-line
//! funding workflow and keeps native and issued-token balances in sync.
//! The ledger RPC client and keypair derivation sit behind traits so the
//! engine can be exercised against fakes.

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod wallet;

pub use config::WalletConfig;
pub use error::WalletError;
pub use wallet::WalletManager;
