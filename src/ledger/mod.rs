//! Ledger access layer.
//!
//! `LedgerClient` is the RPC seam the engine drives; `JsonRpcLedgerClient` is
//! the concrete Testnet implementation. `keys` holds the keypair derivation
//! seam (`KeyDeriver`) with a family-seed implementation behind it.

pub mod client;
pub mod keys;
pub mod types;

pub use client::{JsonRpcLedgerClient, LedgerClient};
pub use keys::{FamilySeedDeriver, KeyDeriver, Keypair};
pub use types::AccountLine;
