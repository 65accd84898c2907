/// Wallet Core Module
///
/// Modular wallet engine with clear separation of concerns:
///
/// - `registry.rs` - Persisted wallet collection + active selection
/// - `funding.rs` - Faucet/trust-line funding workflow
/// - `normalize.rs` - Balance and transaction normalization
/// - `sync.rs` - Refresh orchestration and loading flag
/// - `send.rs` - Issued-token payments
/// - `manager.rs` - Facade tying everything together

pub mod funding;
pub mod manager;
pub mod normalize;
pub mod registry;
pub mod send;
pub mod sync;

pub use manager::WalletManager;
