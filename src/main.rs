use std::env;
use std::sync::Arc;

use xrpl_wallet::api::server;
use xrpl_wallet::config::WalletConfig;
use xrpl_wallet::wallet::WalletManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WalletConfig::from_env();
    log::info!("Connected ledger: XRPL Testnet ({})", config.node_url);

    let manager = Arc::new(WalletManager::new(config)?);

    // Bring the persisted active wallet up to date before serving. This is
    // fail-soft: an unreachable node means zeroed balances, not a dead start.
    if let Err(e) = manager.bootstrap().await {
        log::warn!("Startup refresh failed: {}", e);
    }

    let addr = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    server::start_server(&addr, manager).await?;
    Ok(())
}
