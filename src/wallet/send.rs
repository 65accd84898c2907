//! Issued-token send operation.

use serde_json::json;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::{KeyDeriver, LedgerClient};
use crate::storage::WalletRecord;
use crate::wallet::funding::ENGINE_SUCCESS;

/// Send `amount` of the tracked token from `record` to `destination`.
///
/// Validates inputs against the record's last known token balance, submits
/// an issued-currency payment and requires the success engine code. The
/// caller refreshes balances afterwards; this function only moves funds.
pub async fn send_token(
    client: &dyn LedgerClient,
    deriver: &dyn KeyDeriver,
    config: &WalletConfig,
    record: &WalletRecord,
    destination: &str,
    amount: &str,
) -> Result<(), WalletError> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(WalletError::InvalidInput(
            "recipient address is required".to_string(),
        ));
    }

    let parsed: f64 = amount
        .trim()
        .parse()
        .map_err(|_| WalletError::InvalidInput(format!("invalid amount: {}", amount)))?;
    if parsed <= 0.0 {
        return Err(WalletError::InvalidInput(
            "amount must be positive".to_string(),
        ));
    }

    let available: f64 = record.token_balance.parse().unwrap_or(0.0);
    if parsed > available {
        return Err(WalletError::InsufficientFunds(format!(
            "{} {} requested, {} available",
            amount, config.token_symbol, record.token_balance
        )));
    }

    client
        .connect()
        .await
        .map_err(|e| WalletError::Connection(e.to_string()))?;

    let outcome = submit_payment(client, deriver, config, record, destination, amount).await;
    client.disconnect().await;
    outcome
}

async fn submit_payment(
    client: &dyn LedgerClient,
    deriver: &dyn KeyDeriver,
    config: &WalletConfig,
    record: &WalletRecord,
    destination: &str,
    amount: &str,
) -> Result<(), WalletError> {
    let keypair = deriver.from_secret(&record.secret).map_err(|e| match e {
        WalletError::ImportFormat(msg) => WalletError::KeyDerivation(msg),
        other => other,
    })?;

    let payment = json!({
        "TransactionType": "Payment",
        "Account": keypair.address,
        "Destination": destination,
        "Amount": {
            "currency": config.token_currency,
            "issuer": config.token_issuer,
            "value": amount.trim(),
        }
    });

    let code = client.submit_and_wait(payment, &keypair).await?;
    if code != ENGINE_SUCCESS {
        return Err(WalletError::Submission(code));
    }

    log::info!(
        "Sent {} {} from {} to {}",
        amount,
        config.token_symbol,
        record.address,
        destination
    );
    Ok(())
}
