//! Balance and transaction normalization.
//!
//! Turns raw node query responses into the stable shapes the rest of the
//! wallet renders from. Query failures on this path are absorbed on purpose:
//! an address that does not exist on the ledger yet (or a flaky node) shows
//! up as zero balances and an empty history, never as an error. The UI must
//! stay renderable no matter what the node does.

use serde::Serialize;
use serde_json::Value;

use crate::config::{WalletConfig, DROPS_PER_XRP, XRPL_EPOCH_OFFSET};
use crate::error::WalletError;
use crate::ledger::LedgerClient;
use crate::storage::Balances;

/// Transaction type tag of the display model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Payment,
    TrustSet,
    Other,
}

/// Normalized view of one ledger transaction. Purely derived, recomputed on
/// every fetch, identified by `hash` alone.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub hash: String,
    pub kind: TransactionKind,
    /// Display amount, or `None` when the transaction carries no displayable
    /// transfer (trust-line transactions in particular).
    pub amount: Option<String>,
    pub currency: String,
    pub timestamp: String,
    pub sender: String,
    pub destination: String,
    /// Engine result code from the execution metadata.
    pub outcome: String,
}

/// Fetch native and tracked-token balances for an address.
///
/// Fail-soft: any failure, account-not-found included, yields zeroed
/// balances. Opens and closes its own node session.
pub async fn fetch_balances(
    client: &dyn LedgerClient,
    config: &WalletConfig,
    address: &str,
) -> Balances {
    if let Err(e) = client.connect().await {
        log::warn!("Balance fetch for {} skipped, connect failed: {}", address, e);
        return Balances::zero();
    }

    let result = query_balances(client, config, address).await;
    client.disconnect().await;

    result.unwrap_or_else(|e| {
        log::warn!("Balance fetch for {} failed: {} (returning zeros)", address, e);
        Balances::zero()
    })
}

/// Balance query against an already-open session. Used by the funding flow,
/// which owns the session bracket itself.
pub(crate) async fn query_balances(
    client: &dyn LedgerClient,
    config: &WalletConfig,
    address: &str,
) -> Result<Balances, WalletError> {
    let native = client.get_native_balance(address).await?;

    let lines = client.account_lines(address).await?;
    let token = lines
        .iter()
        .find(|line| line.currency == config.token_currency && line.account == config.token_issuer)
        .map(|line| line.balance.clone())
        .unwrap_or_else(|| "0".to_string());

    Ok(Balances { native, token })
}

/// Fetch the most recent transactions for an address, newest first as
/// returned by the node. Fail-soft: any failure yields an empty history.
pub async fn fetch_transactions(
    client: &dyn LedgerClient,
    config: &WalletConfig,
    address: &str,
) -> Vec<Transaction> {
    if let Err(e) = client.connect().await {
        log::warn!("History fetch for {} skipped, connect failed: {}", address, e);
        return Vec::new();
    }

    let result = client.account_tx(address, config.tx_page_size).await;
    client.disconnect().await;

    match result {
        Ok(entries) => entries
            .iter()
            .filter_map(|entry| normalize_entry(config, entry))
            .collect(),
        Err(e) => {
            log::warn!("History fetch for {} failed: {} (returning empty)", address, e);
            Vec::new()
        }
    }
}

/// Map one raw `account_tx` entry into the display model.
///
/// Node response versions differ: the payload appears under `tx` or
/// `tx_json`, the metadata under `meta` or `metadata`. Everything is pulled
/// into one canonical shape here before any display logic runs.
pub fn normalize_entry(config: &WalletConfig, entry: &Value) -> Option<Transaction> {
    let payload = entry
        .get("tx")
        .or_else(|| entry.get("tx_json"))
        .unwrap_or(entry);
    let meta = entry
        .get("meta")
        .or_else(|| entry.get("metadata"))
        .unwrap_or(&Value::Null);

    let tx_type = payload["TransactionType"].as_str()?;
    let hash = payload["hash"]
        .as_str()
        .or_else(|| entry["hash"].as_str())
        .unwrap_or_default()
        .to_string();

    let kind = match tx_type {
        "Payment" => TransactionKind::Payment,
        "TrustSet" => TransactionKind::TrustSet,
        _ => TransactionKind::Other,
    };

    // Delivered amount accounts for partial payments; prefer it over the
    // nominal Amount field. TrustSet limits are extracted but never shown.
    let raw_amount = meta
        .get("delivered_amount")
        .or_else(|| meta.get("DeliveredAmount"))
        .or_else(|| payload.get("Amount"))
        .or_else(|| payload.get("LimitAmount"));

    let (amount, currency) = if kind == TransactionKind::TrustSet {
        (None, String::new())
    } else {
        match raw_amount {
            Some(value) => normalize_amount(config, value),
            None => (None, String::new()),
        }
    };

    let timestamp = payload["date"]
        .as_i64()
        .map(format_ripple_time)
        .unwrap_or_default();

    Some(Transaction {
        hash,
        kind,
        amount,
        currency,
        timestamp,
        sender: payload["Account"].as_str().unwrap_or_default().to_string(),
        destination: payload["Destination"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        outcome: meta["TransactionResult"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
    })
}

/// Normalize a raw amount field into `(display value, currency label)`.
///
/// A plain string is native-asset drops and is scaled to XRP. A structured
/// amount is an issued asset: the tracked issuer/currency pair gets the
/// configured symbol, unrecognized hex-encoded codes (longer than 3 chars)
/// get the generic "Token" label, and plain 3-char codes pass through.
pub fn normalize_amount(config: &WalletConfig, raw: &Value) -> (Option<String>, String) {
    match raw {
        Value::String(drops) => (Some(drops_to_xrp(drops)), "XRP".to_string()),
        Value::Object(obj) => {
            let value = obj
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or("0")
                .to_string();
            let code = obj.get("currency").and_then(Value::as_str).unwrap_or("");
            let issuer = obj.get("issuer").and_then(Value::as_str).unwrap_or("");

            let label = if code == config.token_currency && issuer == config.token_issuer {
                config.token_symbol.clone()
            } else if code.len() > 3 {
                "Token".to_string()
            } else {
                code.to_string()
            };
            (Some(value), label)
        }
        _ => (None, String::new()),
    }
}

/// Scale an indivisible-drops string to whole XRP, exact decimal math.
pub fn drops_to_xrp(drops: &str) -> String {
    let Ok(drops) = drops.trim().parse::<u128>() else {
        return drops.to_string();
    };

    let whole = drops / DROPS_PER_XRP as u128;
    let frac = drops % DROPS_PER_XRP as u128;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac = format!("{:06}", frac);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}

/// Render a ledger timestamp (seconds since the XRPL epoch) human-readably.
pub fn format_ripple_time(ripple_seconds: i64) -> String {
    match chrono::DateTime::from_timestamp(ripple_seconds + XRPL_EPOCH_OFFSET, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_scaling() {
        assert_eq!(drops_to_xrp("1000000"), "1");
        assert_eq!(drops_to_xrp("1500000"), "1.5");
        assert_eq!(drops_to_xrp("1"), "0.000001");
        assert_eq!(drops_to_xrp("0"), "0");
        assert_eq!(drops_to_xrp("123456789"), "123.456789");
        // Unparseable input passes through untouched.
        assert_eq!(drops_to_xrp("not-a-number"), "not-a-number");
    }

    #[test]
    fn test_native_amount_labels_xrp() {
        let config = WalletConfig::default();
        let (amount, currency) = normalize_amount(&config, &json!("1000000"));
        assert_eq!(amount.as_deref(), Some("1"));
        assert_eq!(currency, "XRP");
    }

    #[test]
    fn test_tracked_issuer_gets_symbol() {
        let config = WalletConfig::default();
        let raw = json!({
            "currency": config.token_currency,
            "issuer": config.token_issuer,
            "value": "5"
        });
        let (amount, currency) = normalize_amount(&config, &raw);
        assert_eq!(amount.as_deref(), Some("5"));
        assert_eq!(currency, config.token_symbol);
    }

    #[test]
    fn test_unrecognized_assets() {
        let config = WalletConfig::default();

        // Hex-encoded non-standard code
        let (_, currency) = normalize_amount(
            &config,
            &json!({ "currency": "524C555344000000000000000000000000000000", "issuer": "rSomeIssuer", "value": "2" }),
        );
        assert_eq!(currency, "Token");

        // Plain 3-char code from a different issuer passes through
        let (_, currency) = normalize_amount(
            &config,
            &json!({ "currency": "EUR", "issuer": "rSomeIssuer", "value": "2" }),
        );
        assert_eq!(currency, "EUR");
    }

    #[test]
    fn test_trust_set_never_shows_amount() {
        let config = WalletConfig::default();
        let entry = json!({
            "tx": {
                "TransactionType": "TrustSet",
                "Account": "rSender",
                "hash": "ABC123",
                "date": 0,
                "LimitAmount": {
                    "currency": config.token_currency,
                    "issuer": config.token_issuer,
                    "value": "1000000000"
                }
            },
            "meta": { "TransactionResult": "tesSUCCESS" }
        });

        let tx = normalize_entry(&config, &entry).unwrap();
        assert_eq!(tx.kind, TransactionKind::TrustSet);
        assert_eq!(tx.amount, None);
        assert_eq!(tx.currency, "");
        assert_eq!(tx.outcome, "tesSUCCESS");
    }

    #[test]
    fn test_delivered_amount_preferred_over_nominal() {
        let config = WalletConfig::default();
        let entry = json!({
            "tx_json": {
                "TransactionType": "Payment",
                "Account": "rSender",
                "Destination": "rDest",
                "Amount": "9000000",
                "hash": "FEED",
                "date": 700000000i64
            },
            "metadata": {
                "delivered_amount": "1000000",
                "TransactionResult": "tesSUCCESS"
            }
        });

        let tx = normalize_entry(&config, &entry).unwrap();
        assert_eq!(tx.kind, TransactionKind::Payment);
        assert_eq!(tx.amount.as_deref(), Some("1"));
        assert_eq!(tx.currency, "XRP");
        assert_eq!(tx.sender, "rSender");
        assert_eq!(tx.destination, "rDest");
    }

    #[test]
    fn test_ripple_epoch_offset() {
        // Ledger second 0 is 2000-01-01T00:00:00Z.
        assert_eq!(format_ripple_time(0), "2000-01-01 00:00:00 UTC");
    }
}
