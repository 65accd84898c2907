use serde::{Deserialize, Serialize};

use crate::storage::WalletRecord;

#[derive(Debug, Deserialize)]
pub struct ImportWalletRequest {
    pub secret: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectWalletRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct SendTokenRequest {
    pub destination: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct WalletListResponse {
    pub wallets: Vec<WalletRecord>,
    pub active_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteWalletResponse {
    pub address: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub refreshing: bool,
    pub funding_status: Option<String>,
}
