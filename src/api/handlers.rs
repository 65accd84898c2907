use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::types::{
    DeleteWalletResponse, ImportWalletRequest, SelectWalletRequest, SendTokenRequest,
    StatusResponse, WalletListResponse,
};
use crate::storage::{Balances, WalletRecord};
use crate::wallet::normalize::Transaction;
use crate::wallet::WalletManager;

pub async fn create_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<WalletRecord>, crate::error::WalletError> {
    let record = manager.create_wallet().await?;
    Ok(Json(record))
}

pub async fn import_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<ImportWalletRequest>,
) -> Result<Json<WalletRecord>, crate::error::WalletError> {
    let record = manager.import_wallet(&req.secret).await?;
    Ok(Json(record))
}

pub async fn list_wallets_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Json<WalletListResponse> {
    let (wallets, active_address) = manager.list_wallets().await;
    Json(WalletListResponse {
        wallets,
        active_address,
    })
}

pub async fn select_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<SelectWalletRequest>,
) -> Result<Json<Balances>, crate::error::WalletError> {
    let balances = manager.select_wallet(&req.address).await?;
    Ok(Json(balances))
}

pub async fn delete_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<DeleteWalletResponse>, crate::error::WalletError> {
    manager.delete_wallet(&address).await?;
    Ok(Json(DeleteWalletResponse {
        address,
        status: "deleted".to_string(),
    }))
}

pub async fn fund_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<Balances>, crate::error::WalletError> {
    let balances = manager.fund_wallet(&address).await?;
    Ok(Json(balances))
}

pub async fn send_token_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
    Json(req): Json<SendTokenRequest>,
) -> Result<Json<Balances>, crate::error::WalletError> {
    let balances = manager
        .send_token(&address, &req.destination, &req.amount)
        .await?;
    Ok(Json(balances))
}

pub async fn refresh_balance_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<Balances>, crate::error::WalletError> {
    let balances = manager.refresh(&address).await?;
    Ok(Json(balances))
}

pub async fn transactions_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Json<Vec<Transaction>> {
    Json(manager.transactions(&address).await)
}

pub async fn status_handler(State(manager): State<Arc<WalletManager>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        refreshing: manager.is_refreshing(),
        funding_status: manager.funding_status(),
    })
}
