use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("Trust line rejected: {0}")]
    TrustLine(String),

    #[error("Invalid seed: {0}")]
    ImportFormat(String),

    #[error("Transaction rejected: {0}")]
    Submission(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Engine result code carried by a rejected trust-line or payment
    /// submission, if this error represents one.
    pub fn engine_code(&self) -> Option<&str> {
        match self {
            WalletError::TrustLine(code) | WalletError::Submission(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WalletError::WalletNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WalletError::ImportFormat(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::InsufficientFunds(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::Connection(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            WalletError::Faucet(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
