use serde::{Deserialize, Serialize};

/// One trust line as reported by an `account_lines` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLine {
    /// Currency code of the line
    pub currency: String,
    /// Counterparty (issuer) account
    pub account: String,
    /// Current balance held on the line
    pub balance: String,
    /// Limit this account has set towards the issuer
    #[serde(default)]
    pub limit: String,
}
