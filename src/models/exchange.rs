//! Exchange connection model: a user's linked exchange account.

use serde::{Deserialize, Serialize};

/// A linked exchange account. Credential fields are presence flags only;
/// actual key material never reaches this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeConnection {
    /// Connection id, unwrapped from the Mongo `_id` wrapper.
    pub id: String,
    pub name: String,
    pub exchange_id: String,
    pub exchange_name: String,
    pub internal_id: String,
    pub internal_name: String,

    // === Credential presence ===
    pub key: bool,
    pub secret: bool,
    pub are_keys_valid: bool,

    // === Account type ===
    /// "spot" or "futures".
    pub exchange_type: String,
    pub is_testnet: bool,
    pub paper_trading: bool,

    // === Operational flags ===
    pub disable: bool,
    pub managed: bool,
    pub internal: bool,
    pub is_broker_account: bool,
    pub position_size: f64,
    pub sub_account_id: String,
    pub binance_broker_id: String,
    pub check_auth_count: u32,
}

impl Default for ExchangeConnection {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            exchange_id: String::new(),
            exchange_name: String::new(),
            internal_id: String::new(),
            internal_name: String::new(),
            key: false,
            secret: false,
            are_keys_valid: false,
            exchange_type: String::new(),
            is_testnet: false,
            paper_trading: false,
            disable: false,
            managed: false,
            internal: false,
            is_broker_account: true,
            position_size: 0.0,
            sub_account_id: String::new(),
            binance_broker_id: String::new(),
            check_auth_count: 0,
        }
    }
}
