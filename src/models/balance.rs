//! User balance model: account totals for the dashboard header.

use serde::{Deserialize, Serialize};

/// Aggregate balance snapshot for the selected exchange account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserBalance {
    /// BTC/USDT conversion rate used by the dashboard totals.
    pub btcusdt: f64,
    pub total_invested: f64,
    pub total_open: f64,
    pub total_profit: f64,
    pub total_assets: f64,
    pub profit_percentage: f64,
}
