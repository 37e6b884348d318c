//! Provider model representing a copy-trading or signal service.

use serde::{Deserialize, Serialize};

/// One day of a provider's returns series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyReturn {
    /// Day label as sent by the API (e.g. "2020-10-24").
    pub name: String,
    /// Return for the day, percent. Coerced to a number during
    /// normalization; the API sends it as string or number.
    pub returns: f64,
    pub positions: u32,
    pub total_invested: String,
    pub total_profit: String,
}

/// A copy-trading or signal service that accounts can follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    // === Identity ===
    pub id: String,
    pub name: String,
    pub description: String,
    pub short_desc: String,
    pub long_desc: String,
    pub logo_url: String,
    pub website: String,
    pub coin: String,

    // === Capability flags ===
    pub public: bool,
    pub disable: bool,
    pub key: bool,
    pub customer_key: bool,
    pub has_recommended_settings: bool,
    pub has_been_used: bool,
    pub is_clone: bool,
    pub is_copy_trading: bool,
    pub is_from_user: bool,
    pub cloned_from: String,

    // === Market ===
    /// Exchange names the service operates on, lowercased by the API.
    pub exchanges: Vec<String>,
    pub exchange_type: String,
    pub quote: String,

    // === Pricing ===
    pub fee: String,
    /// Subscription price, used by the fee sort.
    pub price: f64,

    // === Performance ===
    pub created_at: i64,
    pub followers: u32,
    pub risk: f64,
    /// Open-positions P&L, percent; summed with `returns` when sorting
    /// by return.
    pub floating: f64,
    pub daily_returns: Vec<DailyReturn>,
    /// Aggregate return, always recomputed as the sum of `daily_returns`
    /// and never taken from the raw payload.
    pub returns: f64,
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            short_desc: String::new(),
            long_desc: String::new(),
            logo_url: String::new(),
            website: String::new(),
            coin: "BTC".to_string(),
            public: true,
            disable: true,
            key: false,
            customer_key: false,
            has_recommended_settings: false,
            has_been_used: false,
            is_clone: false,
            is_copy_trading: false,
            is_from_user: false,
            cloned_from: String::new(),
            exchanges: Vec::new(),
            exchange_type: String::new(),
            quote: String::new(),
            fee: String::new(),
            price: 0.0,
            created_at: 0,
            followers: 0,
            risk: 0.0,
            floating: 0.0,
            daily_returns: Vec::new(),
            returns: 0.0,
        }
    }
}

impl Provider {
    /// Combined realized plus floating return used for ranking.
    pub fn total_returns(&self) -> f64 {
        self.returns + self.floating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let provider = Provider::default();
        assert_eq!(provider.coin, "BTC");
        assert!(provider.public);
        assert!(provider.disable);
        assert_eq!(provider.returns, 0.0);
        assert!(provider.daily_returns.is_empty());
    }

    #[test]
    fn test_total_returns_sums_floating() {
        let provider = Provider {
            returns: 12.5,
            floating: -2.5,
            ..Provider::default()
        };
        assert_eq!(provider.total_returns(), 10.0);
    }
}
