//! Provider statistics: flat aggregates over a provider's position history.
//!
//! Values are carried as decimal strings exactly as the API sends them to
//! avoid floating-point rounding loss; callers parse on demand with
//! [`stat_value`] for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse a decimal-string stat for display. Empty or malformed values
/// yield `None`.
pub fn stat_value(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Aggregate statistics for one provider. All keys exist on every
/// normalized record; absent keys default to the empty string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderStats {
    // === Identity ===
    pub provider_id: String,
    pub name: String,
    pub logo_url: String,
    pub quote: String,
    pub base: bool,
    pub signals: u32,

    // === Sums ===
    pub sum_total_invested: String,
    pub sum_total_profit: String,
    pub sum_total_profit_from_closed: String,
    pub sum_total_profit_from_opened: String,
    pub sum_positions: String,
    pub sum_unclosed_positions: String,
    pub sum_wins: String,
    pub sum_losses: String,
    #[serde(rename = "sumDCAs")]
    pub sum_dcas: String,
    #[serde(rename = "sumDCAWins")]
    pub sum_dca_wins: String,
    #[serde(rename = "sumDCALosses")]
    pub sum_dca_losses: String,
    pub sum_sold_by_take_profit: String,
    pub sum_sold_manually: String,
    pub sum_sold_by_trailing_stop: String,
    pub sum_sold_by_stop_loss: String,
    #[serde(rename = "sumSoldByTTL")]
    pub sum_sold_by_ttl: String,
    pub sum_sold_by_signal: String,
    pub sum_sold_by_other: String,
    pub sum_return_of_investment: String,
    pub sum_closed_positions: String,

    // === Averages ===
    pub avg_average_profit: String,
    pub avg_average_position_size: String,
    #[serde(rename = "avgAverageDCAsPerPosition")]
    pub avg_average_dcas_per_position: String,
    pub avg_average_closing_time: String,
    pub avg_average_entry_price: String,
    pub avg_average_exit_price: String,
    pub avg_average_average_price: String,
    pub avg_average_profit_percentage: String,

    // === Price-movement windows ===
    pub avg_i24h_higher_price_percentage: String,
    pub avg_i24h_lower_before_higher_price_percentage: String,
    pub avg_i24h_lower_price_percentage: String,
    pub avg_i24h_seconds_until_higher_price: String,
    pub avg_i24h_seconds_until_lower_before_higher_price: String,
    pub avg_i24h_seconds_until_lower_price: String,
    pub avg_i3d_higher_price_percentage: String,
    pub avg_i3d_lower_before_higher_price_percentage: String,
    pub avg_i3d_lower_price_percentage: String,
    pub avg_i3d_seconds_until_higher_price: String,
    pub avg_i3d_seconds_until_lower_before_higher_price: String,
    pub avg_i3d_seconds_until_lower_price: String,
    pub avg_i1w_higher_price_percentage: String,
    pub avg_i1w_lower_before_higher_price_percentage: String,
    pub avg_i1w_lower_price_percentage: String,
    pub avg_i1w_seconds_until_higher_price: String,
    pub avg_i1w_seconds_until_lower_before_higher_price: String,
    pub avg_i1w_seconds_until_lower_price: String,
    pub avg_i1m_higher_price_percentage: String,
    pub avg_i1m_lower_before_higher_price_percentage: String,
    pub avg_i1m_lower_price_percentage: String,
    pub avg_i1m_seconds_until_higher_price: String,
    pub avg_i1m_seconds_until_lower_before_higher_price: String,
    pub avg_i1m_seconds_until_lower_price: String,

    // === Extremes ===
    pub max_max_investment: String,
    pub max_max_return_of_investment: String,
    #[serde(rename = "maxMaxDCAProfit")]
    pub max_max_dca_profit: String,
    pub max_max_buying_price: String,
    pub max_max_exit_price: String,
    pub max_slower_closed_position_in_seconds: String,
    pub min_min_investment: String,
    pub min_min_return_of_investment: String,
    #[serde(rename = "minMinDCAProfit")]
    pub min_min_dca_profit: String,
    pub min_min_buying_price: String,
    pub min_min_exit_price: String,
    pub min_faster_closed_position_in_seconds: String,

    // === Ratios ===
    pub percentage_profit: String,
    pub win_rate: String,
}
