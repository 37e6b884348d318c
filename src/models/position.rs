//! Position model representing a single trade lifecycle record.

use serde::{Deserialize, Serialize};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
    #[default]
    #[serde(rename = "", other)]
    Unset,
}

impl Side {
    /// Parse the exact uppercase side markers used by the trade API.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LONG" => Side::Long,
            "SHORT" => Side::Short,
            _ => Side::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
            Side::Unset => "",
        }
    }

    /// Classify a reference value against a comparison value for this side:
    /// for LONG a reference above the comparison is a gain; for SHORT the
    /// relation is inverted; equal values or an unknown side are breakeven.
    pub fn value_style(&self, reference: f64, comparison: f64) -> ValueStyle {
        match self {
            Side::Long => {
                if reference > comparison {
                    ValueStyle::Gain
                } else if reference < comparison {
                    ValueStyle::Loss
                } else {
                    ValueStyle::Breakeven
                }
            }
            Side::Short => {
                if reference < comparison {
                    ValueStyle::Gain
                } else if reference > comparison {
                    ValueStyle::Loss
                } else {
                    ValueStyle::Breakeven
                }
            }
            Side::Unset => ValueStyle::Breakeven,
        }
    }
}

/// Display classification of a derived value (maps to the gain/loss
/// highlight in the render layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueStyle {
    #[serde(rename = "gain")]
    Gain,
    #[serde(rename = "loss")]
    Loss,
    #[serde(rename = "breakeven")]
    Breakeven,
    #[default]
    #[serde(rename = "", other)]
    Unset,
}

impl ValueStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueStyle::Gain => "gain",
            ValueStyle::Loss => "loss",
            ValueStyle::Breakeven => "breakeven",
            ValueStyle::Unset => "",
        }
    }
}

/// A DCA re-entry target attached to a position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReBuyTarget {
    pub target_id: u32,
    pub trigger_percentage: f64,
    pub quantity: f64,
    pub buying: bool,
    pub done: bool,
    pub order_id: String,
    pub cancel: bool,
    pub skipped: bool,
    pub buy_type: String,
}

/// Mongo decimal wrapper carried verbatim on the position payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RealInvestment {
    #[serde(rename = "$numberDecimal")]
    pub number_decimal: String,
}

/// A single trade lifecycle record (open, possibly closed), normalized
/// from the trade API. Every field exists on every normalized position;
/// absent payload fields keep the neutral defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    // === Identifiers ===
    pub position_id: String,
    pub signal_id: String,
    pub user_id: String,

    // === Provider ===
    pub provider: String,
    pub provider_id: String,
    pub provider_name: String,
    /// Route to the provider profile; empty for manual positions.
    pub provider_link: String,
    /// Provider logo URL, falling back to the bundled default.
    pub provider_logo: String,
    pub logo_url: String,
    pub is_copy_trader: bool,
    pub is_copy_trading: bool,
    pub copy_trader_id: bool,

    // === Lifecycle ===
    /// Open timestamp, epoch milliseconds.
    pub open_date: i64,
    /// Close timestamp, epoch milliseconds; 0 while open.
    pub close_date: i64,
    /// Open timestamp formatted for display, "-" when unknown.
    pub open_date_readable: String,
    pub close_date_readable: String,
    /// Humanized time since the position opened.
    pub age: String,
    pub closed: bool,
    /// Integer status code reported by the API.
    pub status: i32,
    pub status_desc: String,
    pub updating: bool,

    // === Market ===
    pub exchange: String,
    pub exchange_internal_name: String,
    pub internal_exchange_id: String,
    pub pair: String,
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub quote_asset: String,
    pub side: Side,
    /// Raw direction tag carried alongside `side` by the API.
    #[serde(rename = "type")]
    pub position_type: String,
    pub leverage: f64,

    // === Pricing ===
    pub buy_price: f64,
    pub sell_price: f64,
    pub stop_loss_price: f64,
    pub stop_loss_percentage: f64,

    // === Sizing ===
    pub amount: f64,
    pub remain_amount: f64,
    pub position_size: String,
    pub position_size_quote: f64,
    pub invested: String,
    pub invested_quote: String,
    pub real_investment: RealInvestment,

    // === Outcome ===
    pub profit: f64,
    pub profit_percentage: f64,
    pub net_profit: f64,
    pub net_profit_percentage: f64,
    pub fees: f64,
    /// Stop-loss distance from entry, percent, sign-flipped for shorts.
    pub risk: f64,
    pub profit_style: ValueStyle,
    pub stop_loss_style: ValueStyle,
    pub risk_style: ValueStyle,

    // === Targets ===
    pub re_buy_targets: Vec<ReBuyTarget>,
    pub re_buy_targets_count_fail: u32,
    pub re_buy_targets_count_pending: u32,
    pub re_buy_targets_count_success: u32,
    pub take_profit: bool,
    pub take_profit_targets_count_fail: u32,
    pub take_profit_targets_count_pending: u32,
    pub take_profit_targets_count_success: u32,
    pub trailing_stop_percentage: f64,
    pub trailing_stop_price: f64,
    pub trailing_stop_trigger_percentage: f64,
    pub trailing_stop_triggered: bool,

    // === Triggers ===
    pub open_trigger: String,
    pub close_trigger: String,
    pub sell_place_order_at: String,
    pub signal_term: String,
    pub signal_metadata: bool,
    #[serde(rename = "buyTTL")]
    pub buy_ttl: f64,
    #[serde(rename = "sellByTTL")]
    pub sell_by_ttl: bool,

    // === Flags ===
    pub accounting: bool,
    pub check_stop: bool,
    pub paper_trading: bool,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            position_id: String::new(),
            signal_id: String::new(),
            user_id: String::new(),
            provider: String::new(),
            provider_id: String::new(),
            provider_name: String::new(),
            provider_link: String::new(),
            provider_logo: String::new(),
            logo_url: String::new(),
            is_copy_trader: false,
            is_copy_trading: false,
            copy_trader_id: false,
            open_date: 0,
            close_date: 0,
            open_date_readable: String::new(),
            close_date_readable: String::new(),
            age: String::new(),
            closed: false,
            status: 0,
            status_desc: String::new(),
            updating: false,
            exchange: String::new(),
            exchange_internal_name: String::new(),
            internal_exchange_id: String::new(),
            pair: String::new(),
            symbol: String::new(),
            base: String::new(),
            quote: String::new(),
            quote_asset: String::new(),
            side: Side::Unset,
            position_type: String::new(),
            leverage: 0.0,
            buy_price: 0.0,
            sell_price: 0.0,
            stop_loss_price: 0.0,
            stop_loss_percentage: 0.0,
            amount: 0.0,
            remain_amount: 0.0,
            position_size: String::new(),
            position_size_quote: 0.0,
            invested: String::new(),
            invested_quote: String::new(),
            real_investment: RealInvestment::default(),
            profit: 0.0,
            profit_percentage: 0.0,
            net_profit: 0.0,
            net_profit_percentage: 0.0,
            fees: 0.0,
            risk: 0.0,
            profit_style: ValueStyle::Unset,
            stop_loss_style: ValueStyle::Unset,
            risk_style: ValueStyle::Unset,
            re_buy_targets: Vec::new(),
            re_buy_targets_count_fail: 0,
            re_buy_targets_count_pending: 0,
            re_buy_targets_count_success: 0,
            take_profit: false,
            take_profit_targets_count_fail: 0,
            take_profit_targets_count_pending: 0,
            take_profit_targets_count_success: 0,
            trailing_stop_percentage: 0.0,
            trailing_stop_price: 0.0,
            trailing_stop_trigger_percentage: 0.0,
            trailing_stop_triggered: false,
            open_trigger: String::new(),
            close_trigger: String::new(),
            sell_place_order_at: String::new(),
            signal_term: String::new(),
            signal_metadata: false,
            buy_ttl: 0.0,
            sell_by_ttl: false,
            accounting: false,
            check_stop: false,
            paper_trading: false,
        }
    }
}

impl Position {
    /// Entry orders are still being filled; outcome columns are not
    /// meaningful yet.
    pub fn is_still_entering(&self) -> bool {
        self.status == 1
    }

    /// Display text for the status column: the API description when
    /// provided, otherwise the bare status code.
    pub fn status_text(&self) -> String {
        if !self.status_desc.is_empty() {
            self.status_desc.clone()
        } else {
            self.status.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_value_style_long() {
        assert_eq!(Side::Long.value_style(10.0, 5.0), ValueStyle::Gain);
        assert_eq!(Side::Long.value_style(5.0, 10.0), ValueStyle::Loss);
        assert_eq!(Side::Long.value_style(5.0, 5.0), ValueStyle::Breakeven);
    }

    #[test]
    fn test_side_value_style_short_inverts() {
        assert_eq!(Side::Short.value_style(5.0, 10.0), ValueStyle::Gain);
        assert_eq!(Side::Short.value_style(10.0, 5.0), ValueStyle::Loss);
    }

    #[test]
    fn test_unknown_side_is_breakeven() {
        assert_eq!(Side::Unset.value_style(10.0, 5.0), ValueStyle::Breakeven);
    }

    #[test]
    fn test_default_template_is_neutral() {
        let position = Position::default();
        assert_eq!(position.buy_price, 0.0);
        assert_eq!(position.pair, "");
        assert!(!position.closed);
        assert!(position.re_buy_targets.is_empty());
        assert_eq!(position.side, Side::Unset);
    }

    #[test]
    fn test_status_text_prefers_description() {
        let mut position = Position::default();
        position.status = 5;
        assert_eq!(position.status_text(), "5");
        position.status_desc = "Take profit reached".to_string();
        assert_eq!(position.status_text(), "Take profit reached");
    }
}
