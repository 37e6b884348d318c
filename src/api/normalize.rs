//! Response normalization: raw trade API payloads to typed entities.
//!
//! Every transform overlays the payload onto a complete default template,
//! then applies a derived pass for values that must never be taken
//! verbatim from the API (parsed prices, readable dates, styles, summed
//! returns). Only the top-level shape is validated; malformed or missing
//! fields degrade to the template defaults.

use chrono::{TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

use crate::format::{camel_case, camelize_keys, humanize_age};
use crate::models::{
    DailyReturn, ExchangeConnection, Position, Provider, ProviderStats, RealInvestment,
    ReBuyTarget, Side, UserBalance, ValueStyle,
};

/// Placeholder logo used when a provider has none.
pub const DEFAULT_PROVIDER_LOGO: &str = "/images/default-provider-logo.png";

/// Top-level payload shape violation. Field-level problems never raise;
/// they fall back to defaults instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Response must be an array of {0}")]
    NotAnArray(&'static str),
    #[error("Response must be a {0} object")]
    NotAnObject(&'static str),
}

// === Lenient field coercion ===

fn lenient_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Object(wrapper)) => wrapper
            .get("$numberDecimal")
            .and_then(Value::as_str)
            .and_then(|text| Decimal::from_str(text).ok())
            .and_then(|decimal| decimal.to_f64())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn lenient_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|float| float as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn lenient_u32(value: Option<&Value>) -> u32 {
    lenient_i64(value).max(0) as u32
}

fn lenient_i32(value: Option<&Value>) -> i32 {
    lenient_i64(value) as i32
}

fn lenient_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Object(wrapper)) => wrapper
            .get("$numberDecimal")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn lenient_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0) != 0.0,
        Some(Value::String(text)) => matches!(text.as_str(), "true" | "1"),
        _ => false,
    }
}

fn lenient_string_vec(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| lenient_string(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Unwrap a Mongo `{ "$oid": ... }` identifier wrapper.
fn oid(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_object)
        .and_then(|wrapper| wrapper.get("$oid"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

// === Derived values ===

/// Epoch-millisecond timestamp formatted for table cells, "-" when the
/// timestamp is absent or zero.
fn readable_date(epoch_ms: i64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(moment) => moment.format("%y/%m/%d %I:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Stop-loss distance from entry in percent. Not-a-number computations
/// (zero entry price) collapse to 0.0; shorts flip the sign.
fn calculate_risk(buy_price: f64, stop_loss_price: f64, side: Side) -> f64 {
    let risk = ((stop_loss_price - buy_price) / buy_price) * 100.0;
    if !risk.is_finite() {
        return 0.0;
    }
    if side == Side::Short {
        -risk
    } else {
        risk
    }
}

/// Profile route for the provider that opened a position. Manual
/// positions (provider id "1") have no profile.
fn provider_link(provider_id: &str, is_copy_trading: bool) -> String {
    if provider_id.is_empty() || provider_id == "1" {
        return String::new();
    }
    if is_copy_trading {
        format!("/copytraders/{}", provider_id)
    } else {
        format!("/signalsproviders/{}", provider_id)
    }
}

// === Positions ===

/// Normalize a positions list payload.
pub fn positions_from_response(response: &Value) -> Result<Vec<Position>, ShapeError> {
    let items = response
        .as_array()
        .ok_or(ShapeError::NotAnArray("positions"))?;

    Ok(items.iter().map(position_from_item).collect())
}

/// Normalize one raw position record.
pub fn position_from_item(item: &Value) -> Position {
    let mut position = Position::default();

    // Overlay the payload onto the default template.
    position.position_id = lenient_string(item.get("positionId"));
    position.signal_id = lenient_string(item.get("signalId"));
    position.user_id = lenient_string(item.get("userId"));
    position.provider = lenient_string(item.get("provider"));
    position.provider_id = lenient_string(item.get("providerId"));
    position.provider_name = lenient_string(item.get("providerName"));
    position.logo_url = lenient_string(item.get("logoUrl"));
    position.is_copy_trader = lenient_bool(item.get("isCopyTrader"));
    position.is_copy_trading = lenient_bool(item.get("isCopyTrading"));
    position.copy_trader_id = lenient_bool(item.get("copyTraderId"));
    position.open_date = lenient_i64(item.get("openDate"));
    position.close_date = lenient_i64(item.get("closeDate"));
    position.closed = lenient_bool(item.get("closed"));
    position.status = lenient_i32(item.get("status"));
    position.status_desc = lenient_string(item.get("statusDesc"));
    position.updating = lenient_bool(item.get("updating"));
    position.exchange = lenient_string(item.get("exchange"));
    position.exchange_internal_name = lenient_string(item.get("exchangeInternalName"));
    position.internal_exchange_id = lenient_string(item.get("internalExchangeId"));
    position.pair = lenient_string(item.get("pair"));
    position.symbol = lenient_string(item.get("symbol"));
    position.base = lenient_string(item.get("base"));
    position.quote = lenient_string(item.get("quote"));
    position.quote_asset = lenient_string(item.get("quoteAsset"));
    position.side = Side::parse(&lenient_string(item.get("side")));
    position.position_type = lenient_string(item.get("type"));
    position.leverage = lenient_f64(item.get("leverage"));
    position.buy_price = lenient_f64(item.get("buyPrice"));
    position.sell_price = lenient_f64(item.get("sellPrice"));
    position.stop_loss_price = lenient_f64(item.get("stopLossPrice"));
    position.stop_loss_percentage = lenient_f64(item.get("stopLossPercentage"));
    position.amount = lenient_f64(item.get("amount"));
    position.remain_amount = lenient_f64(item.get("remainAmount"));
    position.position_size = lenient_string(item.get("positionSize"));
    position.position_size_quote = lenient_f64(item.get("positionSizeQuote"));
    position.invested = lenient_string(item.get("invested"));
    position.invested_quote = lenient_string(item.get("investedQuote"));
    position.real_investment = item
        .get("realInvestment")
        .and_then(|value| serde_json::from_value::<RealInvestment>(value.clone()).ok())
        .unwrap_or_default();
    position.profit = lenient_f64(item.get("profit"));
    position.profit_percentage = lenient_f64(item.get("profitPercentage"));
    position.net_profit = lenient_f64(item.get("netProfit"));
    position.net_profit_percentage = lenient_f64(item.get("netProfitPercentage"));
    position.fees = lenient_f64(item.get("fees"));
    position.re_buy_targets = item
        .get("reBuyTargets")
        .and_then(|value| serde_json::from_value::<Vec<ReBuyTarget>>(value.clone()).ok())
        .unwrap_or_default();
    position.re_buy_targets_count_fail = lenient_u32(item.get("reBuyTargetsCountFail"));
    position.re_buy_targets_count_pending = lenient_u32(item.get("reBuyTargetsCountPending"));
    position.re_buy_targets_count_success = lenient_u32(item.get("reBuyTargetsCountSuccess"));
    position.take_profit = lenient_bool(item.get("takeProfit"));
    position.take_profit_targets_count_fail = lenient_u32(item.get("takeProfitTargetsCountFail"));
    position.take_profit_targets_count_pending =
        lenient_u32(item.get("takeProfitTargetsCountPending"));
    position.take_profit_targets_count_success =
        lenient_u32(item.get("takeProfitTargetsCountSuccess"));
    position.trailing_stop_percentage = lenient_f64(item.get("trailingStopPercentage"));
    position.trailing_stop_price = lenient_f64(item.get("trailingStopPrice"));
    position.trailing_stop_trigger_percentage =
        lenient_f64(item.get("trailingStopTriggerPercentage"));
    position.trailing_stop_triggered = lenient_bool(item.get("trailingStopTriggered"));
    position.open_trigger = lenient_string(item.get("openTrigger"));
    position.close_trigger = lenient_string(item.get("closeTrigger"));
    position.sell_place_order_at = lenient_string(item.get("sellPlaceOrderAt"));
    position.signal_term = lenient_string(item.get("signalTerm"));
    position.signal_metadata = lenient_bool(item.get("signalMetadata"));
    position.buy_ttl = lenient_f64(item.get("buyTTL"));
    position.sell_by_ttl = lenient_bool(item.get("sellByTTL"));
    position.accounting = lenient_bool(item.get("accounting"));
    position.check_stop = lenient_bool(item.get("checkStop"));
    position.paper_trading = lenient_bool(item.get("paperTrading"));

    // Derived pass: never taken verbatim from the payload.
    position.risk = calculate_risk(position.buy_price, position.stop_loss_price, position.side);
    position.risk_style = if position.risk < 0.0 {
        ValueStyle::Loss
    } else {
        ValueStyle::Gain
    };
    position.profit_style = position.side.value_style(position.profit, 0.0);
    position.stop_loss_style = position
        .side
        .value_style(position.stop_loss_price, position.buy_price);
    position.open_date_readable = readable_date(position.open_date);
    position.close_date_readable = readable_date(position.close_date);
    position.age = if position.open_date > 0 {
        humanize_age(position.open_date, Utc::now().timestamp_millis())
    } else {
        String::new()
    };
    position.provider_link = provider_link(&position.provider_id, position.is_copy_trading);
    position.provider_logo = if position.logo_url.is_empty() {
        DEFAULT_PROVIDER_LOGO.to_string()
    } else {
        position.logo_url.clone()
    };

    position
}

// === Providers ===

/// Normalize a providers list payload.
pub fn providers_from_response(response: &Value) -> Result<Vec<Provider>, ShapeError> {
    let items = response
        .as_array()
        .ok_or(ShapeError::NotAnArray("providers"))?;

    Ok(items.iter().map(provider_from_item).collect())
}

/// Normalize one raw provider record.
pub fn provider_from_item(item: &Value) -> Provider {
    let mut provider = Provider::default();

    provider.id = lenient_string(item.get("id"));
    provider.name = lenient_string(item.get("name"));
    provider.description = lenient_string(item.get("description"));
    provider.short_desc = lenient_string(item.get("shortDesc"));
    provider.long_desc = lenient_string(item.get("longDesc"));
    provider.logo_url = lenient_string(item.get("logoUrl"));
    provider.website = lenient_string(item.get("website"));
    // Non-neutral defaults survive unless the payload carries the key.
    if let Some(value) = item.get("coin") {
        provider.coin = lenient_string(Some(value));
    }
    if let Some(value) = item.get("public") {
        provider.public = lenient_bool(Some(value));
    }
    if let Some(value) = item.get("disable") {
        provider.disable = lenient_bool(Some(value));
    }
    provider.key = lenient_bool(item.get("key"));
    provider.customer_key = lenient_bool(item.get("customerKey"));
    provider.has_recommended_settings = lenient_bool(item.get("hasRecommendedSettings"));
    provider.has_been_used = lenient_bool(item.get("hasBeenUsed"));
    provider.is_clone = lenient_bool(item.get("isClone"));
    provider.is_copy_trading = lenient_bool(item.get("isCopyTrading"));
    provider.is_from_user = lenient_bool(item.get("isFromUser"));
    provider.cloned_from = match item.get("clonedFrom") {
        Some(Value::Object(_)) => oid(item.get("clonedFrom")),
        other => lenient_string(other),
    };
    provider.exchanges = lenient_string_vec(item.get("exchanges"));
    provider.exchange_type = lenient_string(item.get("exchangeType"));
    provider.quote = lenient_string(item.get("quote"));
    provider.fee = lenient_string(item.get("fee"));
    provider.price = lenient_f64(item.get("price"));
    provider.created_at = lenient_i64(item.get("createdAt"));
    provider.followers = lenient_u32(item.get("followers"));
    provider.risk = lenient_f64(item.get("risk"));
    provider.floating = lenient_f64(item.get("floating"));
    if let Some(Value::Array(days)) = item.get("dailyReturns") {
        provider.daily_returns = days.iter().map(daily_return_from_item).collect();
    }

    // Aggregate return is always recomputed from the daily series.
    provider.returns = provider.daily_returns.iter().map(|day| day.returns).sum();

    provider
}

fn daily_return_from_item(item: &Value) -> DailyReturn {
    DailyReturn {
        name: lenient_string(item.get("name")),
        returns: lenient_f64(item.get("returns")),
        positions: lenient_u32(item.get("positions")),
        total_invested: lenient_string(item.get("totalInvested")),
        total_profit: lenient_string(item.get("totalProfit")),
    }
}

// === Exchange connections ===

/// Normalize an exchange connections list payload.
pub fn connections_from_response(response: &Value) -> Result<Vec<ExchangeConnection>, ShapeError> {
    let items = response
        .as_array()
        .ok_or(ShapeError::NotAnArray("exchange connections"))?;

    Ok(items.iter().map(connection_from_item).collect())
}

/// Normalize one raw exchange connection record.
pub fn connection_from_item(item: &Value) -> ExchangeConnection {
    let mut connection = ExchangeConnection::default();

    // The id always comes from the Mongo wrapper, "" when absent.
    connection.id = oid(item.get("_id"));
    connection.name = lenient_string(item.get("name"));
    connection.exchange_id = lenient_string(item.get("exchangeId"));
    connection.exchange_name = lenient_string(item.get("exchangeName"));
    connection.internal_id = lenient_string(item.get("internalId"));
    connection.internal_name = lenient_string(item.get("internalName"));
    connection.key = lenient_bool(item.get("key"));
    connection.secret = lenient_bool(item.get("secret"));
    connection.are_keys_valid = lenient_bool(item.get("areKeysValid"));
    connection.exchange_type = lenient_string(item.get("exchangeType"));
    connection.is_testnet = lenient_bool(item.get("isTestnet"));
    connection.paper_trading = lenient_bool(item.get("paperTrading"));
    connection.disable = lenient_bool(item.get("disable"));
    connection.managed = lenient_bool(item.get("managed"));
    connection.internal = lenient_bool(item.get("internal"));
    if let Some(value) = item.get("isBrokerAccount") {
        connection.is_broker_account = lenient_bool(Some(value));
    }
    connection.position_size = lenient_f64(item.get("positionSize"));
    connection.sub_account_id = lenient_string(item.get("subAccountId"));
    connection.binance_broker_id = lenient_string(item.get("binanceBrokerId"));
    connection.check_auth_count = lenient_u32(item.get("checkAuthCount"));

    connection
}

// === Balance ===

/// Normalize a user balance payload.
pub fn balance_from_response(response: &Value) -> Result<UserBalance, ShapeError> {
    let item = response
        .as_object()
        .ok_or(ShapeError::NotAnObject("balance"))?;

    Ok(UserBalance {
        btcusdt: lenient_f64(item.get("btcusdt")),
        total_invested: lenient_f64(item.get("totalInvested")),
        total_open: lenient_f64(item.get("totalOpen")),
        total_profit: lenient_f64(item.get("totalProfit")),
        total_assets: lenient_f64(item.get("totalAssets")),
        profit_percentage: lenient_f64(item.get("profitPercentage")),
    })
}

// === Provider stats ===

/// Normalize a provider stats list payload.
pub fn provider_stats_from_response(response: &Value) -> Result<Vec<ProviderStats>, ShapeError> {
    let items = response
        .as_array()
        .ok_or(ShapeError::NotAnArray("provider stats"))?;

    Ok(items.iter().map(provider_stats_from_item).collect())
}

/// Normalize one raw provider stats record. Keys are camel-cased before
/// the overlay; values stay decimal strings, filled with "" when absent.
pub fn provider_stats_from_item(item: &Value) -> ProviderStats {
    let camelized = camelize_keys(item);
    let stat = |key: &str| stat_string(&camelized, key);

    ProviderStats {
        provider_id: stat("providerId"),
        name: stat("name"),
        logo_url: stat("logoUrl"),
        quote: stat("quote"),
        base: lenient_bool(camelized.get("base")),
        signals: lenient_u32(camelized.get("signals")),
        sum_total_invested: stat("sumTotalInvested"),
        sum_total_profit: stat("sumTotalProfit"),
        sum_total_profit_from_closed: stat("sumTotalProfitFromClosed"),
        sum_total_profit_from_opened: stat("sumTotalProfitFromOpened"),
        sum_positions: stat("sumPositions"),
        sum_unclosed_positions: stat("sumUnclosedPositions"),
        sum_wins: stat("sumWins"),
        sum_losses: stat("sumLosses"),
        sum_dcas: stat("sumDCAs"),
        sum_dca_wins: stat("sumDCAWins"),
        sum_dca_losses: stat("sumDCALosses"),
        sum_sold_by_take_profit: stat("sumSoldByTakeProfit"),
        sum_sold_manually: stat("sumSoldManually"),
        sum_sold_by_trailing_stop: stat("sumSoldByTrailingStop"),
        sum_sold_by_stop_loss: stat("sumSoldByStopLoss"),
        sum_sold_by_ttl: stat("sumSoldByTTL"),
        sum_sold_by_signal: stat("sumSoldBySignal"),
        sum_sold_by_other: stat("sumSoldByOther"),
        sum_return_of_investment: stat("sumReturnOfInvestment"),
        sum_closed_positions: stat("sumClosedPositions"),
        avg_average_profit: stat("avgAverageProfit"),
        avg_average_position_size: stat("avgAveragePositionSize"),
        avg_average_dcas_per_position: stat("avgAverageDCAsPerPosition"),
        avg_average_closing_time: stat("avgAverageClosingTime"),
        avg_average_entry_price: stat("avgAverageEntryPrice"),
        avg_average_exit_price: stat("avgAverageExitPrice"),
        avg_average_average_price: stat("avgAverageAveragePrice"),
        avg_average_profit_percentage: stat("avgAverageProfitPercentage"),
        avg_i24h_higher_price_percentage: stat("avgI24hHigherPricePercentage"),
        avg_i24h_lower_before_higher_price_percentage: stat(
            "avgI24hLowerBeforeHigherPricePercentage",
        ),
        avg_i24h_lower_price_percentage: stat("avgI24hLowerPricePercentage"),
        avg_i24h_seconds_until_higher_price: stat("avgI24hSecondsUntilHigherPrice"),
        avg_i24h_seconds_until_lower_before_higher_price: stat(
            "avgI24hSecondsUntilLowerBeforeHigherPrice",
        ),
        avg_i24h_seconds_until_lower_price: stat("avgI24hSecondsUntilLowerPrice"),
        avg_i3d_higher_price_percentage: stat("avgI3dHigherPricePercentage"),
        avg_i3d_lower_before_higher_price_percentage: stat(
            "avgI3dLowerBeforeHigherPricePercentage",
        ),
        avg_i3d_lower_price_percentage: stat("avgI3dLowerPricePercentage"),
        avg_i3d_seconds_until_higher_price: stat("avgI3dSecondsUntilHigherPrice"),
        avg_i3d_seconds_until_lower_before_higher_price: stat(
            "avgI3dSecondsUntilLowerBeforeHigherPrice",
        ),
        avg_i3d_seconds_until_lower_price: stat("avgI3dSecondsUntilLowerPrice"),
        avg_i1w_higher_price_percentage: stat("avgI1wHigherPricePercentage"),
        avg_i1w_lower_before_higher_price_percentage: stat(
            "avgI1wLowerBeforeHigherPricePercentage",
        ),
        avg_i1w_lower_price_percentage: stat("avgI1wLowerPricePercentage"),
        avg_i1w_seconds_until_higher_price: stat("avgI1wSecondsUntilHigherPrice"),
        avg_i1w_seconds_until_lower_before_higher_price: stat(
            "avgI1wSecondsUntilLowerBeforeHigherPrice",
        ),
        avg_i1w_seconds_until_lower_price: stat("avgI1wSecondsUntilLowerPrice"),
        avg_i1m_higher_price_percentage: stat("avgI1mHigherPricePercentage"),
        avg_i1m_lower_before_higher_price_percentage: stat(
            "avgI1mLowerBeforeHigherPricePercentage",
        ),
        avg_i1m_lower_price_percentage: stat("avgI1mLowerPricePercentage"),
        avg_i1m_seconds_until_higher_price: stat("avgI1mSecondsUntilHigherPrice"),
        avg_i1m_seconds_until_lower_before_higher_price: stat(
            "avgI1mSecondsUntilLowerBeforeHigherPrice",
        ),
        avg_i1m_seconds_until_lower_price: stat("avgI1mSecondsUntilLowerPrice"),
        max_max_investment: stat("maxMaxInvestment"),
        max_max_return_of_investment: stat("maxMaxReturnOfInvestment"),
        max_max_dca_profit: stat("maxMaxDCAProfit"),
        max_max_buying_price: stat("maxMaxBuyingPrice"),
        max_max_exit_price: stat("maxMaxExitPrice"),
        max_slower_closed_position_in_seconds: stat("maxSlowerClosedPositionInSeconds"),
        min_min_investment: stat("minMinInvestment"),
        min_min_return_of_investment: stat("minMinReturnOfInvestment"),
        min_min_dca_profit: stat("minMinDCAProfit"),
        min_min_buying_price: stat("minMinBuyingPrice"),
        min_min_exit_price: stat("minMinExitPrice"),
        min_faster_closed_position_in_seconds: stat("minFasterClosedPositionInSeconds"),
        percentage_profit: stat("percentageProfit"),
        win_rate: stat("winRate"),
    }
}

/// Look up a stat by its template key, falling back to the strictly
/// camel-cased form of the key (acronym keys like "sumSoldByTTL" arrive
/// either way).
fn stat_string(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(value) => lenient_string(Some(value)),
        None => lenient_string(item.get(camel_case(key).as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positions_response_must_be_array() {
        let err = positions_from_response(&json!({"positions": []})).unwrap_err();
        assert_eq!(err.to_string(), "Response must be an array of positions");
    }

    #[test]
    fn test_position_missing_fields_take_defaults() {
        let position = position_from_item(&json!({}));
        assert_eq!(position.position_id, "");
        assert_eq!(position.amount, 0.0);
        assert!(!position.closed);
        assert!(position.re_buy_targets.is_empty());
        assert_eq!(position.open_date_readable, "-");
        assert_eq!(position.close_date_readable, "-");
        assert_eq!(position.risk, 0.0);
        assert_eq!(position.profit_style, ValueStyle::Breakeven);
        assert_eq!(position.provider_logo, DEFAULT_PROVIDER_LOGO);
    }

    #[test]
    fn test_position_coerces_string_prices() {
        let position = position_from_item(&json!({
            "buyPrice": "100.5",
            "sellPrice": 110.25,
            "amount": "2.5",
            "fees": "not a number",
        }));
        assert_eq!(position.buy_price, 100.5);
        assert_eq!(position.sell_price, 110.25);
        assert_eq!(position.amount, 2.5);
        assert_eq!(position.fees, 0.0);
    }

    #[test]
    fn test_risk_zero_when_buy_price_zero() {
        let position = position_from_item(&json!({
            "buyPrice": 0,
            "stopLossPrice": 95,
            "side": "LONG",
        }));
        assert_eq!(position.risk, 0.0);
    }

    #[test]
    fn test_risk_sign_flips_between_sides() {
        let long = position_from_item(&json!({
            "buyPrice": 100,
            "stopLossPrice": 95,
            "side": "LONG",
        }));
        let short = position_from_item(&json!({
            "buyPrice": 100,
            "stopLossPrice": 95,
            "side": "SHORT",
        }));
        assert_eq!(long.risk, -5.0);
        assert_eq!(short.risk, 5.0);
        assert_eq!(long.risk_style, ValueStyle::Loss);
        assert_eq!(short.risk_style, ValueStyle::Gain);
    }

    #[test]
    fn test_stop_loss_style_is_side_aware() {
        let long = position_from_item(&json!({
            "buyPrice": 100,
            "stopLossPrice": 110,
            "side": "LONG",
        }));
        let short = position_from_item(&json!({
            "buyPrice": 100,
            "stopLossPrice": 110,
            "side": "SHORT",
        }));
        assert_eq!(long.stop_loss_style, ValueStyle::Gain);
        assert_eq!(short.stop_loss_style, ValueStyle::Loss);
    }

    #[test]
    fn test_provider_link_composition() {
        let manual = position_from_item(&json!({"providerId": "1"}));
        assert_eq!(manual.provider_link, "");

        let copy = position_from_item(&json!({"providerId": "p9", "isCopyTrading": true}));
        assert_eq!(copy.provider_link, "/copytraders/p9");

        let signal = position_from_item(&json!({"providerId": "p9"}));
        assert_eq!(signal.provider_link, "/signalsproviders/p9");
    }

    #[test]
    fn test_position_normalization_is_idempotent() {
        let position = position_from_item(&json!({
            "positionId": "pos1",
            "pair": "BTCUSDT",
            "side": "SHORT",
            "buyPrice": "9500.5",
            "stopLossPrice": "9700",
            "profit": -12.5,
            "openDate": 1_590_000_000_000i64,
            "status": 9,
            "reBuyTargets": [{"targetId": 1, "triggerPercentage": -5.0}],
            "realInvestment": {"$numberDecimal": "0.05"},
        }));

        let reserialized = serde_json::to_value(&position).unwrap();
        let renormalized = position_from_item(&reserialized);
        assert_eq!(position, renormalized);
    }

    #[test]
    fn test_provider_returns_summed_from_daily_returns() {
        let provider = provider_from_item(&json!({
            "id": "p1",
            "returns": 999.0,
            "dailyReturns": [
                {"name": "2020-10-22", "returns": "1.5"},
                {"name": "2020-10-23", "returns": 2.5},
            ],
        }));
        assert_eq!(provider.returns, 4.0);
    }

    #[test]
    fn test_provider_empty_daily_returns_is_zero() {
        let provider = provider_from_item(&json!({"id": "p1", "returns": "7.3"}));
        assert_eq!(provider.returns, 0.0);
    }

    #[test]
    fn test_provider_non_neutral_defaults_survive() {
        let provider = provider_from_item(&json!({"name": "Alpha"}));
        assert_eq!(provider.coin, "BTC");
        assert!(provider.public);
        assert!(provider.disable);

        let overridden = provider_from_item(&json!({"coin": "ETH", "public": false}));
        assert_eq!(overridden.coin, "ETH");
        assert!(!overridden.public);
    }

    #[test]
    fn test_connection_unwraps_mongo_id() {
        let connection = connection_from_item(&json!({
            "_id": {"$oid": "5e23"},
            "exchangeName": "Binance",
        }));
        assert_eq!(connection.id, "5e23");
        assert_eq!(connection.exchange_name, "Binance");

        let missing = connection_from_item(&json!({"exchangeName": "Kraken"}));
        assert_eq!(missing.id, "");

        let malformed = connection_from_item(&json!({"_id": "plain"}));
        assert_eq!(malformed.id, "");
    }

    #[test]
    fn test_balance_requires_object() {
        let err = balance_from_response(&json!([])).unwrap_err();
        assert_eq!(err, ShapeError::NotAnObject("balance"));
    }

    #[test]
    fn test_balance_coerces_and_defaults() {
        let balance = balance_from_response(&json!({
            "btcusdt": "9100.42",
            "totalAssets": 3.25,
        }))
        .unwrap();
        assert_eq!(balance.btcusdt, 9100.42);
        assert_eq!(balance.total_assets, 3.25);
        assert_eq!(balance.total_invested, 0.0);
        assert_eq!(balance.profit_percentage, 0.0);
    }

    #[test]
    fn test_stats_fill_absent_keys_and_keep_strings() {
        let stats = provider_stats_from_item(&json!({
            "providerId": "p1",
            "sumWins": "10",
        }));
        assert_eq!(stats.provider_id, "p1");
        assert_eq!(stats.sum_wins, "10");
        assert_eq!(stats.win_rate, "");
        assert_eq!(stats.avg_average_profit, "");
    }

    #[test]
    fn test_stats_camel_cases_raw_keys() {
        let stats = provider_stats_from_item(&json!({
            "provider_id": "p2",
            "win_rate": "94.4",
            "sum_sold_by_ttl": "3",
        }));
        assert_eq!(stats.provider_id, "p2");
        assert_eq!(stats.win_rate, "94.4");
        assert_eq!(stats.sum_sold_by_ttl, "3");
    }

    #[test]
    fn test_number_decimal_wrapper_coercion() {
        let position = position_from_item(&json!({
            "positionSizeQuote": {"$numberDecimal": "125.75"},
        }));
        assert_eq!(position.position_size_quote, 125.75);
    }

    #[test]
    fn test_readable_date_formatting() {
        // 2020-05-20 14:30:00 UTC
        let position = position_from_item(&json!({"openDate": 1_589_984_100_000i64}));
        assert_eq!(position.open_date_readable, "20/05/20 02:15");
    }
}
