//! Position table composition: fixed column orderings per table variant
//! and one cell rule per column id.

use crate::format::{format_number, format_price};
use crate::models::Position;

use super::{Cell, Column, DataTable};

/// Which positions table is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionsTableVariant {
    Open,
    Closed,
    Log,
    /// Subscriber positions shown to a provider's manager.
    Management,
    /// Positions listed on a provider's profile.
    ProviderProfile,
    /// Entry orders not yet filled.
    OpenOrders,
}

impl PositionsTableVariant {
    pub fn column_ids(&self) -> &'static [&'static str] {
        match self {
            PositionsTableVariant::Open => &[
                "col.paper",
                "col.date.open",
                "col.provider.logo",
                "col.provider.name",
                "col.signalid",
                "col.pair",
                "col.price.entry",
                "col.leverage",
                "col.price.current",
                "col.plnumber",
                "col.plpercentage",
                "col.side",
                "col.stoplossprice",
                "col.initialamount",
                "col.remainingamount",
                "col.invested",
                "col.tsl",
                "col.tp",
                "col.dca",
                "col.risk",
                "col.age",
                "col.opentrigger",
                "col.actions",
            ],
            PositionsTableVariant::Closed => &[
                "col.paper",
                "col.date.open",
                "col.date.close",
                "col.provider.logo",
                "col.provider.name",
                "col.stat",
                "col.signalid",
                "col.pair",
                "col.price.entry",
                "col.price.exit",
                "col.plnumber",
                "col.plpercentage",
                "col.side",
                "col.stoplossprice",
                "col.amount",
                "col.invested",
                "col.tsl",
                "col.tp",
                "col.dca",
                "col.risk",
                "col.opentrigger",
                "col.fees",
                "col.netprofit.percentage",
                "col.netprofit.amount",
                "col.actions",
            ],
            PositionsTableVariant::Log => &[
                "col.paper",
                "col.date.open",
                "col.type",
                "col.provider.logo",
                "col.provider.name",
                "col.stat",
                "col.signalid",
                "col.pair",
                "col.price.entry",
                "col.side",
                "col.amount",
                "col.remainingamount",
                "col.invested",
                "col.actions",
            ],
            PositionsTableVariant::Management => &[
                "col.date.open",
                "col.provider.logo",
                "col.pair",
                "col.price.entry",
                "col.price.current",
                "col.plnumber",
                "col.plpercentage",
                "col.side",
                "col.amount",
                "col.invested",
                "col.risk",
                "col.age",
                "col.actions",
            ],
            PositionsTableVariant::ProviderProfile => &[
                "col.date.open",
                "col.date.close",
                "col.pair",
                "col.price.entry",
                "col.price.exit",
                "col.plpercentage",
                "col.side",
                "col.invested",
                "col.risk",
                "col.stat",
            ],
            PositionsTableVariant::OpenOrders => &[
                "col.date.open",
                "col.positionid",
                "col.pair",
                "col.amount",
                "col.price.entry",
                "col.side",
                "col.type",
                "col.stat",
            ],
        }
    }
}

/// Compose the table for one variant from a positions collection.
pub fn compose_positions_table(
    variant: PositionsTableVariant,
    positions: &[Position],
) -> DataTable {
    let column_ids = variant.column_ids();
    let columns = column_ids.iter().map(|id| Column::from_id(id)).collect();
    let rows = positions
        .iter()
        .map(|position| {
            column_ids
                .iter()
                .map(|id| cell_for(position, id))
                .collect()
        })
        .collect();

    DataTable { columns, rows }
}

fn cell_for(position: &Position, column_id: &str) -> Cell {
    match column_id {
        "col.paper" => Cell::plain(if position.paper_trading { "paper" } else { "" }),
        "col.date.open" => Cell::plain(&position.open_date_readable),
        "col.date.close" => Cell::plain(&position.close_date_readable),
        "col.provider.logo" => Cell::plain(&position.provider_logo),
        "col.provider.name" => Cell::plain(&position.provider_name),
        "col.signalid" => Cell::plain(&position.signal_id),
        "col.positionid" => Cell::plain(&position.position_id),
        "col.pair" => Cell::plain(&position.pair),
        "col.price.entry" => Cell::plain(symbol_price(&position.quote, position.buy_price)),
        "col.price.current" | "col.price.exit" => {
            Cell::plain(symbol_price(&position.quote, position.sell_price))
        }
        "col.leverage" => Cell::plain(position.leverage.to_string()),
        "col.plnumber" => {
            if position.is_still_entering() {
                Cell::plain("Still entering...")
            } else {
                Cell::styled(
                    symbol_price(&position.quote, position.profit),
                    position.profit_style,
                )
            }
        }
        "col.plpercentage" => {
            if position.is_still_entering() {
                Cell::plain("Still entering...")
            } else {
                Cell::styled(
                    format_number(position.profit_percentage, 2),
                    position.profit_style,
                )
            }
        }
        "col.side" => Cell::plain(position.side.as_str()),
        "col.type" => Cell::plain(&position.position_type),
        "col.stoplossprice" => Cell::styled(
            symbol_price(&position.quote, position.stop_loss_price),
            position.stop_loss_style,
        ),
        "col.initialamount" | "col.amount" => {
            Cell::plain(symbol_price(&position.base, position.amount))
        }
        "col.remainingamount" => Cell::plain(symbol_price(&position.base, position.remain_amount)),
        "col.invested" => Cell::plain(symbol_price(&position.quote, position.position_size_quote)),
        "col.tsl" => Cell::plain(if position.trailing_stop_trigger_percentage != 0.0 {
            if position.trailing_stop_triggered {
                "triggered"
            } else {
                "armed"
            }
        } else {
            ""
        }),
        "col.tp" => Cell::plain(targets_summary(
            position.take_profit_targets_count_fail,
            position.take_profit_targets_count_success,
            position.take_profit_targets_count_pending,
        )),
        "col.dca" => Cell::plain(targets_summary(
            position.re_buy_targets_count_fail,
            position.re_buy_targets_count_success,
            position.re_buy_targets_count_pending,
        )),
        "col.risk" => Cell::styled(
            format!("{} %", format_number(position.risk, 2)),
            position.risk_style,
        ),
        "col.age" => Cell::plain(&position.age),
        "col.opentrigger" => Cell::plain(&position.open_trigger),
        "col.fees" => Cell::plain(symbol_price(&position.quote, position.fees)),
        "col.netprofit.percentage" => Cell::styled(
            format_number(position.net_profit_percentage, 2),
            net_profit_style(position.net_profit),
        ),
        "col.netprofit.amount" => Cell::styled(
            symbol_price(&position.quote, position.net_profit),
            net_profit_style(position.net_profit),
        ),
        "col.stat" => Cell::plain(position.status_text()),
        "col.actions" => Cell::plain(if position.is_copy_trading {
            "view exit cancel"
        } else {
            "edit exit cancel"
        }),
        _ => Cell::plain(""),
    }
}

fn symbol_price(symbol: &str, price: f64) -> String {
    if symbol.is_empty() {
        format_price(price)
    } else {
        format!("{} {}", symbol, format_price(price))
    }
}

fn net_profit_style(net_profit: f64) -> super::CellStyle {
    if net_profit < 0.0 {
        super::CellStyle::Loss
    } else {
        super::CellStyle::Gain
    }
}

fn targets_summary(fail: u32, success: u32, pending: u32) -> String {
    let mut parts = Vec::new();
    if fail > 0 {
        parts.push(format!("{} failed", fail));
    }
    if success > 0 {
        parts.push(format!("{} done", success));
    }
    if pending > 0 {
        parts.push(format!("{} pending", pending));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Side, ValueStyle};
    use crate::table::CellStyle;

    #[test]
    fn test_open_table_column_ordering() {
        let ids = PositionsTableVariant::Open.column_ids();
        assert_eq!(ids[0], "col.paper");
        assert_eq!(ids[1], "col.date.open");
        assert_eq!(ids[ids.len() - 1], "col.actions");
        assert_eq!(ids.len(), 23);
    }

    #[test]
    fn test_closed_table_includes_net_profit_columns() {
        let ids = PositionsTableVariant::Closed.column_ids();
        assert!(ids.contains(&"col.netprofit.percentage"));
        assert!(ids.contains(&"col.netprofit.amount"));
        assert!(ids.contains(&"col.date.close"));
    }

    #[test]
    fn test_open_orders_table_identifies_order() {
        let ids = PositionsTableVariant::OpenOrders.column_ids();
        assert!(ids.contains(&"col.positionid"));
        assert!(!ids.contains(&"col.plnumber"));
    }

    #[test]
    fn test_row_matches_column_count() {
        let mut position = Position::default();
        position.pair = "BTCUSDT".to_string();
        let table = compose_positions_table(PositionsTableVariant::Open, &[position]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), table.columns.len());
    }

    #[test]
    fn test_still_entering_profit_cell() {
        let mut position = Position::default();
        position.status = 1;
        position.profit = 42.0;
        let table = compose_positions_table(PositionsTableVariant::Open, &[position]);
        let profit_index = PositionsTableVariant::Open
            .column_ids()
            .iter()
            .position(|id| *id == "col.plnumber")
            .unwrap();
        assert_eq!(table.rows[0][profit_index].text, "Still entering...");
    }

    #[test]
    fn test_profit_cell_carries_style() {
        let mut position = Position::default();
        position.status = 9;
        position.quote = "USDT".to_string();
        position.profit = 25.0;
        position.side = Side::Long;
        position.profit_style = ValueStyle::Gain;

        let table = compose_positions_table(PositionsTableVariant::Open, &[position]);
        let profit_index = PositionsTableVariant::Open
            .column_ids()
            .iter()
            .position(|id| *id == "col.plnumber")
            .unwrap();
        let cell = &table.rows[0][profit_index];
        assert_eq!(cell.text, "USDT 25.00");
        assert_eq!(cell.style, CellStyle::Gain);
    }

    #[test]
    fn test_risk_cell_formatting() {
        let mut position = Position::default();
        position.risk = -5.126;
        position.risk_style = ValueStyle::Loss;
        let table = compose_positions_table(PositionsTableVariant::Open, &[position]);
        let risk_index = PositionsTableVariant::Open
            .column_ids()
            .iter()
            .position(|id| *id == "col.risk")
            .unwrap();
        let cell = &table.rows[0][risk_index];
        assert_eq!(cell.text, "-5.13 %");
        assert_eq!(cell.style, CellStyle::Loss);
    }

    #[test]
    fn test_targets_summary_compact() {
        assert_eq!(targets_summary(0, 0, 0), "");
        assert_eq!(targets_summary(1, 2, 0), "1 failed, 2 done");
        assert_eq!(targets_summary(0, 0, 3), "3 pending");
    }
}
