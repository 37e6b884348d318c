//! View-state and settings types persisted by the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::models::ExchangeConnection;

/// Identifier of a list view whose query state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    CopyTraders,
    SignalProviders,
    ConnectedCopyTraders,
    ConnectedSignalProviders,
    OpenPositions,
    ClosedPositions,
    LogPositions,
}

impl PageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::CopyTraders => "copyt",
            PageId::SignalProviders => "signalp",
            PageId::ConnectedCopyTraders => "connectedCopyt",
            PageId::ConnectedSignalProviders => "connectedSignalp",
            PageId::OpenPositions => "openPositions",
            PageId::ClosedPositions => "closedPositions",
            PageId::LogPositions => "logPositions",
        }
    }
}

/// Persisted query state for one page: last-used filters, sort, and
/// time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewPrefs {
    pub filters: Map<String, Value>,
    pub sort: Option<String>,
    pub time_frame: Option<u32>,
}

/// User settings shared across views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub dark_style: bool,
    pub language_code: String,
    pub show_balance: bool,
    /// Visible column ids per table id.
    pub display_columns: HashMap<String, Vec<String>>,
    /// Currently selected exchange account.
    pub selected_exchange: ExchangeConnection,
}

impl Default for Settings {
    fn default() -> Self {
        let mut display_columns = HashMap::new();
        display_columns.insert(
            "openPositions".to_string(),
            to_strings(&[
                "col.date.open",
                "col.provider.logo",
                "col.pair",
                "col.price.current",
                "col.plnumber",
                "col.plpercentage",
                "col.invested",
                "col.actions",
            ]),
        );
        display_columns.insert(
            "closedPositions".to_string(),
            to_strings(&[
                "col.paper",
                "col.date.open",
                "col.date.close",
                "col.provider.logo",
                "col.pair",
                "col.price.entry",
                "col.price.exit",
                "col.amount",
                "col.invested",
                "col.risk",
                "col.fees",
                "col.netprofit.percentage",
                "col.netprofit.amount",
                "col.actions",
            ]),
        );
        display_columns.insert(
            "logPositions".to_string(),
            to_strings(&[
                "col.date.open",
                "col.type",
                "col.provider.logo",
                "col.stat",
                "col.pair",
                "col.invested",
                "col.actions",
            ]),
        );

        Self {
            dark_style: false,
            language_code: "en".to_string(),
            show_balance: true,
            display_columns,
            selected_exchange: ExchangeConnection::default(),
        }
    }
}

fn to_strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_keys() {
        assert_eq!(PageId::CopyTraders.as_str(), "copyt");
        assert_eq!(PageId::ConnectedSignalProviders.as_str(), "connectedSignalp");
        assert_eq!(PageId::ClosedPositions.as_str(), "closedPositions");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(!settings.dark_style);
        assert_eq!(settings.language_code, "en");
        assert!(settings.show_balance);
        assert!(settings.display_columns.contains_key("openPositions"));
        assert_eq!(settings.selected_exchange.internal_id, "");
    }
}
