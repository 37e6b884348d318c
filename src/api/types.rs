//! Request parameter types for the trade API endpoints.

use serde::Serialize;

/// Which positions list a view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionsView {
    Open,
    Closed,
    Log,
}

impl PositionsView {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionsView::Open => "open",
            PositionsView::Closed => "closed",
            PositionsView::Log => "log",
        }
    }
}

/// Query parameters for the providers list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersParams {
    /// "all" or "connected".
    #[serde(rename = "type")]
    pub list_type: String,
    /// Read-only listing, no subscription checks server-side.
    pub ro: bool,
    pub copy_traders_only: bool,
    /// Returns window in days.
    pub time_frame: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub internal_exchange_id: String,
}

impl Default for ProvidersParams {
    fn default() -> Self {
        Self {
            list_type: "all".to_string(),
            ro: true,
            copy_traders_only: false,
            time_frame: 90,
            internal_exchange_id: String::new(),
        }
    }
}

/// Query parameters for the positions list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsParams {
    #[serde(rename = "type")]
    pub view: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub internal_exchange_id: String,
    /// Only meaningful for the closed list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_frame: Option<u32>,
}

/// Query parameters for the provider stats endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub quote: String,
    pub base: String,
    pub time_frame: String,
    #[serde(rename = "DCAFilter")]
    pub dca_filter: String,
    pub ro: bool,
}

impl Default for StatsParams {
    fn default() -> Self {
        Self {
            quote: "USDT".to_string(),
            base: "ALL".to_string(),
            time_frame: "30days".to_string(),
            dca_filter: "ANY".to_string(),
            ro: true,
        }
    }
}
