//! Declarative filter values and per-entity filter sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Position, Provider};

/// A single filter selection. `All` places no constraint on the field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Build a selection from a user-facing value; "ALL" is the
    /// no-constraint sentinel.
    pub fn from_value(value: &str) -> Self {
        if value == "ALL" || value.is_empty() {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Selection::All => "ALL",
            Selection::Only(value) => value,
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::from_value(&value)
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        selection.as_str().to_string()
    }
}

/// Filter set for provider list views. Filters combine with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderFilters {
    pub quote: Selection,
    pub exchange: Selection,
    pub exchange_type: Selection,
    pub from_user: Selection,
}

impl ProviderFilters {
    pub fn matches(&self, provider: &Provider) -> bool {
        let quote_ok = match &self.quote {
            Selection::All => true,
            Selection::Only(quote) => provider.quote == *quote,
        };
        let exchange_ok = match &self.exchange {
            Selection::All => true,
            Selection::Only(exchange) => provider
                .exchanges
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(exchange)),
        };
        let exchange_type_ok = match &self.exchange_type {
            Selection::All => true,
            Selection::Only(exchange_type) => {
                provider.exchange_type.eq_ignore_ascii_case(exchange_type)
            }
        };
        let from_user_ok = self.from_user.is_all() || provider.is_from_user;

        quote_ok && exchange_ok && exchange_type_ok && from_user_ok
    }

    /// Number of filters with an active constraint.
    pub fn active_count(&self) -> usize {
        [
            &self.quote,
            &self.exchange,
            &self.exchange_type,
            &self.from_user,
        ]
        .iter()
        .filter(|selection| !selection.is_all())
        .count()
    }

    /// Restore from a persisted filter map; unknown keys are ignored and
    /// missing keys fall back to `All`.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map.clone())).unwrap_or_default()
    }

    /// Render to the persistence map format.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Filter set for position list views.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionFilters {
    pub provider: Selection,
    pub pair: Selection,
    pub side: Selection,
    #[serde(rename = "type")]
    pub position_type: Selection,
}

impl PositionFilters {
    pub fn matches(&self, position: &Position) -> bool {
        let provider_ok = match &self.provider {
            Selection::All => true,
            Selection::Only(provider) => {
                position.provider_id == *provider
                    || position.provider_name.eq_ignore_ascii_case(provider)
            }
        };
        let pair_ok = match &self.pair {
            Selection::All => true,
            Selection::Only(pair) => position.pair.eq_ignore_ascii_case(pair),
        };
        let side_ok = match &self.side {
            Selection::All => true,
            Selection::Only(side) => position.side.as_str().eq_ignore_ascii_case(side),
        };
        let type_ok = match &self.position_type {
            Selection::All => true,
            Selection::Only(position_type) => {
                position.position_type.eq_ignore_ascii_case(position_type)
            }
        };

        provider_ok && pair_ok && side_ok && type_ok
    }

    pub fn active_count(&self) -> usize {
        [
            &self.provider,
            &self.pair,
            &self.side,
            &self.position_type,
        ]
        .iter()
        .filter(|selection| !selection.is_all())
        .count()
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map.clone())).unwrap_or_default()
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
