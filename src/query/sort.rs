//! Sort specifications for provider list views.

use std::cmp::Ordering;

use crate::models::Provider;

/// Sortable provider attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSortKey {
    /// Realized plus floating return.
    Returns,
    /// Creation date.
    Date,
    /// Service name, case-insensitive.
    Name,
    /// Subscription price.
    Fee,
}

impl ProviderSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSortKey::Returns => "RETURNS",
            ProviderSortKey::Date => "DATE",
            ProviderSortKey::Name => "NAME",
            ProviderSortKey::Fee => "FEE",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "RETURNS" => Some(ProviderSortKey::Returns),
            "DATE" => Some(ProviderSortKey::Date),
            "NAME" => Some(ProviderSortKey::Name),
            "FEE" => Some(ProviderSortKey::Fee),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// A sort key plus direction, encoded as "KEY_DIR" for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSort {
    pub key: ProviderSortKey,
    pub direction: SortDirection,
}

impl Default for ProviderSort {
    fn default() -> Self {
        Self {
            key: ProviderSortKey::Returns,
            direction: SortDirection::Desc,
        }
    }
}

impl ProviderSort {
    pub fn encode(&self) -> String {
        format!("{}_{}", self.key.as_str(), self.direction.as_str())
    }

    pub fn parse(encoded: &str) -> Option<Self> {
        let (key, direction) = encoded.rsplit_once('_')?;
        Some(Self {
            key: ProviderSortKey::parse(key)?,
            direction: SortDirection::parse(direction)?,
        })
    }

    pub fn compare(&self, a: &Provider, b: &Provider) -> Ordering {
        let ordering = match self.key {
            ProviderSortKey::Returns => a
                .total_returns()
                .partial_cmp(&b.total_returns())
                .unwrap_or(Ordering::Equal),
            ProviderSortKey::Date => a.created_at.cmp(&b.created_at),
            ProviderSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ProviderSortKey::Fee => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Sort in place. `sort_by` is stable, so equal entries keep their
    /// incoming order.
    pub fn apply(&self, providers: &mut [Provider]) {
        providers.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Provider {
        Provider {
            name: name.to_string(),
            ..Provider::default()
        }
    }

    #[test]
    fn test_encode_parse_round_trip() {
        let sort = ProviderSort {
            key: ProviderSortKey::Name,
            direction: SortDirection::Asc,
        };
        assert_eq!(sort.encode(), "NAME_ASC");
        assert_eq!(ProviderSort::parse("NAME_ASC"), Some(sort));
        assert_eq!(ProviderSort::parse("RETURNS_DESC"), Some(ProviderSort::default()));
        assert_eq!(ProviderSort::parse("bogus"), None);
        assert_eq!(ProviderSort::parse("NAME_SIDEWAYS"), None);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let mut providers = vec![named("Bravo"), named("alpha"), named("Charlie")];
        ProviderSort {
            key: ProviderSortKey::Name,
            direction: SortDirection::Asc,
        }
        .apply(&mut providers);
        let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Bravo", "Charlie"]);

        ProviderSort {
            key: ProviderSortKey::Name,
            direction: SortDirection::Desc,
        }
        .apply(&mut providers);
        let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Bravo", "alpha"]);
    }

    #[test]
    fn test_returns_sort_includes_floating() {
        let mut low = named("low");
        low.returns = 10.0;
        low.floating = 0.0;
        let mut high = named("high");
        high.returns = 5.0;
        high.floating = 8.0;

        let mut providers = vec![low, high];
        ProviderSort::default().apply(&mut providers);
        assert_eq!(providers[0].name, "high");
        assert_eq!(providers[1].name, "low");
    }

    #[test]
    fn test_equal_keys_preserve_incoming_order() {
        let mut first = named("first");
        first.returns = 5.0;
        let mut second = named("second");
        second.returns = 5.0;

        let mut providers = vec![first, second];
        ProviderSort::default().apply(&mut providers);
        assert_eq!(providers[0].name, "first");
        assert_eq!(providers[1].name, "second");
    }

    #[test]
    fn test_date_sort() {
        let mut old = named("old");
        old.created_at = 1_000;
        let mut new = named("new");
        new.created_at = 2_000;

        let mut providers = vec![old, new];
        ProviderSort {
            key: ProviderSortKey::Date,
            direction: SortDirection::Asc,
        }
        .apply(&mut providers);
        assert_eq!(providers[0].name, "old");
    }
}
