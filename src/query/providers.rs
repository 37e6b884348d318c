//! Providers list query engine.
//!
//! Owns the fetched provider collection plus the user-adjustable filter,
//! sort, and time-window state, and exposes the currently visible,
//! ordered subset. Query state is restored from the view-state store on
//! construction and written back on change.

use std::collections::HashSet;

use anyhow::Result;
use tracing::warn;

use crate::api::{ProvidersParams, TradeApiClient};
use crate::models::Provider;
use crate::store::{PageId, UiState, ViewStore};

use super::filters::ProviderFilters;
use super::sort::ProviderSort;
use super::LoadState;

/// Options for a providers list view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvidersOptions {
    /// Copy-trading services only, as opposed to signal providers.
    pub copy_traders_only: bool,
    /// Restrict to services the account is connected to. Connected views
    /// have no filter panel and do not persist their sort.
    pub connected_only: bool,
}

const DEFAULT_TIME_FRAME: u32 = 90;

pub struct ProvidersQuery {
    options: ProvidersOptions,
    page: PageId,
    filters: ProviderFilters,
    sort: ProviderSort,
    time_frame: u32,
    state: LoadState,
    list: Vec<Provider>,
    filtered: Vec<Provider>,
}

impl ProvidersQuery {
    /// Create an engine for the given view, restoring the filters, sort,
    /// and time window last used on its page.
    pub fn restore(options: ProvidersOptions, store: &ViewStore) -> Self {
        let page = page_for(options);
        let prefs = store.view_prefs(page);

        let filters = if options.connected_only {
            ProviderFilters::default()
        } else {
            prefs
                .map(|prefs| ProviderFilters::from_map(&prefs.filters))
                .unwrap_or_default()
        };
        let sort = if options.connected_only {
            ProviderSort::default()
        } else {
            prefs
                .and_then(|prefs| prefs.sort.as_deref().and_then(ProviderSort::parse))
                .unwrap_or_default()
        };
        let time_frame = prefs
            .and_then(|prefs| prefs.time_frame)
            .unwrap_or(DEFAULT_TIME_FRAME);

        Self {
            options,
            page,
            filters,
            sort,
            time_frame,
            state: LoadState::Uninitialized,
            list: Vec::new(),
            filtered: Vec::new(),
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The currently visible, filtered and sorted collection.
    pub fn providers(&self) -> &[Provider] {
        &self.filtered
    }

    pub fn filters(&self) -> &ProviderFilters {
        &self.filters
    }

    pub fn sort(&self) -> ProviderSort {
        self.sort
    }

    pub fn time_frame(&self) -> u32 {
        self.time_frame
    }

    /// Number of filters with an active constraint.
    pub fn modified_filters(&self) -> usize {
        self.filters.active_count()
    }

    /// Fetch the collection and re-derive the visible list. A failed
    /// fetch raises an error alert and leaves the previous collection
    /// (and state) in place.
    pub async fn refresh(&mut self, client: &TradeApiClient, store: &ViewStore, ui: &mut UiState) {
        let previous = self.state;
        self.state = LoadState::Loading;

        let params = ProvidersParams {
            list_type: if self.options.connected_only {
                "connected".to_string()
            } else {
                "all".to_string()
            },
            ro: true,
            copy_traders_only: self.options.copy_traders_only,
            time_frame: self.time_frame,
            internal_exchange_id: store.settings().selected_exchange.internal_id.clone(),
        };

        match client.providers(&params).await {
            Ok(list) => {
                self.list = dedup_by_id(list);
                self.derive();
                self.state = LoadState::Ready;
            }
            Err(error) => {
                warn!(error = %error, "Providers fetch failed");
                ui.show_error_alert("Error", error.to_string());
                self.state = previous;
            }
        }
    }

    /// Change the returns window. Persists the new value and marks the
    /// collection stale; the caller refreshes to refetch.
    pub async fn set_time_frame(&mut self, time_frame: u32, store: &mut ViewStore) -> Result<()> {
        self.time_frame = time_frame;
        if self.state == LoadState::Ready {
            self.state = LoadState::Loading;
        }
        store.set_page_time_frame(self.page, time_frame).await
    }

    /// Change the sort. Re-derives synchronously (no refetch) and
    /// persists the setting, except for connected views.
    pub async fn set_sort(&mut self, sort: ProviderSort, store: &mut ViewStore) -> Result<()> {
        self.sort = sort;
        self.derive();
        if !self.options.connected_only {
            store.set_page_sort(self.page, &sort.encode()).await?;
        }
        Ok(())
    }

    pub async fn clear_sort(&mut self, store: &mut ViewStore) -> Result<()> {
        self.set_sort(ProviderSort::default(), store).await
    }

    /// Replace the filter set. Re-derives synchronously and merges the
    /// new values into the filters stored for this page.
    pub async fn set_filters(
        &mut self,
        filters: ProviderFilters,
        store: &mut ViewStore,
    ) -> Result<()> {
        self.filters = filters;
        self.derive();
        store
            .merge_page_filters(self.page, &self.filters.to_map())
            .await
    }

    /// Reset filters to their defaults without touching the store; the
    /// next explicit filter change persists as usual.
    pub fn clear_filters(&mut self) {
        self.filters = ProviderFilters::default();
        self.derive();
    }

    fn derive(&mut self) {
        let mut visible: Vec<Provider> = self
            .list
            .iter()
            .filter(|provider| self.filters.matches(provider))
            .cloned()
            .collect();
        self.sort.apply(&mut visible);
        self.filtered = visible;
    }
}

fn page_for(options: ProvidersOptions) -> PageId {
    match (options.connected_only, options.copy_traders_only) {
        (true, true) => PageId::ConnectedCopyTraders,
        (true, false) => PageId::ConnectedSignalProviders,
        (false, true) => PageId::CopyTraders,
        (false, false) => PageId::SignalProviders,
    }
}

/// Drop records with duplicate ids, keeping the first occurrence.
fn dedup_by_id(list: Vec<Provider>) -> Vec<Provider> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|provider| seen.insert(provider.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filters::Selection;
    use crate::query::sort::{ProviderSortKey, SortDirection};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> ViewStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ViewStore::with_pool(pool).await.unwrap()
    }

    fn provider(id: &str, name: &str, quote: &str) -> Provider {
        Provider {
            id: id.to_string(),
            name: name.to_string(),
            quote: quote.to_string(),
            ..Provider::default()
        }
    }

    #[test]
    fn test_page_for_options() {
        assert_eq!(
            page_for(ProvidersOptions {
                copy_traders_only: true,
                connected_only: false,
            }),
            PageId::CopyTraders
        );
        assert_eq!(
            page_for(ProvidersOptions {
                copy_traders_only: false,
                connected_only: true,
            }),
            PageId::ConnectedSignalProviders
        );
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut first = provider("a", "first", "USDT");
        first.followers = 10;
        let mut duplicate = provider("a", "duplicate", "USDT");
        duplicate.followers = 99;
        let other = provider("b", "other", "BTC");

        let deduped = dedup_by_id(vec![first, duplicate, other]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "first");
        assert_eq!(deduped[0].followers, 10);
    }

    #[tokio::test]
    async fn test_restore_defaults_without_prefs() {
        let store = memory_store().await;
        let engine = ProvidersQuery::restore(ProvidersOptions::default(), &store);
        assert_eq!(engine.page(), PageId::SignalProviders);
        assert_eq!(engine.state(), LoadState::Uninitialized);
        assert_eq!(engine.sort(), ProviderSort::default());
        assert_eq!(engine.time_frame(), DEFAULT_TIME_FRAME);
        assert_eq!(engine.modified_filters(), 0);
    }

    #[tokio::test]
    async fn test_sort_and_time_frame_round_trip_through_store() {
        let mut store = memory_store().await;
        let options = ProvidersOptions {
            copy_traders_only: true,
            connected_only: false,
        };

        let mut engine = ProvidersQuery::restore(options, &store);
        engine
            .set_sort(
                ProviderSort {
                    key: ProviderSortKey::Name,
                    direction: SortDirection::Asc,
                },
                &mut store,
            )
            .await
            .unwrap();
        engine.set_time_frame(30, &mut store).await.unwrap();

        let restored = ProvidersQuery::restore(options, &store);
        assert_eq!(restored.sort().encode(), "NAME_ASC");
        assert_eq!(restored.time_frame(), 30);
    }

    #[tokio::test]
    async fn test_connected_views_do_not_persist_sort() {
        let mut store = memory_store().await;
        let options = ProvidersOptions {
            copy_traders_only: true,
            connected_only: true,
        };

        let mut engine = ProvidersQuery::restore(options, &store);
        engine
            .set_sort(
                ProviderSort {
                    key: ProviderSortKey::Fee,
                    direction: SortDirection::Asc,
                },
                &mut store,
            )
            .await
            .unwrap();

        assert!(store.view_prefs(PageId::ConnectedCopyTraders).is_none());
    }

    #[tokio::test]
    async fn test_all_filters_keep_full_collection_in_sorted_order() {
        let mut store = memory_store().await;
        let mut engine = ProvidersQuery::restore(ProvidersOptions::default(), &store);

        engine.list = vec![
            provider("a", "Bravo", "USDT"),
            provider("b", "alpha", "BTC"),
            provider("c", "Charlie", "ETH"),
        ];
        engine
            .set_sort(
                ProviderSort {
                    key: ProviderSortKey::Name,
                    direction: SortDirection::Asc,
                },
                &mut store,
            )
            .await
            .unwrap();

        let names: Vec<&str> = engine.providers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Bravo", "Charlie"]);

        // All filters at "ALL": the full collection stays visible.
        engine
            .set_filters(ProviderFilters::default(), &mut store)
            .await
            .unwrap();
        assert_eq!(engine.providers().len(), 3);
    }

    #[tokio::test]
    async fn test_filter_change_re_derives_without_refetch() {
        let mut store = memory_store().await;
        let mut engine = ProvidersQuery::restore(ProvidersOptions::default(), &store);
        engine.list = vec![
            provider("a", "Alpha", "USDT"),
            provider("b", "Beta", "BTC"),
        ];
        engine.state = LoadState::Ready;

        engine
            .set_filters(
                ProviderFilters {
                    quote: Selection::from_value("USDT"),
                    ..ProviderFilters::default()
                },
                &mut store,
            )
            .await
            .unwrap();

        assert_eq!(engine.state(), LoadState::Ready);
        assert_eq!(engine.providers().len(), 1);
        assert_eq!(engine.providers()[0].name, "Alpha");
        assert_eq!(engine.modified_filters(), 1);

        engine.clear_filters();
        assert_eq!(engine.providers().len(), 2);
    }

    #[tokio::test]
    async fn test_time_frame_change_marks_collection_stale() {
        let mut store = memory_store().await;
        let mut engine = ProvidersQuery::restore(ProvidersOptions::default(), &store);
        engine.state = LoadState::Ready;

        engine.set_time_frame(7, &mut store).await.unwrap();
        assert_eq!(engine.state(), LoadState::Loading);
    }
}
