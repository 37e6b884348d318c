//! Positions list query engine.
//!
//! Same skeleton as the providers engine: an owned collection plus
//! view query state, filtered and ordered synchronously on change. The
//! closed view refetches when its time window changes; ordering is fixed
//! to newest-opened first.

use std::collections::HashSet;

use anyhow::Result;
use tracing::warn;

use crate::api::{PositionsParams, PositionsView, TradeApiClient};
use crate::models::Position;
use crate::store::{PageId, UiState, ViewStore};

use super::filters::PositionFilters;
use super::LoadState;

const DEFAULT_TIME_FRAME: u32 = 90;

pub struct PositionsQuery {
    view: PositionsView,
    page: PageId,
    filters: PositionFilters,
    time_frame: u32,
    state: LoadState,
    list: Vec<Position>,
    filtered: Vec<Position>,
}

impl PositionsQuery {
    /// Create an engine for the given positions view, restoring the
    /// filters and time window last used on its page.
    pub fn restore(view: PositionsView, store: &ViewStore) -> Self {
        let page = page_for(view);
        let prefs = store.view_prefs(page);

        let filters = prefs
            .map(|prefs| PositionFilters::from_map(&prefs.filters))
            .unwrap_or_default();
        let time_frame = prefs
            .and_then(|prefs| prefs.time_frame)
            .unwrap_or(DEFAULT_TIME_FRAME);

        Self {
            view,
            page,
            filters,
            time_frame,
            state: LoadState::Uninitialized,
            list: Vec::new(),
            filtered: Vec::new(),
        }
    }

    pub fn view(&self) -> PositionsView {
        self.view
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The currently visible, filtered collection, newest first.
    pub fn positions(&self) -> &[Position] {
        &self.filtered
    }

    pub fn filters(&self) -> &PositionFilters {
        &self.filters
    }

    pub fn time_frame(&self) -> u32 {
        self.time_frame
    }

    pub fn modified_filters(&self) -> usize {
        self.filters.active_count()
    }

    /// Fetch the collection and re-derive the visible list. A failed
    /// fetch raises an error alert and leaves the previous collection in
    /// place.
    pub async fn refresh(&mut self, client: &TradeApiClient, store: &ViewStore, ui: &mut UiState) {
        let previous = self.state;
        self.state = LoadState::Loading;

        let params = PositionsParams {
            view: self.view.as_str().to_string(),
            internal_exchange_id: store.settings().selected_exchange.internal_id.clone(),
            time_frame: (self.view == PositionsView::Closed).then_some(self.time_frame),
        };

        match client.positions(&params).await {
            Ok(list) => {
                self.list = dedup_by_position_id(list);
                self.derive();
                self.state = LoadState::Ready;
            }
            Err(error) => {
                warn!(error = %error, "Positions fetch failed");
                ui.show_error_alert("Error", error.to_string());
                self.state = previous;
            }
        }
    }

    /// Change the history window of the closed view. Persists the new
    /// value and marks the collection stale for the caller to refetch.
    pub async fn set_time_frame(&mut self, time_frame: u32, store: &mut ViewStore) -> Result<()> {
        self.time_frame = time_frame;
        if self.state == LoadState::Ready {
            self.state = LoadState::Loading;
        }
        store.set_page_time_frame(self.page, time_frame).await
    }

    /// Replace the filter set. Re-derives synchronously and merges the
    /// new values into the filters stored for this page.
    pub async fn set_filters(
        &mut self,
        filters: PositionFilters,
        store: &mut ViewStore,
    ) -> Result<()> {
        self.filters = filters;
        self.derive();
        store
            .merge_page_filters(self.page, &self.filters.to_map())
            .await
    }

    pub fn clear_filters(&mut self) {
        self.filters = PositionFilters::default();
        self.derive();
    }

    fn derive(&mut self) {
        let mut visible: Vec<Position> = self
            .list
            .iter()
            .filter(|position| self.filters.matches(position))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.open_date.cmp(&a.open_date));
        self.filtered = visible;
    }
}

fn page_for(view: PositionsView) -> PageId {
    match view {
        PositionsView::Open => PageId::OpenPositions,
        PositionsView::Closed => PageId::ClosedPositions,
        PositionsView::Log => PageId::LogPositions,
    }
}

/// Drop records with duplicate position ids, keeping the first
/// occurrence.
fn dedup_by_position_id(list: Vec<Position>) -> Vec<Position> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|position| seen.insert(position.position_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filters::Selection;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> ViewStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ViewStore::with_pool(pool).await.unwrap()
    }

    fn position(id: &str, pair: &str, open_date: i64) -> Position {
        Position {
            position_id: id.to_string(),
            pair: pair.to_string(),
            open_date,
            ..Position::default()
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let deduped = dedup_by_position_id(vec![
            position("a", "BTCUSDT", 1),
            position("a", "ETHUSDT", 2),
            position("b", "ADAUSDT", 3),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].pair, "BTCUSDT");
    }

    #[tokio::test]
    async fn test_visible_list_is_newest_first() {
        let mut store = memory_store().await;
        let mut engine = PositionsQuery::restore(PositionsView::Open, &store);
        engine.list = vec![
            position("a", "BTCUSDT", 100),
            position("b", "ETHUSDT", 300),
            position("c", "ADAUSDT", 200),
        ];
        engine
            .set_filters(PositionFilters::default(), &mut store)
            .await
            .unwrap();

        let ids: Vec<&str> = engine
            .positions()
            .iter()
            .map(|p| p.position_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_pair_filter_narrows_collection() {
        let mut store = memory_store().await;
        let mut engine = PositionsQuery::restore(PositionsView::Open, &store);
        engine.list = vec![
            position("a", "BTCUSDT", 1),
            position("b", "ETHUSDT", 2),
        ];
        engine
            .set_filters(
                PositionFilters {
                    pair: Selection::from_value("ethusdt"),
                    ..PositionFilters::default()
                },
                &mut store,
            )
            .await
            .unwrap();

        assert_eq!(engine.positions().len(), 1);
        assert_eq!(engine.positions()[0].position_id, "b");
    }

    #[tokio::test]
    async fn test_closed_view_time_frame_round_trip() {
        let mut store = memory_store().await;
        let mut engine = PositionsQuery::restore(PositionsView::Closed, &store);
        engine.set_time_frame(7, &mut store).await.unwrap();

        let restored = PositionsQuery::restore(PositionsView::Closed, &store);
        assert_eq!(restored.time_frame(), 7);

        // Open view prefs are unaffected.
        let open = PositionsQuery::restore(PositionsView::Open, &store);
        assert_eq!(open.time_frame(), DEFAULT_TIME_FRAME);
    }
}
