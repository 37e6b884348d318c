//! SQLite-backed view-state store.
//!
//! Holds per-page query preferences and app settings, loaded once at open
//! and written back through typed accessors. Writes are whole-value
//! replacements (last writer wins) and are skipped when the value is
//! unchanged.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use crate::models::ExchangeConnection;

use super::state::{PageId, Settings, ViewPrefs};

const DARK_STYLE: &str = "darkStyle";
const LANGUAGE_CODE: &str = "languageCode";
const SHOW_BALANCE: &str = "showBalance";
const DISPLAY_COLUMNS: &str = "displayColumns";
const SELECTED_EXCHANGE: &str = "selectedExchange";

/// Persistent container for view query state and user settings.
pub struct ViewStore {
    pool: SqlitePool,
    settings: Settings,
    prefs: HashMap<String, ViewPrefs>,
}

impl ViewStore {
    /// Open (or create) the store at the given SQLite URL.
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .context("Failed to open view-state store")?;

        Self::with_pool(pool).await
    }

    /// Build a store over an existing pool (used by tests).
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let mut store = Self {
            pool,
            settings: Settings::default(),
            prefs: HashMap::new(),
        };
        store.run_migrations().await?;
        store.load().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS view_prefs (
                page TEXT PRIMARY KEY,
                filters TEXT NOT NULL DEFAULT '{}',
                sort TEXT,
                time_frame INTEGER
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&mut self) -> Result<()> {
        let rows = sqlx::query("SELECT page, filters, sort, time_frame FROM view_prefs")
            .fetch_all(&self.pool)
            .await?;

        for row in rows {
            let page: String = row.get("page");
            let filters: String = row.get("filters");
            let prefs = ViewPrefs {
                filters: serde_json::from_str(&filters).unwrap_or_default(),
                sort: row.get("sort"),
                time_frame: row.get::<Option<i64>, _>("time_frame").map(|tf| tf as u32),
            };
            self.prefs.insert(page, prefs);
        }

        let rows = sqlx::query("SELECT key, value FROM app_settings")
            .fetch_all(&self.pool)
            .await?;

        for row in rows {
            let key: String = row.get("key");
            let value: String = row.get("value");
            match key.as_str() {
                DARK_STYLE => self.settings.dark_style = value == "true",
                LANGUAGE_CODE => self.settings.language_code = value,
                SHOW_BALANCE => self.settings.show_balance = value == "true",
                DISPLAY_COLUMNS => {
                    if let Ok(columns) = serde_json::from_str(&value) {
                        self.settings.display_columns = columns;
                    }
                }
                SELECTED_EXCHANGE => {
                    if let Ok(connection) = serde_json::from_str(&value) {
                        self.settings.selected_exchange = connection;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    // === Settings ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn set_dark_style(&mut self, dark_style: bool) -> Result<()> {
        if self.settings.dark_style == dark_style {
            return Ok(());
        }
        self.settings.dark_style = dark_style;
        self.put_setting(DARK_STYLE, dark_style.to_string()).await
    }

    pub async fn set_language(&mut self, language_code: &str) -> Result<()> {
        if self.settings.language_code == language_code {
            return Ok(());
        }
        self.settings.language_code = language_code.to_string();
        self.put_setting(LANGUAGE_CODE, language_code.to_string())
            .await
    }

    pub async fn set_show_balance(&mut self, show_balance: bool) -> Result<()> {
        if self.settings.show_balance == show_balance {
            return Ok(());
        }
        self.settings.show_balance = show_balance;
        self.put_setting(SHOW_BALANCE, show_balance.to_string())
            .await
    }

    pub async fn set_display_columns(&mut self, table: &str, columns: Vec<String>) -> Result<()> {
        if self.settings.display_columns.get(table) == Some(&columns) {
            return Ok(());
        }
        self.settings
            .display_columns
            .insert(table.to_string(), columns);
        let serialized = serde_json::to_string(&self.settings.display_columns)?;
        self.put_setting(DISPLAY_COLUMNS, serialized).await
    }

    pub async fn set_selected_exchange(&mut self, connection: ExchangeConnection) -> Result<()> {
        if self.settings.selected_exchange == connection {
            return Ok(());
        }
        self.settings.selected_exchange = connection;
        let serialized = serde_json::to_string(&self.settings.selected_exchange)?;
        self.put_setting(SELECTED_EXCHANGE, serialized).await
    }

    pub async fn unset_selected_exchange(&mut self) -> Result<()> {
        self.set_selected_exchange(ExchangeConnection::default())
            .await
    }

    async fn put_setting(&self, key: &str, value: String) -> Result<()> {
        sqlx::query(
            "INSERT INTO app_settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === View preferences ===

    pub fn view_prefs(&self, page: PageId) -> Option<&ViewPrefs> {
        self.prefs.get(page.as_str())
    }

    /// Persist the last-used sort for a page.
    pub async fn set_page_sort(&mut self, page: PageId, sort: &str) -> Result<()> {
        let prefs = self.prefs.entry(page.as_str().to_string()).or_default();
        if prefs.sort.as_deref() == Some(sort) {
            return Ok(());
        }
        prefs.sort = Some(sort.to_string());
        self.persist_prefs(page).await
    }

    /// Persist the last-used time window for a page.
    pub async fn set_page_time_frame(&mut self, page: PageId, time_frame: u32) -> Result<()> {
        let prefs = self.prefs.entry(page.as_str().to_string()).or_default();
        if prefs.time_frame == Some(time_frame) {
            return Ok(());
        }
        prefs.time_frame = Some(time_frame);
        self.persist_prefs(page).await
    }

    /// Shallow-merge filters into the page's stored filters; keys absent
    /// from `filters` keep their previous values.
    pub async fn merge_page_filters(
        &mut self,
        page: PageId,
        filters: &Map<String, Value>,
    ) -> Result<()> {
        let prefs = self.prefs.entry(page.as_str().to_string()).or_default();
        let mut merged = prefs.filters.clone();
        for (key, value) in filters {
            merged.insert(key.clone(), value.clone());
        }
        if merged == prefs.filters {
            return Ok(());
        }
        prefs.filters = merged;
        self.persist_prefs(page).await
    }

    async fn persist_prefs(&self, page: PageId) -> Result<()> {
        let prefs = self
            .prefs
            .get(page.as_str())
            .cloned()
            .unwrap_or_default();
        let filters = serde_json::to_string(&prefs.filters)?;

        sqlx::query(
            "INSERT INTO view_prefs (page, filters, sort, time_frame) VALUES (?, ?, ?, ?)
             ON CONFLICT(page) DO UPDATE SET
                 filters = excluded.filters,
                 sort = excluded.sort,
                 time_frame = excluded.time_frame",
        )
        .bind(page.as_str())
        .bind(filters)
        .bind(&prefs.sort)
        .bind(prefs.time_frame.map(|tf| tf as i64))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_view_prefs_round_trip() {
        let pool = memory_pool().await;
        let mut store = ViewStore::with_pool(pool.clone()).await.unwrap();

        store
            .set_page_sort(PageId::CopyTraders, "NAME_ASC")
            .await
            .unwrap();
        store
            .set_page_time_frame(PageId::CopyTraders, 30)
            .await
            .unwrap();

        let restored = ViewStore::with_pool(pool).await.unwrap();
        let prefs = restored.view_prefs(PageId::CopyTraders).unwrap();
        assert_eq!(prefs.sort.as_deref(), Some("NAME_ASC"));
        assert_eq!(prefs.time_frame, Some(30));
    }

    #[tokio::test]
    async fn test_filter_merge_preserves_unrelated_keys() {
        let pool = memory_pool().await;
        let mut store = ViewStore::with_pool(pool.clone()).await.unwrap();

        let mut first = Map::new();
        first.insert("quote".to_string(), json!("USDT"));
        first.insert("exchange".to_string(), json!("Binance"));
        store
            .merge_page_filters(PageId::CopyTraders, &first)
            .await
            .unwrap();

        let mut second = Map::new();
        second.insert("exchange".to_string(), json!("KuCoin"));
        store
            .merge_page_filters(PageId::CopyTraders, &second)
            .await
            .unwrap();

        let restored = ViewStore::with_pool(pool).await.unwrap();
        let prefs = restored.view_prefs(PageId::CopyTraders).unwrap();
        assert_eq!(prefs.filters.get("quote"), Some(&json!("USDT")));
        assert_eq!(prefs.filters.get("exchange"), Some(&json!("KuCoin")));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let pool = memory_pool().await;
        let mut store = ViewStore::with_pool(pool.clone()).await.unwrap();

        store.set_dark_style(true).await.unwrap();
        store.set_language("de").await.unwrap();
        store.set_show_balance(false).await.unwrap();

        let mut connection = ExchangeConnection::default();
        connection.internal_id = "int-1".to_string();
        connection.exchange_name = "Binance".to_string();
        store.set_selected_exchange(connection).await.unwrap();

        let restored = ViewStore::with_pool(pool).await.unwrap();
        assert!(restored.settings().dark_style);
        assert_eq!(restored.settings().language_code, "de");
        assert!(!restored.settings().show_balance);
        assert_eq!(restored.settings().selected_exchange.internal_id, "int-1");
    }

    #[tokio::test]
    async fn test_unchanged_writes_are_skipped() {
        let pool = memory_pool().await;
        let mut store = ViewStore::with_pool(pool.clone()).await.unwrap();

        store
            .set_page_sort(PageId::SignalProviders, "RETURNS_DESC")
            .await
            .unwrap();

        // Clear the table behind the store's back; an identical set must
        // be skipped and leave the table empty.
        sqlx::query("DELETE FROM view_prefs")
            .execute(&pool)
            .await
            .unwrap();
        store
            .set_page_sort(PageId::SignalProviders, "RETURNS_DESC")
            .await
            .unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM view_prefs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
