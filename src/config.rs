//! Application configuration.

use serde::{Deserialize, Serialize};

/// Runtime configuration for the dashboard client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trade API base URL.
    pub api_url: String,

    /// Access token sent as a bearer header on every request.
    pub token: String,

    /// SQLite URL for the view-state store.
    pub database_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.copydash.trade".to_string(),
            token: String::new(),
            database_url: "sqlite:./copydash.db?mode=rwc".to_string(),
        }
    }
}
