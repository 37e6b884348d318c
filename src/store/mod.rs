//! View-state persistence and transient UI state.

mod state;
mod ui;
mod view_store;

pub use state::{PageId, Settings, ViewPrefs};
pub use ui::{AlertMessage, Alerts, Modals, UiState};
pub use view_store::ViewStore;
