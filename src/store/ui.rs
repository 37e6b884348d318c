//! Transient UI state: alerts, loader, and modal flags.
//!
//! Not persisted; consumers receive a mutable reference explicitly
//! instead of reaching for ambient global state.

/// A dismissible notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertMessage {
    pub open: bool,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alerts {
    pub error: AlertMessage,
    pub success: AlertMessage,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modals {
    pub exchange_connection_view: bool,
    pub settings_view: bool,
}

/// Per-session UI state for the dashboard shell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub alerts: Alerts,
    pub modals: Modals,
    pub loader: bool,
}

impl UiState {
    /// Show an error alert, replacing any previous one.
    pub fn show_error_alert(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.alerts.error = AlertMessage {
            open: true,
            title: title.into(),
            body: body.into(),
        };
    }

    pub fn hide_error_alert(&mut self) {
        self.alerts.error = AlertMessage::default();
    }

    pub fn show_success_alert(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.alerts.success = AlertMessage {
            open: true,
            title: title.into(),
            body: body.into(),
        };
    }

    pub fn hide_success_alert(&mut self) {
        self.alerts.success = AlertMessage::default();
    }

    pub fn set_loader(&mut self, visible: bool) {
        self.loader = visible;
    }

    pub fn open_exchange_connection_view(&mut self, open: bool) {
        self.modals.exchange_connection_view = open;
    }

    pub fn open_settings_view(&mut self, open: bool) {
        self.modals.settings_view = open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_alert_replaces_previous() {
        let mut ui = UiState::default();
        ui.show_error_alert("Error", "first failure");
        ui.show_error_alert("Error", "second failure");
        assert!(ui.alerts.error.open);
        assert_eq!(ui.alerts.error.body, "second failure");

        ui.hide_error_alert();
        assert!(!ui.alerts.error.open);
        assert_eq!(ui.alerts.error.body, "");
    }

    #[test]
    fn test_success_alert_lifecycle() {
        let mut ui = UiState::default();
        ui.show_success_alert("Success", "saved");
        assert!(ui.alerts.success.open);

        ui.hide_success_alert();
        assert!(!ui.alerts.success.open);
    }

    #[test]
    fn test_loader_and_modals() {
        let mut ui = UiState::default();
        ui.set_loader(true);
        ui.open_settings_view(true);
        ui.open_exchange_connection_view(true);
        assert!(ui.loader);
        assert!(ui.modals.settings_view);
        assert!(ui.modals.exchange_connection_view);
    }
}
