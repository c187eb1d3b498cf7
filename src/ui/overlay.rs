//! Global busy overlay.

use std::sync::Arc;

use tokio::sync::watch;

use super::BusyIndicator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
    pub label: Option<String>,
    /// While disabled, `show` requests are ignored.
    pub disabled: bool,
}

/// Blocking overlay shown while a controller action runs.
#[derive(Clone, Default)]
pub struct LoadingOverlay {
    state: Arc<watch::Sender<OverlayState>>,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        self.state.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn subscribe(&self) -> watch::Receiver<OverlayState> {
        self.state.subscribe()
    }

    /// Hide the overlay and ignore further `show` calls.
    pub fn disable(&self) {
        self.state.send_modify(|state| {
            state.disabled = true;
            state.visible = false;
            state.label = None;
        });
    }

    pub fn enable(&self) {
        self.state.send_modify(|state| state.disabled = false);
    }
}

impl BusyIndicator for LoadingOverlay {
    fn show(&self, label: Option<&str>) {
        self.state.send_if_modified(|state| {
            if state.disabled {
                return false;
            }
            state.visible = true;
            state.label = label.map(str::to_string);
            true
        });
    }

    fn hide(&self) {
        self.state.send_modify(|state| {
            state.visible = false;
            state.label = None;
        });
    }
}
