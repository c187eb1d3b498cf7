//! Collaborators the controllers report to: notifications, error handling,
//! the busy overlay and confirmation prompts.
//!
//! Each is a small trait so embedding code can plug its own surface in; the
//! bundled implementations publish their state through `tokio::sync::watch`
//! channels that a UI layer subscribes to.

mod confirm;
mod handler;
mod messages;
mod overlay;

pub use confirm::*;
pub use handler::*;
pub use messages::*;
pub use overlay::*;

use serde::{Deserialize, Serialize};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// User-facing notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Busy indicator shown while an action is in flight.
pub trait BusyIndicator: Send + Sync {
    fn show(&self, label: Option<&str>);
    fn hide(&self);
}
