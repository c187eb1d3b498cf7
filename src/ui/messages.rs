//! Notification board.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use super::{Notifier, Severity};

/// How long info and warning messages stay on the board.
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub severity: Severity,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered list of user messages.
///
/// Errors stay until removed; info and warning messages are dismissed after
/// [`AUTO_DISMISS_AFTER`] when a tokio runtime is available to time them.
#[derive(Clone)]
pub struct MessageBoard {
    messages: Arc<watch::Sender<Vec<Message>>>,
    auto_dismiss: Option<Duration>,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::with_auto_dismiss(Some(AUTO_DISMISS_AFTER))
    }

    /// Board with a custom dismissal delay; `None` keeps every message.
    pub fn with_auto_dismiss(auto_dismiss: Option<Duration>) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            messages: Arc::new(tx),
            auto_dismiss,
        }
    }

    /// Add a message and return its id.
    pub fn add(&self, severity: Severity, text: &str) -> Uuid {
        let message = Message {
            id: Uuid::new_v4(),
            severity,
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        let id = message.id;

        match severity {
            Severity::Error => tracing::error!("{}", text),
            Severity::Warning => tracing::warn!("{}", text),
            Severity::Info => tracing::info!("{}", text),
        }

        self.messages.send_modify(|messages| messages.push(message));

        if severity != Severity::Error {
            self.schedule_dismiss(id);
        }
        id
    }

    fn schedule_dismiss(&self, id: Uuid) {
        let Some(delay) = self.auto_dismiss else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let messages = Arc::clone(&self.messages);
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            messages.send_if_modified(|list| remove_by_id(list, id));
        });
    }

    /// Remove a message. Returns whether it was present.
    pub fn remove(&self, id: Uuid) -> bool {
        self.messages.send_if_modified(|list| remove_by_id(list, id))
    }

    pub fn clear_all(&self) {
        self.messages.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    /// Texts of the current messages, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.messages.borrow().iter().map(|m| m.text.clone()).collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.messages.subscribe()
    }
}

impl Notifier for MessageBoard {
    fn notify(&self, severity: Severity, message: &str) {
        self.add(severity, message);
    }
}

fn remove_by_id(list: &mut Vec<Message>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|m| m.id != id);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let board = MessageBoard::with_auto_dismiss(None);
        let id = board.add(Severity::Info, "Project created successfully.");
        board.add(Severity::Error, "Failed to save project.");

        assert_eq!(board.messages().len(), 2);
        assert!(board.remove(id));
        assert!(!board.remove(id));
        assert_eq!(board.texts(), vec!["Failed to save project."]);

        board.clear_all();
        assert!(board.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_info_auto_dismisses_but_errors_stay() {
        let board = MessageBoard::new();
        board.add(Severity::Info, "saved");
        board.add(Severity::Warning, "careful");
        board.add(Severity::Error, "broken");

        tokio::time::sleep(AUTO_DISMISS_AFTER + Duration::from_millis(10)).await;
        // Let the dismiss tasks run
        tokio::task::yield_now().await;

        assert_eq!(board.texts(), vec!["broken"]);
    }

    #[tokio::test]
    async fn test_subscribers_see_new_messages() {
        let board = MessageBoard::with_auto_dismiss(None);
        let mut rx = board.subscribe();
        board.add(Severity::Info, "hello");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
