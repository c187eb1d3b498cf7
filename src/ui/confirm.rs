//! Confirmation prompts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

/// Answer to a confirmation prompt.
///
/// The delete prompt answers `Delete` or `Cancel`; the cancel-changes prompt
/// answers `Leave` or `Stay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Delete,
    Cancel,
    Leave,
    Stay,
}

/// A yes/no style question put to the user.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> ConfirmOutcome;
}

/// Answers prompts from a queue, falling back to a fixed outcome once it is empty.
///
/// Every prompt is recorded so callers can inspect what was asked.
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<ConfirmOutcome>>,
    fallback: ConfirmOutcome,
    asked: Mutex<Vec<(String, String)>>,
}

impl ScriptedConfirm {
    pub fn new(fallback: ConfirmOutcome) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            fallback,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `outcome`.
    pub fn always(outcome: ConfirmOutcome) -> Self {
        Self::new(outcome)
    }

    pub fn push(&self, outcome: ConfirmOutcome) {
        self.answers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    /// `(title, message)` of every prompt so far.
    pub fn asked(&self) -> Vec<(String, String)> {
        self.asked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, title: &str, message: &str) -> ConfirmOutcome {
        self.asked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((title.to_string(), message.to_string()));
        self.answers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

/// A prompt waiting for an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrompt {
    pub id: u64,
    pub title: String,
    pub message: String,
}

/// Confirmation dialog driven by a UI layer.
///
/// `confirm` publishes the prompt and waits until [`ConfirmDialog::resolve`]
/// is called. A newer prompt dismisses an unanswered one.
pub struct ConfirmDialog {
    prompt: watch::Sender<Option<PendingPrompt>>,
    responder: Mutex<Option<oneshot::Sender<ConfirmOutcome>>>,
    dismissed: ConfirmOutcome,
    next_id: AtomicU64,
}

impl ConfirmDialog {
    /// `dismissed` is the answer given when a prompt is replaced or dropped.
    pub fn new(dismissed: ConfirmOutcome) -> Self {
        let (prompt, _rx) = watch::channel(None);
        Self {
            prompt,
            responder: Mutex::new(None),
            dismissed,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn pending(&self) -> Option<PendingPrompt> {
        self.prompt.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PendingPrompt>> {
        self.prompt.subscribe()
    }

    /// Answer the open prompt. Returns false when nothing is waiting.
    pub fn resolve(&self, outcome: ConfirmOutcome) -> bool {
        let responder = self
            .responder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match responder {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

/// Withdraws prompt `id` when its `confirm` call ends, answered or dropped.
struct PromptGuard<'a> {
    dialog: &'a ConfirmDialog,
    id: u64,
}

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        let id = self.id;
        self.dialog.prompt.send_if_modified(|prompt| {
            if prompt.as_ref().is_some_and(|p| p.id == id) {
                *prompt = None;
                true
            } else {
                false
            }
        });

        let mut responder = self
            .dialog
            .responder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if responder.as_ref().is_some_and(|tx| tx.is_closed()) {
            *responder = None;
        }
    }
}

#[async_trait]
impl Confirm for ConfirmDialog {
    async fn confirm(&self, title: &str, message: &str) -> ConfirmOutcome {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Declared before the receiver so it runs after the receiver is gone
        let _guard = PromptGuard { dialog: self, id };
        let (tx, rx) = oneshot::channel();

        let previous = self
            .responder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(tx);
        if let Some(previous) = previous {
            let _ = previous.send(self.dismissed);
        }

        self.prompt.send_replace(Some(PendingPrompt {
            id,
            title: title.to_string(),
            message: message.to_string(),
        }));

        rx.await.unwrap_or(self.dismissed)
    }
}
