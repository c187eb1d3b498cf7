//! Central error handling for store actions.

use std::sync::{Arc, Mutex};

use crate::auth::AuthState;
use crate::errors::{ClientError, FieldError};

use super::{Notifier, Severity};

/// Receives every error a store action raises, with a context label naming the action.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, error: &ClientError, context: &str);
}

/// An error as it was reported to the handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandledError {
    pub error: ClientError,
    pub context: String,
}

/// Logs each error and keeps it until cleared, forgets the persisted token on
/// authentication failures and optionally shows the error to the user.
#[derive(Default)]
pub struct TracingErrorHandler {
    auth: Option<AuthState>,
    notifier: Option<Arc<dyn Notifier>>,
    handled: Mutex<Vec<HandledError>>,
}

impl TracingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth(mut self, auth: AuthState) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Errors handled since the last `clear`, oldest first.
    pub fn errors(&self) -> Vec<HandledError> {
        self.handled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last_error(&self) -> Option<HandledError> {
        self.handled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }

    /// Field messages of the most recent validation failure.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self.last_error().map(|handled| handled.error) {
            Some(ClientError::Validation { fields, .. }) => fields,
            _ => Vec::new(),
        }
    }

    pub fn clear(&self) {
        self.handled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl ErrorHandler for TracingErrorHandler {
    fn handle_error(&self, error: &ClientError, context: &str) {
        tracing::error!(
            code = error.error_code(),
            status = ?error.status(),
            "{}: {}",
            context,
            error.message()
        );

        if error.is_auth_failure() {
            if let Some(auth) = &self.auth {
                if let Err(e) = auth.logout() {
                    tracing::warn!("Failed to clear auth token: {}", e);
                }
            }
        }

        if let Some(notifier) = &self.notifier {
            notifier.notify(Severity::Error, &error.message());
        }

        self.handled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(HandledError {
                error: error.clone(),
                context: context.to_string(),
            });
    }
}
