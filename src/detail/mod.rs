//! View / edit / create workflow for a single resource.
//!
//! The controller owns only the draft form. Everything it persists goes
//! through the [`ResourceStore`], which stays the owner of the cached
//! collection and of the current item.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{ClientError, Result};
use crate::models::{Editable, FormDefaults, Resource, StatusField};
use crate::store::ResourceStore;
use crate::ui::{BusyIndicator, Confirm, ConfirmOutcome, Notifier, Severity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailMode {
    #[default]
    View,
    Edit,
    Create,
}

/// What a detail page was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailTarget {
    New,
    View(String),
    Edit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<R> {
    Created(R),
    Updated(R),
    /// Nothing to persist in the current mode.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub navigate_to_list: bool,
}

/// One status toggle as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCard {
    pub field: StatusField,
    pub title: &'static str,
    pub status_text: &'static str,
    pub is_active: bool,
    pub disabled: bool,
}

/// Source of the values a create form starts from.
#[async_trait]
pub trait FormDefaultsProvider: Send + Sync {
    fn form_defaults(&self) -> FormDefaults;

    /// Fetch whatever reference data the defaults are derived from.
    async fn load_defaults(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl FormDefaultsProvider for FormDefaults {
    fn form_defaults(&self) -> FormDefaults {
        self.clone()
    }
}

/// Hides the busy indicator when dropped.
struct BusyGuard(Arc<dyn BusyIndicator>);

impl BusyGuard {
    fn show(indicator: &Arc<dyn BusyIndicator>, label: Option<&str>) -> Self {
        indicator.show(label);
        Self(Arc::clone(indicator))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.hide();
    }
}

const CANCEL_TITLE: &str = "Cancel Changes";
const CANCEL_MESSAGE: &str = "You have unsaved changes. Are you sure you want to discard them?";

pub struct DetailViewController<R: Editable> {
    store: Arc<ResourceStore<R>>,
    defaults: Arc<dyn FormDefaultsProvider>,
    notifier: Arc<dyn Notifier>,
    busy: Arc<dyn BusyIndicator>,
    delete_confirm: Arc<dyn Confirm>,
    cancel_confirm: Arc<dyn Confirm>,
    mode: DetailMode,
    form: R::Form,
}

impl<R: Editable> DetailViewController<R> {
    pub fn new(
        store: Arc<ResourceStore<R>>,
        defaults: Arc<dyn FormDefaultsProvider>,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
        delete_confirm: Arc<dyn Confirm>,
        cancel_confirm: Arc<dyn Confirm>,
    ) -> Self {
        let form = R::blank_form(&defaults.form_defaults());
        Self {
            store,
            defaults,
            notifier,
            busy,
            delete_confirm,
            cancel_confirm,
            mode: DetailMode::View,
            form,
        }
    }

    pub fn mode(&self) -> DetailMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<ResourceStore<R>> {
        &self.store
    }

    pub fn current(&self) -> Option<R> {
        self.store.current()
    }

    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        &mut self.form
    }

    fn blank_form(&self) -> R::Form {
        R::blank_form(&self.defaults.form_defaults())
    }

    fn notify_info(&self, message: &str) {
        self.notifier.notify(Severity::Info, message);
    }

    fn notify_error(&self, message: &str) {
        self.notifier.notify(Severity::Error, message);
    }

    // ---- mode transitions ----

    pub fn enter_create_mode(&mut self) {
        self.mode = DetailMode::Create;
        self.form = self.blank_form();
    }

    /// Start editing the current item. Returns false when there is none.
    pub fn enter_edit_mode(&mut self) -> bool {
        let Some(current) = self.store.current() else {
            return false;
        };
        self.mode = DetailMode::Edit;
        self.form = current.to_form();
        true
    }

    /// Back to view mode. The draft is reset to create-mode defaults.
    pub fn enter_view_mode(&mut self) {
        self.mode = DetailMode::View;
        self.form = self.blank_form();
    }

    /// Whether the draft differs from its baseline.
    ///
    /// The edit baseline is projected from the current item on every call, so
    /// it follows the item if the store replaces it during editing.
    pub fn has_unsaved_changes(&self) -> bool {
        match self.mode {
            DetailMode::View => false,
            DetailMode::Create => self.form != self.blank_form(),
            DetailMode::Edit => match self.store.current() {
                Some(current) => self.form != current.to_form(),
                None => false,
            },
        }
    }

    // ---- workflows ----

    /// Persist the draft.
    ///
    /// On failure the controller stays in its mode so the user can fix the input.
    pub async fn save(&mut self) -> Result<SaveOutcome<R>> {
        let _busy = BusyGuard::show(&self.busy, Some("Saving..."));
        match self.persist().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.notify_error(&format!(
                    "Failed to save {}. Please check your input and try again.",
                    R::KIND.singular
                ));
                Err(e)
            }
        }
    }

    async fn persist(&mut self) -> Result<SaveOutcome<R>> {
        let payload = R::form_payload(&self.form);
        let store = Arc::clone(&self.store);

        match self.mode {
            DetailMode::Create => {
                let created = store.create(&payload).await?;
                self.notify_info(&format!("{} created successfully.", R::KIND.display));
                // Re-read to pick up relationships the server resolves
                let fetched = store.fetch_one(created.id()).await?;
                self.enter_view_mode();
                Ok(SaveOutcome::Created(fetched))
            }
            DetailMode::Edit => {
                let Some(current) = store.current() else {
                    return Ok(SaveOutcome::Skipped);
                };
                let updated = store.update(current.id(), &payload).await?;
                self.notify_info(&format!("{} updated successfully.", R::KIND.display));
                self.enter_view_mode();
                Ok(SaveOutcome::Updated(updated))
            }
            DetailMode::View => Ok(SaveOutcome::Skipped),
        }
    }

    /// Leave edit or create mode without saving.
    pub fn cancel(&mut self) {
        self.enter_view_mode();
    }

    /// Leave edit or create mode, asking first when the draft is dirty.
    ///
    /// Returns whether the controller left the mode.
    pub async fn cancel_with_confirmation(&mut self) -> bool {
        if self.has_unsaved_changes() {
            let outcome = self.cancel_confirm.confirm(CANCEL_TITLE, CANCEL_MESSAGE).await;
            if outcome != ConfirmOutcome::Leave {
                return false;
            }
        }
        self.cancel();
        true
    }

    /// Flip the status flag at `index` of the type's status fields.
    ///
    /// Without a current item, or with an index past the last field, nothing happens.
    pub async fn handle_status_toggle(&self, index: usize) -> Result<()> {
        let Some(current) = self.store.current() else {
            return Ok(());
        };
        let Some(&field) = R::KIND.status_fields.get(index) else {
            return Ok(());
        };
        let value = !current.status_flag(field).unwrap_or(false);

        let _busy = BusyGuard::show(&self.busy, Some("Updating..."));
        match self.store.set_status(current.id(), field, value).await {
            Ok(_) => {
                self.notify_info(&format!(
                    "{} {} successfully.",
                    R::KIND.display,
                    field.word(value)
                ));
                Ok(())
            }
            Err(e) => {
                self.notify_error(&toggle_failure_message::<R>(field));
                Err(e)
            }
        }
    }

    /// Status toggles of the current item, in toggle index order.
    pub fn status_cards(&self) -> Vec<StatusCard> {
        let Some(current) = self.store.current() else {
            return Vec::new();
        };
        let enabled = current.status_flag(StatusField::Enabled);

        R::KIND
            .status_fields
            .iter()
            .map(|&field| {
                let is_active = current.status_flag(field).unwrap_or(false);
                let (title, on, off) = match field {
                    StatusField::Enabled => ("Status", "Enabled", "Disabled"),
                    StatusField::Launched => ("Launch Status", "Launched", "Not Launched"),
                };
                StatusCard {
                    field,
                    title,
                    status_text: if is_active { on } else { off },
                    is_active,
                    // A disabled item cannot be launched
                    disabled: field == StatusField::Launched && enabled == Some(false),
                }
            })
            .collect()
    }

    /// Delete the current item after confirmation.
    pub async fn delete_resource(&self) -> Result<DeleteOutcome> {
        let stay = DeleteOutcome {
            navigate_to_list: false,
        };
        let Some(current) = self.store.current() else {
            return Ok(stay);
        };

        let title = format!("Delete {}", R::KIND.display);
        let message = format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            current.internal_name()
        );
        if self.delete_confirm.confirm(&title, &message).await != ConfirmOutcome::Delete {
            return Ok(stay);
        }

        let _busy = BusyGuard::show(&self.busy, Some("Deleting..."));
        if self.store.delete(current.id()).await {
            self.notify_info(&format!("{} deleted successfully.", R::KIND.display));
            Ok(DeleteOutcome {
                navigate_to_list: true,
            })
        } else {
            self.notify_error(&format!(
                "Failed to delete {}. Please try again.",
                R::KIND.singular
            ));
            Err(ClientError::Rejected(self.store.error().unwrap_or_else(|| {
                format!("Failed to delete {}", R::KIND.singular)
            })))
        }
    }

    /// Fetch an item and make it current.
    pub async fn load(&self, id: &str) -> Result<R> {
        let _busy = BusyGuard::show(&self.busy, None);
        match self.store.fetch_one(id).await {
            Ok(item) => Ok(item),
            Err(e) => {
                self.notify_error(&format!(
                    "Failed to load {}. Please try again.",
                    R::KIND.singular
                ));
                Err(e)
            }
        }
    }

    /// Prepare the controller for the page it was opened on.
    pub async fn initialize(&mut self, target: DetailTarget) -> Result<()> {
        match target {
            DetailTarget::New => {
                self.store.clear_current();
                self.defaults.load_defaults().await?;
                self.enter_create_mode();
            }
            DetailTarget::View(id) => {
                self.open(&id, false).await?;
            }
            DetailTarget::Edit(id) => {
                self.open(&id, true).await?;
            }
        }
        Ok(())
    }

    async fn open(&mut self, id: &str, edit: bool) -> Result<()> {
        let (loaded, defaults) = tokio::join!(self.load(id), self.defaults.load_defaults());
        loaded?;
        defaults?;
        if !(edit && self.enter_edit_mode()) {
            self.enter_view_mode();
        }
        Ok(())
    }
}

fn toggle_failure_message<R: Resource>(field: StatusField) -> String {
    match field {
        StatusField::Enabled => format!(
            "Failed to update {} status. Please try again.",
            R::KIND.singular
        ),
        StatusField::Launched => format!(
            "Failed to update {} launch status. Please try again.",
            R::KIND.singular
        ),
    }
}
