//! Generic client-side cache for one resource type.
//!
//! A [`ResourceStore`] wraps the entity's [`ResourceApi`] and keeps the
//! fetched collections, the current item, a busy counter and the last error
//! message. State lives in a `tokio::sync::watch` channel: every mutation is
//! applied atomically after the network call resolves and wakes subscribers.

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{PageLinks, PageMeta, ResourceApi};
use crate::errors::{ClientError, Result};
use crate::listing::{locale_cmp, FilterMode, ListQuery};
use crate::models::{DefaultPolicy, Resource, StatusField};
use crate::ui::ErrorHandler;

/// Everything a store knows about its resource type.
#[derive(Debug, Clone)]
pub struct StoreState<R> {
    /// Current page (working list).
    pub items: Vec<R>,
    /// Full list sorted by name; valid when `is_loaded`.
    pub all_items: Vec<R>,
    /// Server-side "enabled" subset.
    pub visible_items: Vec<R>,
    pub current: Option<R>,
    /// Number of store actions awaiting the network.
    pub in_flight: usize,
    pub error: Option<String>,
    pub page_meta: Option<PageMeta>,
    pub page_links: Option<PageLinks>,
    pub is_loaded: bool,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            all_items: Vec::new(),
            visible_items: Vec::new(),
            current: None,
            in_flight: 0,
            error: None,
            page_meta: None,
            page_links: None,
            is_loaded: false,
        }
    }
}

impl<R> StoreState<R> {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Decrements the busy counter when the action finishes, however it finishes.
struct InFlight<'a, R> {
    state: &'a watch::Sender<StoreState<R>>,
}

impl<R> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        self.state
            .send_modify(|state| state.in_flight = state.in_flight.saturating_sub(1));
    }
}

pub struct ResourceStore<R: Resource> {
    api: Arc<dyn ResourceApi<R>>,
    errors: Arc<dyn ErrorHandler>,
    page_size: u32,
    state: watch::Sender<StoreState<R>>,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(api: Arc<dyn ResourceApi<R>>, errors: Arc<dyn ErrorHandler>, page_size: u32) -> Self {
        let (state, _rx) = watch::channel(StoreState::default());
        Self {
            api,
            errors,
            page_size: page_size.max(1),
            state,
        }
    }

    // ---- observation ----

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<R>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState<R> {
        self.state.borrow().clone()
    }

    /// Borrow the state without cloning it. Do not hold across an `.await`.
    pub fn with_state<T>(&self, f: impl FnOnce(&StoreState<R>) -> T) -> T {
        f(&self.state.borrow())
    }

    pub fn items(&self) -> Vec<R> {
        self.with_state(|s| s.items.clone())
    }

    pub fn all_items(&self) -> Vec<R> {
        self.with_state(|s| s.all_items.clone())
    }

    pub fn visible_items(&self) -> Vec<R> {
        self.with_state(|s| s.visible_items.clone())
    }

    pub fn current(&self) -> Option<R> {
        self.with_state(|s| s.current.clone())
    }

    pub fn error(&self) -> Option<String> {
        self.with_state(|s| s.error.clone())
    }

    pub fn loading(&self) -> bool {
        self.with_state(StoreState::loading)
    }

    pub fn is_loaded(&self) -> bool {
        self.with_state(|s| s.is_loaded)
    }

    pub fn page_meta(&self) -> Option<PageMeta> {
        self.with_state(|s| s.page_meta.clone())
    }

    // ---- action plumbing ----

    fn begin(&self) -> InFlight<'_, R> {
        self.state.send_modify(|state| {
            state.in_flight += 1;
            state.error = None;
        });
        InFlight { state: &self.state }
    }

    fn fail(&self, message: String, error: &ClientError) {
        self.errors.handle_error(error, &message);
        self.state.send_modify(|state| state.error = Some(message));
    }

    // ---- actions ----

    /// Fetch one page and make it the working list.
    pub async fn fetch_page(&self, page: Option<u32>, per_page: Option<u32>) -> Result<Vec<R>> {
        let _busy = self.begin();
        match self.api.list(page, per_page).await {
            Ok(envelope) => {
                let items = envelope.data;
                self.state.send_modify(|state| {
                    state.items = items.clone();
                    state.page_meta = envelope.meta;
                    state.page_links = envelope.links;
                });
                Ok(items)
            }
            Err(e) => {
                self.state.send_modify(|state| state.items.clear());
                self.fail(format!("Failed to fetch {}", R::KIND.plural), &e);
                Err(e)
            }
        }
    }

    /// Walk every page and cache the full list sorted by name.
    ///
    /// Only `all_items` is written; the working page and its pagination stay
    /// as they are.
    pub async fn fetch_all(&self) -> Result<Vec<R>> {
        let _busy = self.begin();
        match self.collect_pages().await {
            Ok(mut items) => {
                items.sort_by(|a, b| locale_cmp(a.internal_name(), b.internal_name()));
                tracing::debug!("Loaded {} {}", items.len(), R::KIND.plural);
                self.state.send_modify(|state| {
                    state.all_items = items.clone();
                    state.is_loaded = true;
                });
                Ok(items)
            }
            Err(e) => {
                self.fail(format!("Failed to fetch all {}", R::KIND.plural), &e);
                Err(e)
            }
        }
    }

    async fn collect_pages(&self) -> Result<Vec<R>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let envelope = self.api.list(Some(page), Some(self.page_size)).await?;
            let has_next = envelope.has_next_page();
            let last_page = envelope.meta.as_ref().map_or(page, |meta| meta.last_page);
            all.extend(envelope.data);
            if !has_next || page >= last_page {
                return Ok(all);
            }
            page += 1;
        }
    }

    /// Cached full list, fetching it on first use.
    pub async fn ensure_loaded(&self) -> Result<Vec<R>> {
        if self.is_loaded() {
            return Ok(self.all_items());
        }
        self.fetch_all().await
    }

    /// Re-fetch the full list even if it is cached.
    pub async fn refresh(&self) -> Result<Vec<R>> {
        self.fetch_all().await
    }

    pub async fn fetch_one(&self, id: &str) -> Result<R> {
        let _busy = self.begin();
        match self.api.show(id).await {
            Ok(item) => {
                self.state.send_modify(|state| {
                    replace_by_id(&mut state.items, &item);
                    replace_by_id(&mut state.all_items, &item);
                    state.current = Some(item.clone());
                });
                Ok(item)
            }
            Err(e) => {
                self.state.send_modify(|state| state.current = None);
                self.fail(
                    format!("Failed to fetch {} with ID: {}", R::KIND.singular, id),
                    &e,
                );
                Err(e)
            }
        }
    }

    pub async fn create(&self, payload: &R::Payload) -> Result<R> {
        let _busy = self.begin();
        match self.api.store(payload).await {
            Ok(item) => {
                tracing::info!("Created {} {}", R::KIND.singular, item.id());
                self.state.send_modify(|state| {
                    state.items.push(item.clone());
                    if state.is_loaded {
                        insert_sorted(&mut state.all_items, item.clone());
                    }
                    enforce_single_default(state, &item);
                });
                Ok(item)
            }
            Err(e) => {
                self.fail(format!("Failed to create {}", R::KIND.singular), &e);
                Err(e)
            }
        }
    }

    /// Update an item. A cache that does not hold `id` is left alone.
    pub async fn update(&self, id: &str, payload: &R::Payload) -> Result<R> {
        let _busy = self.begin();
        match self.api.update(id, payload).await {
            Ok(item) => {
                self.state.send_modify(|state| {
                    replace_by_id(&mut state.items, &item);
                    if replace_by_id(&mut state.all_items, &item) {
                        sort_by_name(&mut state.all_items);
                    }
                    replace_by_id(&mut state.visible_items, &item);
                    if state.current.as_ref().is_some_and(|c| c.id() == id) {
                        state.current = Some(item.clone());
                    }
                    enforce_single_default(state, &item);
                });
                Ok(item)
            }
            Err(e) => {
                self.fail(format!("Failed to update {}", R::KIND.singular), &e);
                Err(e)
            }
        }
    }

    /// Delete an item. Failures are reported to the error handler and
    /// surface only as `false`.
    pub async fn delete(&self, id: &str) -> bool {
        let _busy = self.begin();
        match self.api.destroy(id).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", R::KIND.singular, id);
                self.state.send_modify(|state| {
                    state.items.retain(|item| item.id() != id);
                    state.all_items.retain(|item| item.id() != id);
                    state.visible_items.retain(|item| item.id() != id);
                    if state.current.as_ref().is_some_and(|c| c.id() == id) {
                        state.current = None;
                    }
                });
                true
            }
            Err(e) => {
                self.fail(format!("Failed to delete {}", R::KIND.singular), &e);
                false
            }
        }
    }

    /// Set or clear the default flag of an item.
    ///
    /// With a single-default type every other cached item loses the flag
    /// locally, without a refetch. With a multiple-default type only the
    /// returned item is replaced.
    pub async fn set_default(&self, id: &str, value: bool) -> Result<R> {
        let _busy = self.begin();
        match self.api.set_default(id, value).await {
            Ok(item) => {
                self.state.send_modify(|state| {
                    replace_everywhere(state, &item);
                    if R::KIND.default_policy == DefaultPolicy::Single {
                        clear_other_defaults(state, item.id());
                    }
                });
                Ok(item)
            }
            Err(e) => {
                self.fail(format!("Failed to set default {}", R::KIND.singular), &e);
                Err(e)
            }
        }
    }

    /// Ask the server which item is the default and cache it.
    ///
    /// The working page only sees the item if it already holds it; an
    /// uncached default joins the full list when that is loaded.
    pub async fn fetch_default(&self) -> Result<R> {
        let _busy = self.begin();
        match self.api.get_default().await {
            Ok(item) => {
                self.state.send_modify(|state| {
                    replace_by_id(&mut state.items, &item);
                    replace_by_id(&mut state.visible_items, &item);
                    if state.is_loaded && !replace_by_id(&mut state.all_items, &item) {
                        insert_sorted(&mut state.all_items, item.clone());
                    }
                    enforce_single_default(state, &item);
                });
                Ok(item)
            }
            Err(e) => {
                self.fail(format!("Failed to get default {}", R::KIND.singular), &e);
                Err(e)
            }
        }
    }

    /// Fetch the server-side "enabled" subset.
    pub async fn fetch_visible(&self) -> Result<Vec<R>> {
        let _busy = self.begin();
        match self.api.list_enabled().await {
            Ok(items) => {
                self.state
                    .send_modify(|state| state.visible_items = items.clone());
                Ok(items)
            }
            Err(e) => {
                self.fail(format!("Failed to fetch enabled {}", R::KIND.plural), &e);
                Err(e)
            }
        }
    }

    /// Toggle a status flag. Leaves the busy counter alone; callers own the busy indicator.
    pub async fn set_status(&self, id: &str, field: StatusField, value: bool) -> Result<R> {
        self.state.send_modify(|state| state.error = None);
        match self.api.set_status(id, field, value).await {
            Ok(item) => {
                self.state.send_modify(|state| replace_everywhere(state, &item));
                Ok(item)
            }
            Err(e) => {
                self.fail(
                    format!(
                        "Failed to set {} {} status",
                        R::KIND.singular,
                        field.on_word()
                    ),
                    &e,
                );
                Err(e)
            }
        }
    }

    // ---- synchronous helpers ----

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    pub fn clear_current(&self) {
        self.state.send_modify(|state| state.current = None);
    }

    /// Drop every cached collection and the current item.
    pub fn clear(&self) {
        self.state.send_modify(|state| {
            state.items.clear();
            state.all_items.clear();
            state.visible_items.clear();
            state.current = None;
            state.page_meta = None;
            state.page_links = None;
            state.is_loaded = false;
        });
    }

    /// Write an item fetched elsewhere into the full list, only when it is loaded.
    pub fn update_in_cache(&self, item: &R) {
        self.state.send_if_modified(|state| {
            if !state.is_loaded {
                return false;
            }
            if !replace_by_id(&mut state.all_items, item) {
                insert_sorted(&mut state.all_items, item.clone());
            } else {
                sort_by_name(&mut state.all_items);
            }
            true
        });
    }

    pub fn find(&self, id: &str) -> Option<R> {
        self.with_state(|state| {
            state
                .items
                .iter()
                .chain(state.all_items.iter())
                .find(|item| item.id() == id)
                .cloned()
        })
    }

    /// First cached item carrying the default flag.
    pub fn default_item(&self) -> Option<R> {
        self.with_state(|state| {
            cached(state)
                .iter()
                .find(|item| item.default_flag() == Some(true))
                .cloned()
        })
    }

    pub fn default_items(&self) -> Vec<R> {
        self.with_state(|state| {
            cached(state)
                .iter()
                .filter(|item| item.default_flag() == Some(true))
                .cloned()
                .collect()
        })
    }

    /// Working list sorted by name.
    pub fn sorted_items(&self) -> Vec<R> {
        let mut items = self.items();
        sort_by_name(&mut items);
        items
    }

    pub fn items_where(&self, field: StatusField, value: bool) -> Vec<R> {
        self.with_state(|state| {
            state
                .items
                .iter()
                .filter(|item| item.status_flag(field) == Some(value))
                .cloned()
                .collect()
        })
    }

    /// The pre-filtered collection a list page starts from.
    pub fn collection(&self, mode: FilterMode) -> Vec<R> {
        match mode {
            FilterMode::All => self.items(),
            FilterMode::Enabled => self.items_where(StatusField::Enabled, true),
            FilterMode::Launched => self.items_where(StatusField::Launched, true),
            FilterMode::Visible => self.visible_items(),
            FilterMode::Default => self.with_state(|state| {
                state
                    .items
                    .iter()
                    .filter(|item| item.default_flag() == Some(true))
                    .cloned()
                    .collect()
            }),
        }
    }

    /// Rows of a list page for the given controls.
    pub fn query(&self, query: &ListQuery) -> Vec<R> {
        query.apply(&self.collection(query.mode))
    }
}

/// The full list when loaded, the working list otherwise.
fn cached<R>(state: &StoreState<R>) -> &[R] {
    if state.is_loaded {
        &state.all_items
    } else {
        &state.items
    }
}

fn replace_by_id<R: Resource>(items: &mut [R], item: &R) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => {
            *existing = item.clone();
            true
        }
        None => false,
    }
}

fn replace_everywhere<R: Resource>(state: &mut StoreState<R>, item: &R) {
    replace_by_id(&mut state.items, item);
    replace_by_id(&mut state.all_items, item);
    replace_by_id(&mut state.visible_items, item);
    if state.current.as_ref().is_some_and(|c| c.id() == item.id()) {
        state.current = Some(item.clone());
    }
}

/// With a single-default type, `item` being the default clears the flag everywhere else.
fn enforce_single_default<R: Resource>(state: &mut StoreState<R>, item: &R) {
    if R::KIND.default_policy == DefaultPolicy::Single && item.default_flag() == Some(true) {
        clear_other_defaults(state, item.id());
    }
}

fn clear_other_defaults<R: Resource>(state: &mut StoreState<R>, id: &str) {
    let others = state
        .items
        .iter_mut()
        .chain(state.all_items.iter_mut())
        .chain(state.visible_items.iter_mut())
        .chain(state.current.iter_mut());
    for other in others {
        if other.id() != id {
            other.set_default_flag(false);
        }
    }
}

fn sort_by_name<R: Resource>(items: &mut [R]) {
    items.sort_by(|a, b| locale_cmp(a.internal_name(), b.internal_name()));
}

fn insert_sorted<R: Resource>(items: &mut Vec<R>, item: R) {
    let at = items.partition_point(|existing| {
        locale_cmp(existing.internal_name(), item.internal_name()).is_le()
    });
    items.insert(at, item);
}
