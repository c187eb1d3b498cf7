//! In-memory `ResourceApi` used by unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ListEnvelope, PageMeta, ResourceApi};
use crate::errors::{ClientError, Result};
use crate::models::{
    Context, ContextPayload, Country, CountryPayload, DefaultPolicy, Language, LanguagePayload,
    Project, ProjectPayload, Resource, StatusField,
};

/// Builds the stored item from a payload, the assigned id and the previous version.
pub(crate) type Build<R> = fn(&<R as Resource>::Payload, &str, Option<&R>) -> R;

pub(crate) struct FakeApi<R: Resource> {
    items: Mutex<Vec<R>>,
    build: Build<R>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl<R: Resource> FakeApi<R> {
    pub(crate) fn new(items: Vec<R>, build: Build<R>) -> Self {
        Self {
            items: Mutex::new(items),
            build,
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Make every call of `op` answer 500.
    pub(crate) fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub(crate) fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn stored(&self) -> Vec<R> {
        self.items.lock().unwrap().clone()
    }

    fn enter(&self, op: &'static str, detail: String) -> Result<()> {
        self.calls.lock().unwrap().push(format!("{op} {detail}").trim_end().to_string());
        if self.failing.lock().unwrap().contains(op) {
            return Err(ClientError::from_response(500, ""));
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::from_response(404, "")
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for FakeApi<R> {
    async fn list(&self, page: Option<u32>, per_page: Option<u32>) -> Result<ListEnvelope<R>> {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(15).max(1);
        self.enter("list", format!("page={page} per_page={per_page}"))?;

        let items = self.items.lock().unwrap();
        let last_page = (items.len() as u32).div_ceil(per_page).max(1);
        let data = items
            .iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok(ListEnvelope {
            data,
            meta: Some(PageMeta {
                current_page: page,
                last_page,
                per_page: Some(per_page),
                total: Some(items.len() as u64),
                from: None,
                to: None,
                links: Vec::new(),
            }),
            links: None,
        })
    }

    async fn show(&self, id: &str) -> Result<R> {
        self.enter("show", id.to_string())?;
        let items = self.items.lock().unwrap();
        items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn store(&self, payload: &R::Payload) -> Result<R> {
        self.enter("store", String::new())?;
        let id = format!("{}-{}", R::KIND.path, self.next_id.fetch_add(1, Ordering::Relaxed));
        let item = (self.build)(payload, &id, None);
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, payload: &R::Payload) -> Result<R> {
        self.enter("update", id.to_string())?;
        let mut items = self.items.lock().unwrap();
        let existing = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(Self::not_found)?;
        *existing = (self.build)(payload, id, Some(&*existing));
        Ok(existing.clone())
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        self.enter("destroy", id.to_string())?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn get_default(&self) -> Result<R> {
        self.enter("get_default", String::new())?;
        let items = self.items.lock().unwrap();
        items
            .iter()
            .find(|item| item.default_flag() == Some(true))
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn set_default(&self, id: &str, value: bool) -> Result<R> {
        self.enter("set_default", format!("{id}={value}"))?;
        let mut items = self.items.lock().unwrap();
        if !items.iter().any(|item| item.id() == id) {
            return Err(Self::not_found());
        }
        let single = R::KIND.default_policy == DefaultPolicy::Single;
        let mut updated = None;
        for item in items.iter_mut() {
            if item.id() == id {
                item.set_default_flag(value);
                updated = Some(item.clone());
            } else if single && value {
                item.set_default_flag(false);
            }
        }
        updated.ok_or_else(Self::not_found)
    }

    async fn list_enabled(&self) -> Result<Vec<R>> {
        self.enter("list_enabled", String::new())?;
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|item| item.status_flag(StatusField::Enabled) == Some(true))
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: &str, field: StatusField, value: bool) -> Result<R> {
        self.enter("set_status", format!("{id} {}={value}", field.key()))?;
        let mut items = self.items.lock().unwrap();
        let existing = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(Self::not_found)?;
        let mut json = serde_json::to_value(&*existing)?;
        json[field.key()] = value.into();
        *existing = serde_json::from_value(json)?;
        Ok(existing.clone())
    }
}

pub(crate) fn country(id: &str, name: &str) -> Country {
    Country {
        id: id.into(),
        internal_name: name.into(),
        backward_compatibility: None,
        created_at: Some("2024-01-01T00:00:00.000000Z".into()),
        updated_at: None,
    }
}

pub(crate) fn build_country(payload: &CountryPayload, _id: &str, existing: Option<&Country>) -> Country {
    Country {
        id: payload.id.clone(),
        internal_name: payload.internal_name.clone(),
        backward_compatibility: payload.backward_compatibility.clone(),
        created_at: existing.and_then(|c| c.created_at.clone()),
        updated_at: None,
    }
}

pub(crate) fn language(id: &str, name: &str, is_default: bool) -> Language {
    Language {
        id: id.into(),
        internal_name: name.into(),
        backward_compatibility: None,
        is_default,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn build_language(payload: &LanguagePayload, _id: &str, _existing: Option<&Language>) -> Language {
    Language {
        id: payload.id.clone(),
        internal_name: payload.internal_name.clone(),
        backward_compatibility: payload.backward_compatibility.clone(),
        is_default: payload.is_default,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn context(id: &str, name: &str, is_default: bool) -> Context {
    Context {
        id: id.into(),
        internal_name: name.into(),
        backward_compatibility: None,
        is_default,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn build_context(payload: &ContextPayload, id: &str, _existing: Option<&Context>) -> Context {
    Context {
        id: id.into(),
        internal_name: payload.internal_name.clone(),
        backward_compatibility: payload.backward_compatibility.clone(),
        is_default: payload.is_default,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn project(id: &str, name: &str, enabled: bool, launched: bool) -> Project {
    Project {
        id: id.into(),
        internal_name: name.into(),
        backward_compatibility: None,
        launch_date: None,
        is_launched: launched,
        is_enabled: enabled,
        context: None,
        language: None,
        created_at: None,
        updated_at: None,
    }
}

/// Mirrors the server: dates come back as full timestamps, ids as embedded records.
pub(crate) fn build_project(payload: &ProjectPayload, id: &str, existing: Option<&Project>) -> Project {
    Project {
        id: id.into(),
        internal_name: payload.internal_name.clone(),
        backward_compatibility: payload.backward_compatibility.clone(),
        launch_date: payload
            .launch_date
            .as_ref()
            .map(|date| format!("{date}T00:00:00.000000Z")),
        is_launched: existing.is_some_and(|p| p.is_launched),
        is_enabled: existing.is_some_and(|p| p.is_enabled),
        context: payload
            .context_id
            .as_deref()
            .map(|ctx| context(ctx, ctx, false)),
        language: payload
            .language_id
            .as_deref()
            .map(|lang| language(lang, lang, false)),
        created_at: existing.and_then(|p| p.created_at.clone()),
        updated_at: None,
    }
}
