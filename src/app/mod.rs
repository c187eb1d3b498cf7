//! Application context.
//!
//! One explicitly constructed value owns the transport, one store per entity
//! type and the shared UI collaborators. Views receive it (or pieces of it)
//! instead of reaching for global state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::HttpApi;
use crate::auth::{AuthState, FileTokenStore, TokenStore};
use crate::config::Config;
use crate::detail::{DetailViewController, FormDefaultsProvider};
use crate::errors::Result;
use crate::models::{
    Author, Context, Country, Editable, FormDefaults, GlossaryEntry, Item, Language, Partner,
    Project, Workshop,
};
use crate::store::ResourceStore;
use crate::ui::{Confirm, LoadingOverlay, MessageBoard, TracingErrorHandler};

pub struct AppContext {
    config: Config,
    auth: AuthState,
    api: HttpApi,
    messages: MessageBoard,
    overlay: LoadingOverlay,
    errors: Arc<TracingErrorHandler>,
    countries: Arc<ResourceStore<Country>>,
    languages: Arc<ResourceStore<Language>>,
    contexts: Arc<ResourceStore<Context>>,
    projects: Arc<ResourceStore<Project>>,
    partners: Arc<ResourceStore<Partner>>,
    glossary: Arc<ResourceStore<GlossaryEntry>>,
    items: Arc<ResourceStore<Item>>,
    authors: Arc<ResourceStore<Author>>,
    workshops: Arc<ResourceStore<Workshop>>,
}

impl AppContext {
    pub fn new(config: Config, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let auth = AuthState::new(Arc::clone(&tokens));
        let api = HttpApi::new(&config, tokens)?;
        let errors = Arc::new(TracingErrorHandler::new().with_auth(auth.clone()));

        tracing::info!("Inventory API at {}", api.base_url());

        let page_size = config.page_size;
        let shared = Arc::new(api.clone());
        Ok(Self {
            countries: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            languages: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            contexts: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            projects: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            partners: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            glossary: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            items: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            authors: Arc::new(ResourceStore::new(shared.clone(), errors.clone(), page_size)),
            workshops: Arc::new(ResourceStore::new(shared, errors.clone(), page_size)),
            config,
            auth,
            api,
            messages: MessageBoard::new(),
            overlay: LoadingOverlay::new(),
            errors,
        })
    }

    /// Context whose token is persisted at `config.token_path`.
    pub fn from_config(config: Config) -> Result<Self> {
        let tokens = Arc::new(FileTokenStore::new(&config.token_path));
        Self::new(config, tokens)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn api(&self) -> &HttpApi {
        &self.api
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    pub fn overlay(&self) -> &LoadingOverlay {
        &self.overlay
    }

    pub fn errors(&self) -> &Arc<TracingErrorHandler> {
        &self.errors
    }

    pub fn countries(&self) -> &Arc<ResourceStore<Country>> {
        &self.countries
    }

    pub fn languages(&self) -> &Arc<ResourceStore<Language>> {
        &self.languages
    }

    pub fn contexts(&self) -> &Arc<ResourceStore<Context>> {
        &self.contexts
    }

    pub fn projects(&self) -> &Arc<ResourceStore<Project>> {
        &self.projects
    }

    pub fn partners(&self) -> &Arc<ResourceStore<Partner>> {
        &self.partners
    }

    pub fn glossary(&self) -> &Arc<ResourceStore<GlossaryEntry>> {
        &self.glossary
    }

    pub fn items(&self) -> &Arc<ResourceStore<Item>> {
        &self.items
    }

    pub fn authors(&self) -> &Arc<ResourceStore<Author>> {
        &self.authors
    }

    pub fn workshops(&self) -> &Arc<ResourceStore<Workshop>> {
        &self.workshops
    }

    /// Forget the token, every cached collection and the pending messages.
    pub fn logout(&self) -> Result<()> {
        self.clear_caches();
        self.messages.clear_all();
        self.auth.logout()
    }

    /// Drop every cached collection.
    pub fn clear_caches(&self) {
        self.countries.clear();
        self.languages.clear();
        self.contexts.clear();
        self.projects.clear();
        self.partners.clear();
        self.glossary.clear();
        self.items.clear();
        self.authors.clear();
        self.workshops.clear();
    }

    /// Detail controller over `store`, reporting to the shared board and overlay.
    pub fn detail_controller<R: Editable>(
        self: &Arc<Self>,
        store: &Arc<ResourceStore<R>>,
        delete_confirm: Arc<dyn Confirm>,
        cancel_confirm: Arc<dyn Confirm>,
    ) -> DetailViewController<R> {
        DetailViewController::new(
            Arc::clone(store),
            Arc::clone(self) as Arc<dyn FormDefaultsProvider>,
            Arc::new(self.messages.clone()),
            Arc::new(self.overlay.clone()),
            delete_confirm,
            cancel_confirm,
        )
    }
}

#[async_trait]
impl FormDefaultsProvider for AppContext {
    fn form_defaults(&self) -> FormDefaults {
        FormDefaults {
            context_id: self.contexts.default_item().map(|c| c.id),
            language_id: self.languages.default_item().map(|l| l.id),
        }
    }

    async fn load_defaults(&self) -> Result<()> {
        let (contexts, languages) =
            tokio::join!(self.contexts.ensure_loaded(), self.languages.ensure_loaded());
        contexts?;
        languages?;
        Ok(())
    }
}
