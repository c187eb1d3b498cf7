//! HTTP transport over `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{Envelope, ListEnvelope, ResourceApi};
use crate::auth::TokenStore;
use crate::config::Config;
use crate::errors::{ClientError, Result};
use crate::models::{Resource, StatusField};

/// Shared HTTP client for every resource endpoint.
///
/// Cloning is cheap; clones share the connection pool and token store.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApi {
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            ClientError::Config(format!("Invalid API base URL {}: {}", config.api_base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API base URL {} cannot carry a path",
                config.api_base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with the given path segments appended (each one percent-encoded).
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request, attaching the bearer token if one is persisted right now.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ClientError::from_response(status.as_u16(), &body);
        tracing::debug!("Request failed with {}: {}", status, error);
        Err(error)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let envelope: Envelope<T> = self.fetch(request).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for HttpApi {
    async fn list(&self, page: Option<u32>, per_page: Option<u32>) -> Result<ListEnvelope<R>> {
        let mut url = self.url(&[R::KIND.path]);
        {
            let mut query = url.query_pairs_mut();
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
            if let Some(per_page) = per_page {
                query.append_pair("per_page", &per_page.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        self.fetch(self.request(Method::GET, url)).await
    }

    async fn show(&self, id: &str) -> Result<R> {
        let url = self.url(&[R::KIND.path, id]);
        self.fetch_data(self.request(Method::GET, url)).await
    }

    async fn store(&self, payload: &R::Payload) -> Result<R> {
        let url = self.url(&[R::KIND.path]);
        self.fetch_data(self.request(Method::POST, url).json(payload))
            .await
    }

    async fn update(&self, id: &str, payload: &R::Payload) -> Result<R> {
        let url = self.url(&[R::KIND.path, id]);
        self.fetch_data(self.request(Method::PUT, url).json(payload))
            .await
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        let url = self.url(&[R::KIND.path, id]);
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn get_default(&self) -> Result<R> {
        let url = self.url(&[R::KIND.path, "default"]);
        self.fetch_data(self.request(Method::GET, url)).await
    }

    async fn set_default(&self, id: &str, value: bool) -> Result<R> {
        let url = self.url(&[R::KIND.path, id, "default"]);
        let body = json!({ "is_default": value });
        self.fetch_data(self.request(Method::PATCH, url).json(&body))
            .await
    }

    async fn list_enabled(&self) -> Result<Vec<R>> {
        let url = self.url(&[R::KIND.path, "enabled"]);
        let envelope: ListEnvelope<R> = self.fetch(self.request(Method::GET, url)).await?;
        Ok(envelope.data)
    }

    async fn set_status(&self, id: &str, field: StatusField, value: bool) -> Result<R> {
        let url = self.url(&[R::KIND.path, id, field.route()]);
        let mut body = serde_json::Map::new();
        body.insert(field.key().to_string(), value.into());
        self.fetch_data(self.request(Method::PATCH, url).json(&body))
            .await
    }
}
