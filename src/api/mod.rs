//! REST API collaborator.
//!
//! [`ResourceApi`] is the seam the stores talk to: one method per REST
//! operation of an entity's endpoint family. [`HttpApi`] implements it for
//! every resource type over `reqwest`.

mod envelope;
mod http;

pub use envelope::*;
pub use http::*;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{Resource, StatusField};

/// The endpoint family of one resource type.
///
/// Every method fails on non-2xx responses.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// `GET /{path}?page=&per_page=`
    async fn list(&self, page: Option<u32>, per_page: Option<u32>) -> Result<ListEnvelope<R>>;

    /// `GET /{path}/{id}`
    async fn show(&self, id: &str) -> Result<R>;

    /// `POST /{path}`
    async fn store(&self, payload: &R::Payload) -> Result<R>;

    /// `PUT /{path}/{id}`
    async fn update(&self, id: &str, payload: &R::Payload) -> Result<R>;

    /// `DELETE /{path}/{id}`
    async fn destroy(&self, id: &str) -> Result<()>;

    /// `GET /{path}/default`
    async fn get_default(&self) -> Result<R>;

    /// `PATCH /{path}/{id}/default` with `{"is_default": value}`
    async fn set_default(&self, id: &str, value: bool) -> Result<R>;

    /// `GET /{path}/enabled`
    async fn list_enabled(&self) -> Result<Vec<R>>;

    /// `PATCH /{path}/{id}/set-enabled` or `/set-launched`
    async fn set_status(&self, id: &str, field: StatusField, value: bool) -> Result<R>;
}
