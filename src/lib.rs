//! Inventory admin core
//!
//! Client-side state for the inventory catalogue admin: a generic resource
//! store per entity type, the detail-view workflow built on it, and the
//! list filter/sort pipeline, talking to the catalogue REST API over HTTP.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod detail;
pub mod errors;
pub mod listing;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use app::AppContext;
pub use config::Config;
pub use detail::{DetailMode, DetailTarget, DetailViewController};
pub use errors::{ClientError, Result};
pub use listing::{FilterMode, ListQuery, SortDirection};
pub use store::{ResourceStore, StoreState};

#[cfg(test)]
mod tests;
