//! Data models for the inventory catalogue.
//!
//! Field names match the JSON resources served by the API.

mod author;
mod context;
mod country;
mod glossary;
mod item;
mod language;
mod partner;
mod project;
mod resource;
mod workshop;

pub use author::*;
pub use context::*;
pub use country::*;
pub use glossary::*;
pub use item::*;
pub use language::*;
pub use partner::*;
pub use project::*;
pub use resource::*;
pub use workshop::*;
