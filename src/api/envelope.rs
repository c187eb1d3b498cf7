//! Response envelopes returned by every endpoint.

use serde::{Deserialize, Serialize};

/// Single-item response: `{ "data": T }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// List response: `{ "data": [T], "meta": {...}, "links": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

impl<T> ListEnvelope<T> {
    /// True when the metadata says another page follows this one.
    pub fn has_next_page(&self) -> bool {
        self.meta
            .as_ref()
            .is_some_and(|meta| meta.current_page < meta.last_page)
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub links: Vec<MetaLink>,
}

impl PageMeta {
    /// Numbered page links, without previous/next entries.
    pub fn page_links(&self) -> impl Iterator<Item = &MetaLink> {
        self.links.iter().filter(|link| {
            let label = link.label.to_lowercase();
            !label.contains("previous") && !label.contains("next")
        })
    }
}

/// Entry of the numbered pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaLink {
    #[serde(default)]
    pub url: Option<String>,
    pub label: String,
    #[serde(default)]
    pub active: bool,
}

/// First/last/prev/next URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}
