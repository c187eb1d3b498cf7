//! Filter, search and sort pipeline behind the list pages.
//!
//! Everything here is pure: the list is recomputed from the store's
//! collections on every read.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{FieldValue, Resource};

/// Which pre-filtered collection a list page starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Enabled,
    Launched,
    Visible,
    Default,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Enabled => "enabled",
            FilterMode::Launched => "launched",
            FilterMode::Visible => "visible",
            FilterMode::Default => "default",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(FilterMode::All),
            "enabled" => Some(FilterMode::Enabled),
            "launched" => Some(FilterMode::Launched),
            "visible" => Some(FilterMode::Visible),
            "default" => Some(FilterMode::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Current state of a list page's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub mode: FilterMode,
    pub search: String,
    pub sort_key: String,
    pub direction: SortDirection,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            mode: FilterMode::All,
            search: String::new(),
            sort_key: "internal_name".to_string(),
            direction: SortDirection::Asc,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sorted_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = key.into();
        self.direction = direction;
        self
    }

    /// Clicking a column header: same key flips the direction, a new key sorts ascending.
    pub fn handle_sort(&mut self, key: &str) {
        if self.sort_key == key {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = key.to_string();
            self.direction = SortDirection::Asc;
        }
    }

    /// Search and sort an already mode-selected collection.
    pub fn apply<R: Resource>(&self, source: &[R]) -> Vec<R> {
        let needle = self.search.trim().to_lowercase();
        let mut items: Vec<R> = source
            .iter()
            .filter(|item| matches_search(*item, &needle))
            .cloned()
            .collect();

        // sort_by is stable, so equal keys keep their source order
        items.sort_by(|a, b| {
            compare_fields(
                sort_value(a, &self.sort_key),
                sort_value(b, &self.sort_key),
                self.direction,
            )
        });
        items
    }
}

/// Case-insensitive substring match on `internal_name` or `backward_compatibility`.
///
/// `needle` must already be trimmed and lower-cased; an empty needle matches everything.
pub fn matches_search<R: Resource>(item: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.internal_name().to_lowercase().contains(needle)
        || item
            .backward_compatibility()
            .is_some_and(|code| code.to_lowercase().contains(needle))
}

fn sort_value<'a, R: Resource>(item: &'a R, key: &str) -> FieldValue<'a> {
    match item.field(key) {
        FieldValue::Null if key == "internal_name" => FieldValue::Text(""),
        value => value,
    }
}

/// Compare two field values; `Null` sorts last whatever the direction.
pub fn compare_fields(a: FieldValue<'_>, b: FieldValue<'_>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Greater,
        (_, FieldValue::Null) => Ordering::Less,
        (FieldValue::Text(x), FieldValue::Text(y)) => direction.apply(x.cmp(y)),
        (FieldValue::Flag(x), FieldValue::Flag(y)) => direction.apply(x.cmp(&y)),
        // Mixed kinds only happen with inconsistent data; text ahead of flags
        (FieldValue::Text(_), FieldValue::Flag(_)) => direction.apply(Ordering::Less),
        (FieldValue::Flag(_), FieldValue::Text(_)) => direction.apply(Ordering::Greater),
    }
}

/// Human-friendly string order.
///
/// Letters compare without accents and case first; on a tie the unaccented
/// form comes first, then lower case ahead of upper case, then code points.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let base = |s: &str| -> String {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect()
    };
    let accented = |s: &str| -> String { s.nfd().flat_map(char::to_lowercase).collect() };

    base(a)
        .cmp(&base(b))
        .then_with(|| accented(a).cmp(&accented(b)))
        .then_with(|| {
            a.nfd()
                .zip(b.nfd())
                .map(|(x, y)| case_rank(x).cmp(&case_rank(y)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

fn case_rank(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}
