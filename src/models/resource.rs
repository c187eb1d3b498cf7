//! The resource abstraction shared by every catalogue entity.

use std::fmt::Debug;

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// How an entity type treats its `is_default` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// The type has no default flag.
    None,
    /// At most one item may be the default; setting one clears the others locally.
    Single,
    /// The server allows several defaults; the cache is never rewritten wholesale.
    Multiple,
}

/// Independently toggled status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusField {
    Enabled,
    Launched,
}

impl StatusField {
    /// JSON key of the flag, also the request body key.
    pub fn key(self) -> &'static str {
        match self {
            StatusField::Enabled => "is_enabled",
            StatusField::Launched => "is_launched",
        }
    }

    /// Sub-route used to set the flag.
    pub fn route(self) -> &'static str {
        match self {
            StatusField::Enabled => "set-enabled",
            StatusField::Launched => "set-launched",
        }
    }

    /// Past participle for the `true` state.
    pub fn on_word(self) -> &'static str {
        match self {
            StatusField::Enabled => "enabled",
            StatusField::Launched => "launched",
        }
    }

    /// Past participle for the `false` state.
    pub fn off_word(self) -> &'static str {
        match self {
            StatusField::Enabled => "disabled",
            StatusField::Launched => "unlaunched",
        }
    }

    pub fn word(self, value: bool) -> &'static str {
        if value {
            self.on_word()
        } else {
            self.off_word()
        }
    }
}

/// Static description of an entity type: where it lives and how it is named in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// Endpoint path segment, e.g. `country` for `/country/{id}`
    pub path: &'static str,
    /// Lower-case singular used in messages ("country")
    pub singular: &'static str,
    /// Lower-case plural used in messages ("countries")
    pub plural: &'static str,
    /// Capitalised name used in notifications ("Country")
    pub display: &'static str,
    pub default_policy: DefaultPolicy,
    pub status_fields: &'static [StatusField],
}

/// A field value extracted for generic sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    Null,
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}

/// A catalogue entity as returned by the API.
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Request body for create and update.
    type Payload: Serialize + Clone + Debug + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> &str;
    fn internal_name(&self) -> &str;
    fn backward_compatibility(&self) -> Option<&str>;
    fn created_at(&self) -> Option<&str>;
    fn updated_at(&self) -> Option<&str>;

    fn default_flag(&self) -> Option<bool> {
        None
    }

    fn set_default_flag(&mut self, _value: bool) {}

    fn status_flag(&self, _field: StatusField) -> Option<bool> {
        None
    }

    /// Entity-specific sortable fields beyond the common ones.
    fn extra_field(&self, _key: &str) -> FieldValue<'_> {
        FieldValue::Null
    }

    /// Look a field up by its JSON key. Unknown keys are `Null`.
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(self.id()),
            "internal_name" => FieldValue::Text(self.internal_name()),
            "backward_compatibility" => self.backward_compatibility().into(),
            "created_at" => self.created_at().into(),
            "updated_at" => self.updated_at().into(),
            "is_default" => self
                .default_flag()
                .map(FieldValue::Flag)
                .unwrap_or(FieldValue::Null),
            "is_enabled" => self
                .status_flag(StatusField::Enabled)
                .map(FieldValue::Flag)
                .unwrap_or(FieldValue::Null),
            "is_launched" => self
                .status_flag(StatusField::Launched)
                .map(FieldValue::Flag)
                .unwrap_or(FieldValue::Null),
            other => self.extra_field(other),
        }
    }
}

/// Values the create form starts from, taken from the stores' known defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDefaults {
    pub context_id: Option<String>,
    pub language_id: Option<String>,
}

/// A resource that can be edited through a draft form.
pub trait Editable: Resource {
    type Form: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Create-mode form.
    fn blank_form(defaults: &FormDefaults) -> Self::Form;

    /// Edit-mode form projected from this resource.
    fn to_form(&self) -> Self::Form;

    /// Payload built from a draft; empty optional strings become `None`.
    fn form_payload(form: &Self::Form) -> Self::Payload;
}

/// `None` for empty strings, owned value otherwise.
pub fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Project an ISO-8601 timestamp onto a `YYYY-MM-DD` date input value.
///
/// RFC 3339 timestamps keep the calendar date of their own offset; anything
/// else is cut at the `T` separator. `None` becomes the empty string.
pub fn date_input_value(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return String::new();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.date_naive().format("%Y-%m-%d").to_string(),
        Err(_) => raw.split('T').next().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_input_value() {
        assert_eq!(date_input_value(Some("2023-12-01T00:00:00Z")), "2023-12-01");
        assert_eq!(date_input_value(Some("2024-02-29T23:30:00+02:00")), "2024-02-29");
        assert_eq!(date_input_value(Some("2024-05-01")), "2024-05-01");
        assert_eq!(date_input_value(None), "");
    }

    #[test]
    fn test_none_if_empty() {
        assert_eq!(none_if_empty(""), None);
        assert_eq!(none_if_empty("GB"), Some("GB".to_string()));
    }

    #[test]
    fn test_status_words() {
        assert_eq!(StatusField::Enabled.word(false), "disabled");
        assert_eq!(StatusField::Launched.word(false), "unlaunched");
        assert_eq!(StatusField::Launched.route(), "set-launched");
    }
}
