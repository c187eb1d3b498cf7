//! Author model.

use serde::{Deserialize, Serialize};

use super::resource::{
    none_if_empty, DefaultPolicy, Editable, FieldValue, FormDefaults, Resource, ResourceKind,
};

/// Writer, editor or translator credited on item texts.
///
/// Authors are known by `name`; `internal_name` is optional and falls back to
/// the name wherever the catalogue needs one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub internal_name: Option<String>,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorPayload {
    pub name: String,
    pub internal_name: Option<String>,
    pub backward_compatibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorForm {
    pub name: String,
    pub internal_name: String,
    pub backward_compatibility: String,
}

impl Resource for Author {
    type Payload = AuthorPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "author",
        singular: "author",
        plural: "authors",
        display: "Author",
        default_policy: DefaultPolicy::None,
        status_fields: &[],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn internal_name(&self) -> &str {
        self.internal_name.as_deref().unwrap_or(&self.name)
    }

    fn backward_compatibility(&self) -> Option<&str> {
        self.backward_compatibility.as_deref()
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn extra_field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "name" => FieldValue::Text(&self.name),
            _ => FieldValue::Null,
        }
    }
}

impl Editable for Author {
    type Form = AuthorForm;

    fn blank_form(_defaults: &FormDefaults) -> AuthorForm {
        AuthorForm::default()
    }

    fn to_form(&self) -> AuthorForm {
        AuthorForm {
            name: self.name.clone(),
            internal_name: self.internal_name.clone().unwrap_or_default(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
        }
    }

    fn form_payload(form: &AuthorForm) -> AuthorPayload {
        AuthorPayload {
            name: form.name.clone(),
            internal_name: none_if_empty(&form.internal_name),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
        }
    }
}
