//! Context model. Exactly one context may be the default.

use serde::{Deserialize, Serialize};

use super::resource::{none_if_empty, DefaultPolicy, Editable, FormDefaults, Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPayload {
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextForm {
    pub internal_name: String,
    pub backward_compatibility: String,
    pub is_default: bool,
}

impl Resource for Context {
    type Payload = ContextPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "context",
        singular: "context",
        plural: "contexts",
        display: "Context",
        default_policy: DefaultPolicy::Single,
        status_fields: &[],
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn internal_name(&self) -> &str {
        &self.internal_name
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

    fn default_flag(&self) -> Option<bool> {
        Some(self.is_default)
    }

    fn set_default_flag(&mut self, value: bool) {
        self.is_default = value;
    }
}

impl Editable for Context {
    type Form = ContextForm;

    fn blank_form(_defaults: &FormDefaults) -> ContextForm {
        ContextForm::default()
    }

    fn to_form(&self) -> ContextForm {
        ContextForm {
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
            is_default: self.is_default,
        }
    }

    fn form_payload(form: &ContextForm) -> ContextPayload {
        ContextPayload {
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
            is_default: form.is_default,
        }
    }
}
