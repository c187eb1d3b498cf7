//! Glossary entry model.

use serde::{Deserialize, Serialize};

use super::resource::{none_if_empty, DefaultPolicy, Editable, FormDefaults, Resource, ResourceKind};

/// A glossary entry; translations and spellings hang off it server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub id: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryPayload {
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlossaryForm {
    pub internal_name: String,
    pub backward_compatibility: String,
}

impl Resource for GlossaryEntry {
    type Payload = GlossaryPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "glossary",
        singular: "glossary entry",
        plural: "glossary",
        display: "Glossary entry",
        default_policy: DefaultPolicy::None,
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
}

impl Editable for GlossaryEntry {
    type Form = GlossaryForm;

    fn blank_form(_defaults: &FormDefaults) -> GlossaryForm {
        GlossaryForm::default()
    }

    fn to_form(&self) -> GlossaryForm {
        GlossaryForm {
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
        }
    }

    fn form_payload(form: &GlossaryForm) -> GlossaryPayload {
        GlossaryPayload {
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
        }
    }
}
