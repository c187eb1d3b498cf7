//! Project model.

use serde::{Deserialize, Serialize};

use super::resource::{
    date_input_value, none_if_empty, DefaultPolicy, Editable, FieldValue, FormDefaults, Resource,
    ResourceKind, StatusField,
};
use super::{Context, Language};

/// A project. `context` and `language` are resolved server-side on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub is_launched: bool,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating or updating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
    pub launch_date: Option<String>,
    pub context_id: Option<String>,
    pub language_id: Option<String>,
}

/// Draft form for the project detail view. `launch_date` is `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub internal_name: String,
    pub backward_compatibility: String,
    pub launch_date: String,
    pub context_id: String,
    pub language_id: String,
}

impl Resource for Project {
    type Payload = ProjectPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "project",
        singular: "project",
        plural: "projects",
        display: "Project",
        default_policy: DefaultPolicy::None,
        status_fields: &[StatusField::Enabled, StatusField::Launched],
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

    fn status_flag(&self, field: StatusField) -> Option<bool> {
        Some(match field {
            StatusField::Enabled => self.is_enabled,
            StatusField::Launched => self.is_launched,
        })
    }

    fn extra_field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "launch_date" => self.launch_date.as_deref().into(),
            _ => FieldValue::Null,
        }
    }
}

impl Editable for Project {
    type Form = ProjectForm;

    fn blank_form(defaults: &FormDefaults) -> ProjectForm {
        ProjectForm {
            context_id: defaults.context_id.clone().unwrap_or_default(),
            language_id: defaults.language_id.clone().unwrap_or_default(),
            ..ProjectForm::default()
        }
    }

    fn to_form(&self) -> ProjectForm {
        ProjectForm {
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
            launch_date: date_input_value(self.launch_date.as_deref()),
            context_id: self.context.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
            language_id: self.language.as_ref().map(|l| l.id.clone()).unwrap_or_default(),
        }
    }

    fn form_payload(form: &ProjectForm) -> ProjectPayload {
        ProjectPayload {
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
            launch_date: none_if_empty(&form.launch_date),
            context_id: none_if_empty(&form.context_id),
            language_id: none_if_empty(&form.language_id),
        }
    }
}
