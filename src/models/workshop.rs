//! Workshop model.

use serde::{Deserialize, Serialize};

use super::resource::{
    none_if_empty, DefaultPolicy, Editable, FieldValue, FormDefaults, Resource, ResourceKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: String,
    pub name: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopPayload {
    pub name: String,
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopForm {
    pub name: String,
    pub internal_name: String,
    pub backward_compatibility: String,
}

impl Resource for Workshop {
    type Payload = WorkshopPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "workshop",
        singular: "workshop",
        plural: "workshops",
        display: "Workshop",
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

    fn extra_field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "name" => FieldValue::Text(&self.name),
            _ => FieldValue::Null,
        }
    }
}

impl Editable for Workshop {
    type Form = WorkshopForm;

    fn blank_form(_defaults: &FormDefaults) -> WorkshopForm {
        WorkshopForm::default()
    }

    fn to_form(&self) -> WorkshopForm {
        WorkshopForm {
            name: self.name.clone(),
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
        }
    }

    fn form_payload(form: &WorkshopForm) -> WorkshopPayload {
        WorkshopPayload {
            name: form.name.clone(),
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
        }
    }
}
