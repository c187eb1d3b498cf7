//! Country model. Countries are keyed by their ISO 3166-1 alpha-3 code.

use serde::{Deserialize, Serialize};

use super::resource::{none_if_empty, DefaultPolicy, Editable, FormDefaults, Resource, ResourceKind};

/// A country record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating or updating a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryPayload {
    pub id: String,
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
}

/// Draft form for the country detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryForm {
    pub id: String,
    pub internal_name: String,
    pub backward_compatibility: String,
}

impl Resource for Country {
    type Payload = CountryPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "country",
        singular: "country",
        plural: "countries",
        display: "Country",
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

impl Editable for Country {
    type Form = CountryForm;

    fn blank_form(_defaults: &FormDefaults) -> CountryForm {
        CountryForm::default()
    }

    fn to_form(&self) -> CountryForm {
        CountryForm {
            id: self.id.clone(),
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
        }
    }

    fn form_payload(form: &CountryForm) -> CountryPayload {
        CountryPayload {
            id: form.id.clone(),
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
        }
    }
}
