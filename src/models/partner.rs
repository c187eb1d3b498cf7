//! Partner model.

use serde::{Deserialize, Serialize};

use super::resource::{
    none_if_empty, DefaultPolicy, Editable, FieldValue, FormDefaults, Resource, ResourceKind,
};
use super::Country;

/// Kind of partner organisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerType {
    #[default]
    Museum,
    Institution,
    Individual,
}

impl PartnerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerType::Museum => "museum",
            PartnerType::Institution => "institution",
            PartnerType::Individual => "individual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "museum" => Some(PartnerType::Museum),
            "institution" => Some(PartnerType::Institution),
            "individual" => Some(PartnerType::Individual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(rename = "type")]
    pub partner_type: PartnerType,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerPayload {
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
    #[serde(rename = "type")]
    pub partner_type: PartnerType,
    pub country_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerForm {
    pub internal_name: String,
    pub backward_compatibility: String,
    pub partner_type: PartnerType,
    pub country_id: String,
}

impl Resource for Partner {
    type Payload = PartnerPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "partner",
        singular: "partner",
        plural: "partners",
        display: "Partner",
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
            "type" => FieldValue::Text(self.partner_type.as_str()),
            "country_id" => self.country.as_ref().map(|c| c.id.as_str()).into(),
            _ => FieldValue::Null,
        }
    }
}

impl Editable for Partner {
    type Form = PartnerForm;

    fn blank_form(_defaults: &FormDefaults) -> PartnerForm {
        PartnerForm::default()
    }

    fn to_form(&self) -> PartnerForm {
        PartnerForm {
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
            partner_type: self.partner_type,
            country_id: self.country.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
        }
    }

    fn form_payload(form: &PartnerForm) -> PartnerPayload {
        PartnerPayload {
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
            partner_type: form.partner_type,
            country_id: none_if_empty(&form.country_id),
        }
    }
}
