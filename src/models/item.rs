//! Item model.

use serde::{Deserialize, Serialize};

use super::resource::{
    none_if_empty, DefaultPolicy, Editable, FieldValue, FormDefaults, Resource, ResourceKind,
};
use super::{Country, Partner, Project};

/// What a catalogue item describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Object,
    Monument,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Object => "object",
            ItemType::Monument => "monument",
        }
    }
}

/// A catalogue item: an object or a monument, owned by a partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub internal_name: String,
    #[serde(default)]
    pub backward_compatibility: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub owner_reference: Option<String>,
    #[serde(default)]
    pub mwnf_reference: Option<String>,
    #[serde(default)]
    pub partner: Option<Partner>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub internal_name: String,
    pub backward_compatibility: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub owner_reference: Option<String>,
    pub mwnf_reference: Option<String>,
    pub partner_id: Option<String>,
    pub project_id: Option<String>,
    pub country_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub internal_name: String,
    pub backward_compatibility: String,
    pub item_type: ItemType,
    pub owner_reference: String,
    pub mwnf_reference: String,
    pub partner_id: String,
    pub project_id: String,
    pub country_id: String,
}

impl Resource for Item {
    type Payload = ItemPayload;

    const KIND: ResourceKind = ResourceKind {
        path: "item",
        singular: "item",
        plural: "items",
        display: "Item",
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
            "type" => FieldValue::Text(self.item_type.as_str()),
            "owner_reference" => self.owner_reference.as_deref().into(),
            "mwnf_reference" => self.mwnf_reference.as_deref().into(),
            "partner_id" => self.partner.as_ref().map(|p| p.id.as_str()).into(),
            "project_id" => self.project.as_ref().map(|p| p.id.as_str()).into(),
            "country_id" => self.country.as_ref().map(|c| c.id.as_str()).into(),
            _ => FieldValue::Null,
        }
    }
}

impl Editable for Item {
    type Form = ItemForm;

    fn blank_form(_defaults: &FormDefaults) -> ItemForm {
        ItemForm::default()
    }

    fn to_form(&self) -> ItemForm {
        ItemForm {
            internal_name: self.internal_name.clone(),
            backward_compatibility: self.backward_compatibility.clone().unwrap_or_default(),
            item_type: self.item_type,
            owner_reference: self.owner_reference.clone().unwrap_or_default(),
            mwnf_reference: self.mwnf_reference.clone().unwrap_or_default(),
            partner_id: self.partner.as_ref().map(|p| p.id.clone()).unwrap_or_default(),
            project_id: self.project.as_ref().map(|p| p.id.clone()).unwrap_or_default(),
            country_id: self.country.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
        }
    }

    fn form_payload(form: &ItemForm) -> ItemPayload {
        ItemPayload {
            internal_name: form.internal_name.clone(),
            backward_compatibility: none_if_empty(&form.backward_compatibility),
            item_type: form.item_type,
            owner_reference: none_if_empty(&form.owner_reference),
            mwnf_reference: none_if_empty(&form.mwnf_reference),
            partner_id: none_if_empty(&form.partner_id),
            project_id: none_if_empty(&form.project_id),
            country_id: none_if_empty(&form.country_id),
        }
    }
}
