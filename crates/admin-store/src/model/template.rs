//! Document templates used to render invoices, receipts and emails.
//!
//! Only one template per kind is the default, and making one the default demotes the
//! previous one on the backend; the list is refetched after every mutation so both
//! changes are visible.
use super::{record_id, required};
use resource_slice::{InsertPosition, Resource, SliceError};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Templates.
    TemplateId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Invoice,
    Receipt,
    Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub kind: TemplateKind,
    pub body: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFilters {
    pub kind: Option<TemplateKind>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCreate {
    pub name: String,
    pub kind: TemplateKind,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Resource for Template {
    type Id = TemplateId;
    type Filters = TemplateFilters;
    type Create = TemplateCreate;
    type Update = TemplateUpdate;

    const PATH: &'static str = "/templates";
    const NAME: &'static str = "templates";
    const INSERT_POSITION: InsertPosition = InsertPosition::Append;
    const REFETCH_AFTER_MUTATION: bool = true;

    fn id(&self) -> &TemplateId {
        &self.id
    }

    fn validate_create(payload: &TemplateCreate) -> Result<(), SliceError> {
        required("name", &payload.name)?;
        required("body", &payload.body)
    }

    fn validate_update(payload: &TemplateUpdate) -> Result<(), SliceError> {
        if let Some(name) = &payload.name {
            required("name", name)?;
        }
        if let Some(body) = &payload.body {
            required("body", body)?;
        }
        Ok(())
    }
}
