//! Inventory item returns awaiting approval at a warehouse.
use super::{record_id, required};
use chrono::NaiveDate;
use resource_slice::{InsertPosition, Resource, SliceError};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Item Returns.
    ItemReturnId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Requested,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReturn {
    pub id: ItemReturnId,
    pub item_code: String,
    pub warehouse_id: u64,
    pub quantity: u32,
    pub reason: String,
    pub status: ReturnStatus,
    pub returned_on: NaiveDate,
}

impl ItemReturn {
    /// Only requested returns can be approved or rejected.
    pub fn ensure_pending(&self) -> Result<(), SliceError> {
        if self.status != ReturnStatus::Requested {
            return Err(SliceError::Validation(format!(
                "return {} was already {:?}",
                self.id, self.status
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReturnFilters {
    pub status: Option<ReturnStatus>,
    pub warehouse_id: Option<u64>,
    pub item_code: Option<String>,
    pub returned_from: Option<NaiveDate>,
    pub returned_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReturnCreate {
    pub item_code: String,
    pub warehouse_id: u64,
    pub quantity: u32,
    pub reason: String,
    pub returned_on: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReturnUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Resource for ItemReturn {
    type Id = ItemReturnId;
    type Filters = ItemReturnFilters;
    type Create = ItemReturnCreate;
    type Update = ItemReturnUpdate;

    const PATH: &'static str = "/inventory/returns";
    const NAME: &'static str = "item_returns";
    const INSERT_POSITION: InsertPosition = InsertPosition::Prepend;

    fn id(&self) -> &ItemReturnId {
        &self.id
    }

    fn validate_create(payload: &ItemReturnCreate) -> Result<(), SliceError> {
        required("item code", &payload.item_code)?;
        required("reason", &payload.reason)?;
        if payload.quantity == 0 {
            return Err(SliceError::Validation("quantity must be at least 1".to_string()));
        }
        Ok(())
    }

    fn validate_update(payload: &ItemReturnUpdate) -> Result<(), SliceError> {
        if payload.quantity == Some(0) {
            return Err(SliceError::Validation("quantity must be at least 1".to_string()));
        }
        Ok(())
    }
}
