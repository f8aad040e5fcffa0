//! # Item Return Client
use crate::model::{ItemReturn, ItemReturnId};
use crate::store::AppReducer;
use async_trait::async_trait;
use resource_slice::{Settled, SliceClient, SliceError, SliceHandle};
use serde_json::json;
use tracing::{debug, instrument};

/// Client for the item returns slice.
#[derive(Clone)]
pub struct ItemReturnClient {
    slice: SliceHandle<AppReducer, ItemReturn>,
}

impl ItemReturnClient {
    pub fn new(slice: SliceHandle<AppReducer, ItemReturn>) -> Self {
        Self { slice }
    }

    fn ensure_pending(&self, id: ItemReturnId) -> Result<(), SliceError> {
        match self.slice.state().find(&id) {
            Some(known) => known.ensure_pending(),
            None => Ok(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: ItemReturnId) -> Result<Settled<ItemReturn>, SliceError> {
        self.ensure_pending(id)?;
        debug!("Sending request");
        self.slice.action(id, "approve", None).await
    }

    /// Rejects a requested return. The reason is mandatory.
    #[instrument(skip(self))]
    pub async fn reject(
        &self,
        id: ItemReturnId,
        reason: &str,
    ) -> Result<Settled<ItemReturn>, SliceError> {
        if reason.trim().is_empty() {
            return Err(SliceError::Validation(
                "a rejection reason is required".to_string(),
            ));
        }
        self.ensure_pending(id)?;
        debug!("Sending request");
        self.slice
            .action(id, "reject", Some(json!({ "reason": reason.trim() })))
            .await
    }
}

#[async_trait]
impl SliceClient<AppReducer, ItemReturn> for ItemReturnClient {
    fn slice(&self) -> &SliceHandle<AppReducer, ItemReturn> {
        &self.slice
    }
}
