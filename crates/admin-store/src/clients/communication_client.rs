//! # Communication Client
//!
//! Wraps the communications slice and adds `resend`.
use crate::model::{Communication, CommunicationId, CommunicationStatus};
use crate::store::AppReducer;
use async_trait::async_trait;
use resource_slice::{Settled, SliceClient, SliceError, SliceHandle};
use tracing::{debug, instrument};

/// Client for the communications slice.
#[derive(Clone)]
pub struct CommunicationClient {
    slice: SliceHandle<AppReducer, Communication>,
}

impl CommunicationClient {
    pub fn new(slice: SliceHandle<AppReducer, Communication>) -> Self {
        Self { slice }
    }

    /// Queues a failed (or already sent) communication for delivery again.
    ///
    /// Drafts have never been sent and are rejected locally.
    #[instrument(skip(self))]
    pub async fn resend(&self, id: CommunicationId) -> Result<Settled<Communication>, SliceError> {
        if let Some(known) = self.slice.state().find(&id) {
            if known.status == CommunicationStatus::Draft {
                return Err(SliceError::Validation(format!(
                    "communication {} is a draft",
                    id
                )));
            }
        }
        debug!("Sending request");
        self.slice.action(id, "resend", None).await
    }
}

#[async_trait]
impl SliceClient<AppReducer, Communication> for CommunicationClient {
    fn slice(&self) -> &SliceHandle<AppReducer, Communication> {
        &self.slice
    }
}
