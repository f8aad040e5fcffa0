//! # Receivable Client
//!
//! Wraps the receivables (CXC) slice and adds customer views and payment registration.
use crate::model::{PaymentCreate, Receivable, ReceivableFilters, ReceivableId};
use crate::store::AppReducer;
use async_trait::async_trait;
use resource_slice::{Pagination, Settled, SliceClient, SliceError, SliceHandle};
use tracing::{debug, info, instrument};

/// Client for the receivables slice.
#[derive(Clone)]
pub struct ReceivableClient {
    slice: SliceHandle<AppReducer, Receivable>,
}

impl ReceivableClient {
    pub fn new(slice: SliceHandle<AppReducer, Receivable>) -> Self {
        Self { slice }
    }

    /// Lists the open documents of one customer, from the first page.
    #[instrument(skip(self))]
    pub async fn open_for_customer(
        &self,
        customer_id: u64,
    ) -> Result<Settled<Pagination>, SliceError> {
        self.slice
            .set_filters(ReceivableFilters::open_for(customer_id))
            .await
    }

    /// Registers a payment against a document.
    ///
    /// The amount is checked against the balance of the document as currently known
    /// (listed or selected); the backend has the final word on documents not loaded.
    #[instrument(skip(self))]
    pub async fn register_payment(
        &self,
        id: ReceivableId,
        payment: PaymentCreate,
    ) -> Result<Settled<Receivable>, SliceError> {
        let state = self.slice.state();
        let known = state
            .find(&id)
            .or_else(|| state.selected().filter(|s| s.id == id));
        payment.validate_against(known)?;

        debug!("Sending request");
        let body = serde_json::to_value(&payment).map_err(SliceError::invalid_payload)?;
        let settled = self.slice.action(id, "payments", Some(body)).await?;
        if let Settled::Applied(receivable) = &settled {
            info!(%id, balance = receivable.balance, "Payment registered");
        }
        Ok(settled)
    }
}

#[async_trait]
impl SliceClient<AppReducer, Receivable> for ReceivableClient {
    fn slice(&self) -> &SliceHandle<AppReducer, Receivable> {
        &self.slice
    }
}
