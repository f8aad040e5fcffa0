//! # Template Client
use crate::model::{Template, TemplateId};
use crate::store::AppReducer;
use async_trait::async_trait;
use resource_slice::{Settled, SliceClient, SliceError, SliceHandle};
use tracing::{debug, instrument};

/// Client for the templates slice.
#[derive(Clone)]
pub struct TemplateClient {
    slice: SliceHandle<AppReducer, Template>,
}

impl TemplateClient {
    pub fn new(slice: SliceHandle<AppReducer, Template>) -> Self {
        Self { slice }
    }

    /// Makes a template the default of its kind. The list is refetched afterwards so
    /// the previous default shows as demoted.
    ///
    /// A template already listed as the default is returned as is, without a request.
    #[instrument(skip(self))]
    pub async fn make_default(&self, id: TemplateId) -> Result<Settled<Template>, SliceError> {
        let state = self.slice.state();
        if let Some(current) = state.find(&id).filter(|t| t.is_default) {
            debug!("Already the default");
            return Ok(Settled::Applied(current.clone()));
        }
        debug!("Sending request");
        self.slice.action(id, "default", None).await
    }
}

#[async_trait]
impl SliceClient<AppReducer, Template> for TemplateClient {
    fn slice(&self) -> &SliceHandle<AppReducer, Template> {
        &self.slice
    }
}
