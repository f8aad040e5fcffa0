//! # SliceClient Trait
//!
//! Provides a common interface for domain clients, adding default `get`, `remove`,
//! `refresh` and `state` methods built on top of a generic [`SliceHandle`].
use crate::error::SliceError;
use crate::resource::Resource;
use crate::slice::{Settled, SliceHandle};
use crate::state::ResourceState;
use crate::store::SliceOf;
use crate::page::Pagination;
use async_trait::async_trait;

/// Trait for domain clients to inherit the standard slice operations.
///
/// A domain client wraps a [`SliceHandle`] and adds the operations that only make
/// sense for its resource (resending a message, registering a payment, ...). The
/// generic ones come for free.
///
/// # Example
///
/// ```rust,ignore
/// struct TemplateClient {
///     slice: SliceHandle<AppReducer, Template>,
/// }
///
/// #[async_trait]
/// impl SliceClient<AppReducer, Template> for TemplateClient {
///     fn slice(&self) -> &SliceHandle<AppReducer, Template> {
///         &self.slice
///     }
/// }
///
/// // get(), remove(), refresh() and state() are provided automatically
/// let template = client.get(7).await?;
/// ```
#[async_trait]
pub trait SliceClient<S: SliceOf<R>, R: Resource>: Send + Sync {
    /// Access the inner generic slice handle.
    fn slice(&self) -> &SliceHandle<S, R>;

    /// Fetch one record and make it the selection.
    #[tracing::instrument(skip(self), fields(slice = R::NAME))]
    async fn get(&self, id: R::Id) -> Result<Settled<R>, SliceError> {
        tracing::debug!("Sending request");
        self.slice().get_by_id(id).await
    }

    /// Delete one record.
    #[tracing::instrument(skip(self), fields(slice = R::NAME))]
    async fn remove(&self, id: R::Id) -> Result<Settled<R::Id>, SliceError> {
        tracing::debug!("Sending request");
        self.slice().remove(id).await
    }

    /// Re-run the current list query.
    async fn refresh(&self) -> Result<Settled<Pagination>, SliceError> {
        self.slice().refresh().await
    }

    fn state(&self) -> ResourceState<R> {
        self.slice().state()
    }
}
