//! # Slice Handle
//!
//! [`SliceHandle`] is the async face of one resource slice. Each operation follows the
//! same recipe:
//!
//! 1. dispatch `Pending` and read the issued token from the returned snapshot,
//! 2. perform the I/O through the [`RemoteClient`],
//! 3. dispatch `Fulfilled` or `Rejected` carrying that token.
//!
//! Transport and backend failures never come back as `Err`: they are folded into the
//! slice state and reported as [`Settled::Rejected`]. `Err` is reserved for payloads
//! that fail validation (nothing is dispatched) and for a store that has shut down.

use crate::error::{ErrorInfo, SliceError};
use crate::intent::{Lifecycle, SliceIntent};
use crate::page::{ListQuery, PageLimits, PageRequest, PaginatedResponse, Pagination};
use crate::remote::{Method, RemoteClient, RemoteRequest};
use crate::resource::Resource;
use crate::state::{RequestToken, ResourceState};
use crate::store::{SliceOf, StoreHandle};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How an issued operation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    /// The result was folded into state.
    Applied(T),
    /// The operation failed; the error is now in state (or deferred behind a loading list).
    Rejected(ErrorInfo),
    /// A newer operation of the same kind (for updates, on the same record) was issued;
    /// this result was dropped.
    Superseded,
}

impl<T> Settled<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Settled::Applied(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Settled::Applied(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Settled<U> {
        match self {
            Settled::Applied(value) => Settled::Applied(f(value)),
            Settled::Rejected(error) => Settled::Rejected(error),
            Settled::Superseded => Settled::Superseded,
        }
    }
}

/// The cancellation token of the list currently in flight.
type InFlightList = Option<(RequestToken, CancellationToken)>;

/// Async operations for resource `R` living in the store rooted at `S`.
pub struct SliceHandle<S: SliceOf<R>, R: Resource> {
    store: StoreHandle<S>,
    remote: Arc<dyn RemoteClient>,
    limits: PageLimits,
    in_flight_list: Arc<Mutex<InFlightList>>,
    _resource: PhantomData<fn() -> R>,
}

impl<S: SliceOf<R>, R: Resource> Clone for SliceHandle<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            remote: self.remote.clone(),
            limits: self.limits,
            in_flight_list: self.in_flight_list.clone(),
            _resource: PhantomData,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SliceError> {
    Ok(serde_json::from_value(value)?)
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value, SliceError> {
    serde_json::to_value(payload).map_err(SliceError::invalid_payload)
}

impl<S: SliceOf<R>, R: Resource> SliceHandle<S, R> {
    pub fn new(store: StoreHandle<S>, remote: Arc<dyn RemoteClient>, limits: PageLimits) -> Self {
        Self {
            store,
            remote,
            limits,
            in_flight_list: Arc::new(Mutex::new(None)),
            _resource: PhantomData,
        }
    }

    pub fn store(&self) -> &StoreHandle<S> {
        &self.store
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// A snapshot of this slice.
    pub fn state(&self) -> ResourceState<R> {
        S::project(&self.store.get_state()).clone()
    }

    async fn dispatch(&self, intent: SliceIntent<R>) -> Result<Arc<S::State>, SliceError> {
        self.store.dispatch(S::wrap(intent)).await
    }

    fn item_path(id: &R::Id) -> String {
        format!("{}/{}", R::PATH, id)
    }

    // --- List ---

    /// Fetches one page. Changing filters sends the request to page 1.
    ///
    /// Issuing a list cancels the one still in flight, and only the latest issued list
    /// can land in state.
    #[instrument(skip(self), fields(slice = R::NAME))]
    pub async fn list(
        &self,
        filters: R::Filters,
        page: PageRequest,
    ) -> Result<Settled<Pagination>, SliceError> {
        let query = ListQuery::new(filters, page.within(self.limits));
        let snapshot = self
            .dispatch(SliceIntent::List(Lifecycle::Pending(query)))
            .await?;
        let slice = S::project(&snapshot);
        let token = slice.tokens().list;
        let query = ListQuery::new(slice.filters().clone(), slice.pagination().request());
        debug!(%token, ?query, "list issued");

        let Some(cancel) = self.claim_list(token) else {
            debug!(%token, "list superseded before sending");
            return Ok(Settled::Superseded);
        };

        let request = RemoteRequest::new(Method::Get, R::PATH).with_params(query.params());
        let result = tokio::select! {
            _ = cancel.cancelled() => None,
            result = self.remote.request(request) => Some(result),
        };
        self.release_list(token);

        let Some(result) = result else {
            debug!(%token, "list cancelled");
            self.dispatch(SliceIntent::List(Lifecycle::Cancelled { token }))
                .await?;
            return Ok(Settled::Superseded);
        };

        match result.and_then(decode::<PaginatedResponse<R>>) {
            Ok(response) => {
                let pagination = response.pagination();
                let received = response.data.len();
                let snapshot = self
                    .dispatch(SliceIntent::List(Lifecycle::Fulfilled {
                        token,
                        value: response,
                    }))
                    .await?;
                if S::project(&snapshot).tokens().list != token {
                    debug!(%token, "stale list response dropped");
                    return Ok(Settled::Superseded);
                }
                info!(%token, received, total = pagination.total_results, "Listed");
                Ok(Settled::Applied(pagination))
            }
            Err(err) => {
                warn!(%token, error = %err, "list failed");
                let error = ErrorInfo::from(&err);
                let snapshot = self
                    .dispatch(SliceIntent::List(Lifecycle::Rejected {
                        token,
                        error: error.clone(),
                    }))
                    .await?;
                if S::project(&snapshot).tokens().list != token {
                    return Ok(Settled::Superseded);
                }
                Ok(Settled::Rejected(error))
            }
        }
    }

    /// Registers `token` as the list in flight, cancelling an older one.
    /// Returns `None` if a newer list has already claimed the slot.
    fn claim_list(&self, token: RequestToken) -> Option<CancellationToken> {
        let mut slot = self.in_flight_list.lock();
        if let Some((current, previous)) = slot.as_ref() {
            if *current > token {
                return None;
            }
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        *slot = Some((token, cancel.clone()));
        Some(cancel)
    }

    fn release_list(&self, token: RequestToken) {
        let mut slot = self.in_flight_list.lock();
        if slot.as_ref().is_some_and(|(current, _)| *current == token) {
            *slot = None;
        }
    }

    /// Abandons the list in flight, if any. Its response will be ignored.
    pub fn cancel_list(&self) -> bool {
        match self.in_flight_list.lock().as_ref() {
            Some((token, cancel)) => {
                debug!(slice = R::NAME, %token, "cancel requested");
                cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Re-issues the current query (filters and page).
    pub async fn refresh(&self) -> Result<Settled<Pagination>, SliceError> {
        let current = self.state();
        self.list(current.filters().clone(), current.pagination().request())
            .await
    }

    /// Lists with new filters from page 1, keeping the page size.
    pub async fn set_filters(&self, filters: R::Filters) -> Result<Settled<Pagination>, SliceError> {
        let size = self.state().pagination().page_size;
        self.list(filters, PageRequest::first(size)).await
    }

    /// Moves to another page with the current filters.
    pub async fn set_page(&self, number: u32) -> Result<Settled<Pagination>, SliceError> {
        let current = self.state();
        let size = current.pagination().page_size;
        self.list(current.filters().clone(), PageRequest::new(number, size))
            .await
    }

    /// Changes the page size with the current filters, staying on the current page.
    pub async fn set_page_size(&self, size: u32) -> Result<Settled<Pagination>, SliceError> {
        let current = self.state();
        let number = current.pagination().page_number;
        self.list(current.filters().clone(), PageRequest::new(number, size))
            .await
    }

    // --- Get ---

    #[instrument(skip(self), fields(slice = R::NAME))]
    pub async fn get_by_id(&self, id: R::Id) -> Result<Settled<R>, SliceError> {
        let snapshot = self
            .dispatch(SliceIntent::Get(Lifecycle::Pending(id.clone())))
            .await?;
        let token = S::project(&snapshot).tokens().get;

        let request = RemoteRequest::new(Method::Get, Self::item_path(&id));
        match self.remote.request(request).await.and_then(decode::<R>) {
            Ok(record) => {
                let snapshot = self
                    .dispatch(SliceIntent::Get(Lifecycle::Fulfilled {
                        token,
                        value: record.clone(),
                    }))
                    .await?;
                if S::project(&snapshot).tokens().get != token {
                    return Ok(Settled::Superseded);
                }
                debug!(%token, %id, "Selected");
                Ok(Settled::Applied(record))
            }
            Err(err) => {
                warn!(%token, %id, error = %err, "get failed");
                self.reject(token, err, |token, error| {
                    SliceIntent::Get(Lifecycle::Rejected { token, error })
                })
                .await
            }
        }
    }

    // --- Mutations ---

    #[instrument(skip(self), fields(slice = R::NAME))]
    pub async fn create(&self, payload: R::Create) -> Result<Settled<R>, SliceError> {
        R::validate_create(&payload)?;
        let body = to_body(&payload)?;

        let snapshot = self
            .dispatch(SliceIntent::Create(Lifecycle::Pending(())))
            .await?;
        let token = S::project(&snapshot).tokens().create;

        let request = RemoteRequest::new(Method::Post, R::PATH).with_body(body);
        match self.remote.request(request).await.and_then(decode::<R>) {
            Ok(record) => {
                self.dispatch(SliceIntent::Create(Lifecycle::Fulfilled {
                    token,
                    value: record.clone(),
                }))
                .await?;
                info!(%token, id = %record.id(), "Created");
                self.refetch_after_mutation().await?;
                Ok(Settled::Applied(record))
            }
            Err(err) => {
                warn!(%token, error = %err, "create failed");
                self.reject(token, err, |token, error| {
                    SliceIntent::Create(Lifecycle::Rejected { token, error })
                })
                .await
            }
        }
    }

    #[instrument(skip(self), fields(slice = R::NAME))]
    pub async fn update(&self, id: R::Id, payload: R::Update) -> Result<Settled<R>, SliceError> {
        R::validate_update(&payload)?;
        let body = to_body(&payload)?;
        let request = RemoteRequest::new(Method::Patch, Self::item_path(&id)).with_body(body);
        self.send_update(id, request).await
    }

    /// Runs a domain action, `POST <PATH>/<id>/<action>`, that answers with the
    /// updated record. The result is folded into state like an update.
    #[instrument(skip(self, body), fields(slice = R::NAME))]
    pub async fn action(
        &self,
        id: R::Id,
        action: &str,
        body: Option<Value>,
    ) -> Result<Settled<R>, SliceError> {
        let path = format!("{}/{}", Self::item_path(&id), action);
        let mut request = RemoteRequest::new(Method::Post, path);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.send_update(id, request).await
    }

    /// Issues an update and folds its result. A newer update to the same record
    /// supersedes this one; updates to other records do not.
    async fn send_update(&self, id: R::Id, request: RemoteRequest) -> Result<Settled<R>, SliceError> {
        let snapshot = self
            .dispatch(SliceIntent::Update(Lifecycle::Pending(id.clone())))
            .await?;
        let token = S::project(&snapshot).tokens().update;

        match self.remote.request(request).await.and_then(decode::<R>) {
            Ok(record) => {
                let snapshot = self
                    .dispatch(SliceIntent::Update(Lifecycle::Fulfilled {
                        token,
                        value: record.clone(),
                    }))
                    .await?;
                if !S::project(&snapshot).update_landed(token) {
                    debug!(%token, %id, "stale update response dropped");
                    return Ok(Settled::Superseded);
                }
                info!(%token, %id, "Updated");
                self.refetch_after_mutation().await?;
                Ok(Settled::Applied(record))
            }
            Err(err) => {
                warn!(%token, %id, error = %err, "update failed");
                let error = ErrorInfo::from(&err);
                let snapshot = self
                    .dispatch(SliceIntent::Update(Lifecycle::Rejected {
                        token,
                        error: error.clone(),
                    }))
                    .await?;
                if !S::project(&snapshot).update_landed(token) {
                    return Ok(Settled::Superseded);
                }
                Ok(Settled::Rejected(error))
            }
        }
    }

    #[instrument(skip(self), fields(slice = R::NAME))]
    pub async fn remove(&self, id: R::Id) -> Result<Settled<R::Id>, SliceError> {
        let snapshot = self
            .dispatch(SliceIntent::Remove(Lifecycle::Pending(id.clone())))
            .await?;
        let token = S::project(&snapshot).tokens().remove;

        let request = RemoteRequest::new(Method::Delete, Self::item_path(&id));
        match self.remote.request(request).await {
            Ok(_) => {
                self.dispatch(SliceIntent::Remove(Lifecycle::Fulfilled {
                    token,
                    value: id.clone(),
                }))
                .await?;
                info!(%token, %id, "Removed");
                self.refetch_after_mutation().await?;
                Ok(Settled::Applied(id))
            }
            Err(err) => {
                warn!(%token, %id, error = %err, "remove failed");
                self.reject(token, err, |token, error| {
                    SliceIntent::Remove(Lifecycle::Rejected { token, error })
                })
                .await
            }
        }
    }

    async fn refetch_after_mutation(&self) -> Result<(), SliceError> {
        if R::REFETCH_AFTER_MUTATION {
            self.refresh().await?;
        }
        Ok(())
    }

    async fn reject<T>(
        &self,
        token: RequestToken,
        err: SliceError,
        intent: impl FnOnce(RequestToken, ErrorInfo) -> SliceIntent<R>,
    ) -> Result<Settled<T>, SliceError> {
        let error = ErrorInfo::from(&err);
        self.dispatch(intent(token, error.clone())).await?;
        Ok(Settled::Rejected(error))
    }

    // --- Local intents ---

    /// Selects a record already present in `items`.
    pub async fn select(&self, id: R::Id) -> Result<Option<R>, SliceError> {
        let snapshot = self.dispatch(SliceIntent::Select(id)).await?;
        Ok(S::project(&snapshot).selected().cloned())
    }

    pub async fn clear_selection(&self) -> Result<(), SliceError> {
        self.dispatch(SliceIntent::ClearSelection).await?;
        Ok(())
    }

    pub async fn clear_error(&self) -> Result<(), SliceError> {
        self.dispatch(SliceIntent::ClearError).await?;
        Ok(())
    }
}
