//! # Resource Slice
//!
//! This crate provides the building blocks for a client-side state store of paginated,
//! filterable backend resources. It implements the **slice pattern** on top of the
//! **Actor Model**: one task owns the whole state tree, and every change to it is an
//! intent reduced in arrival order.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into four layers:
//!
//! 1. **Resource Layer** ([`Resource`]) - a domain record, its filters, payloads and merge policy
//! 2. **State Layer** ([`ResourceState`], [`SliceReducer`]) - pure transitions over one slice
//! 3. **Runtime Layer** ([`Store`], [`StoreHandle`]) - the actor that owns and publishes state
//! 4. **Interface Layer** ([`SliceHandle`], [`SliceClient`]) - async operations that do the I/O
//!
//! A domain is written **once** as a `Resource` implementation; the reducer, the store and
//! the async operations are generic over it.
//!
//! ## Request lifecycle
//!
//! Every async operation dispatches `Pending`, performs its request through a
//! [`RemoteClient`], then dispatches `Fulfilled` or `Rejected`:
//!
//! ```text
//! list(filters, page)
//!   -> List(Pending(query))                  loading = true, token #n issued
//!   -> GET /receivables?status=open&pageNumber=1&pageSize=20
//!   -> List(Fulfilled { token: #n, page })   items replaced, loading = false
//! ```
//!
//! The reducer tags each issued operation with a [`RequestToken`]. A list or get result
//! whose token is no longer the latest one is dropped, and so is an update result once a
//! newer update to the same record has been issued. Overlapping requests can never let
//! an older response overwrite a newer one.
//!
//! ## Composing a store
//!
//! An application's store root holds one [`ResourceState`] per domain and implements
//! [`Reducer`] by routing each wrapped intent to [`SliceReducer`]. Implementing
//! [`SliceOf`] for each domain lets a [`SliceHandle`] find its slice:
//!
//! ```rust,ignore
//! impl SliceOf<Template> for AppReducer {
//!     fn wrap(intent: SliceIntent<Template>) -> AppIntent { AppIntent::Templates(intent) }
//!     fn project(state: &AppState) -> &ResourceState<Template> { &state.templates }
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockRemote`] answers requests from an in-memory expectation queue, and can hold
//! responses behind gates to reproduce out-of-order arrivals deterministically.

pub mod client_trait;
pub mod error;
pub mod intent;
pub mod mock;
pub mod page;
pub mod reducer;
pub mod remote;
pub mod resource;
pub mod slice;
pub mod state;
pub mod store;
pub mod telemetry;

// Re-export core types for convenience
pub use client_trait::SliceClient;
pub use error::{ErrorInfo, SliceError};
pub use intent::{Lifecycle, SliceIntent};
pub use page::{ListQuery, PageLimits, PageRequest, PaginatedResponse, Pagination};
pub use reducer::{Reducer, SliceReducer};
pub use remote::{HttpClient, HttpConfig, Method, RemoteClient, RemoteRequest};
pub use resource::{FilterSet, InsertPosition, Resource};
pub use slice::{Settled, SliceHandle};
pub use state::{IssuedTokens, RequestToken, ResourceState};
pub use store::{ListenerHandle, SliceOf, Store, StoreHandle, Subscription};
