//! # Resource Trait
//!
//! The `Resource` trait is the contract every domain record (communication, receivable,
//! item return, template, ...) implements to be managed by a generic slice. It names the
//! record's id, its filter schema and its create/update payloads, and declares the
//! domain's merge policy for mutations.
//!
//! # Architecture Note
//! The reducer, the store and the slice handle are written *once* against this trait.
//! Associated types keep each domain's payloads apart: a receivable slice only accepts a
//! `ReceivableCreate`, and its filters are a `ReceivableFilters`, never a loose map of keys.

use crate::error::SliceError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// Marker for per-domain filter records.
///
/// Filters are plain serde records with optional fields; unset fields are skipped when
/// the record is turned into query parameters (see [`crate::page::query_params`]).
pub trait FilterSet:
    Serialize + Clone + PartialEq + Default + Debug + Send + Sync + 'static
{
}

impl<T> FilterSet for T where
    T: Serialize + Clone + PartialEq + Default + Debug + Send + Sync + 'static
{
}

/// Where a freshly created record lands in `items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Append,
    Prepend,
}

/// Trait that any domain record must implement to be managed by a resource slice.
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The backend identifier. Rendered with `Display` into `<PATH>/<id>`.
    type Id: Clone + Eq + Display + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// The typed filter record for list requests.
    type Filters: FilterSet;

    /// Body of `POST <PATH>`.
    type Create: Serialize + Debug + Send + Sync + 'static;

    /// Body of `PATCH <PATH>/<id>`. Usually every field is optional.
    type Update: Serialize + Debug + Send + Sync + 'static;

    /// Collection path on the backend, e.g. `/receivables`.
    const PATH: &'static str;

    /// Short name used in logs.
    const NAME: &'static str;

    /// List-ordering convention for `create`.
    const INSERT_POSITION: InsertPosition = InsertPosition::Append;

    /// Re-issue the current list query after every successful mutation.
    const REFETCH_AFTER_MUTATION: bool = false;

    fn id(&self) -> &Self::Id;

    /// Checked before a create is dispatched. A failure never reaches the store.
    fn validate_create(_payload: &Self::Create) -> Result<(), SliceError> {
        Ok(())
    }

    /// Checked before an update is dispatched.
    fn validate_update(_payload: &Self::Update) -> Result<(), SliceError> {
        Ok(())
    }
}
