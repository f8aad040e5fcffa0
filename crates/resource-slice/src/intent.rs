//! # Slice Intents
//!
//! Intents are the only way a slice's state changes. Each async operation produces a
//! [`Lifecycle`] of intents: `Pending` when it is issued, then exactly one of
//! `Fulfilled` or `Rejected` (or `Cancelled` for an abandoned list) when it settles.
//!
//! The lifecycle is a closed enum, so the reducer has to handle every phase of every
//! operation; there is no string-tagged action that can fall through unhandled.

use crate::error::ErrorInfo;
use crate::page::{ListQuery, PaginatedResponse};
use crate::resource::Resource;
use crate::state::RequestToken;

/// The phases of one async operation.
///
/// `P` is what the operation carries when issued, `V` what it resolves to.
/// The reducer assigns the token on `Pending`; later phases must quote it back.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<P, V> {
    Pending(P),
    Fulfilled { token: RequestToken, value: V },
    Rejected { token: RequestToken, error: ErrorInfo },
    Cancelled { token: RequestToken },
}

impl<P, V> Lifecycle<P, V> {
    pub fn phase(&self) -> &'static str {
        match self {
            Lifecycle::Pending(_) => "pending",
            Lifecycle::Fulfilled { .. } => "fulfilled",
            Lifecycle::Rejected { .. } => "rejected",
            Lifecycle::Cancelled { .. } => "cancelled",
        }
    }
}

/// Everything that can happen to one resource slice.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceIntent<R: Resource> {
    List(Lifecycle<ListQuery<R::Filters>, PaginatedResponse<R>>),
    Get(Lifecycle<R::Id, R>),
    Create(Lifecycle<(), R>),
    Update(Lifecycle<R::Id, R>),
    /// Fulfilled with the id that was removed.
    Remove(Lifecycle<R::Id, R::Id>),
    /// Select a record already present in `items`; no I/O.
    Select(R::Id),
    ClearSelection,
    ClearError,
}

impl<R: Resource> SliceIntent<R> {
    /// Short label for logs, e.g. `list/pending`.
    pub fn label(&self) -> String {
        match self {
            SliceIntent::List(lc) => format!("list/{}", lc.phase()),
            SliceIntent::Get(lc) => format!("get/{}", lc.phase()),
            SliceIntent::Create(lc) => format!("create/{}", lc.phase()),
            SliceIntent::Update(lc) => format!("update/{}", lc.phase()),
            SliceIntent::Remove(lc) => format!("remove/{}", lc.phase()),
            SliceIntent::Select(_) => "select".to_string(),
            SliceIntent::ClearSelection => "clear_selection".to_string(),
            SliceIntent::ClearError => "clear_error".to_string(),
        }
    }
}
