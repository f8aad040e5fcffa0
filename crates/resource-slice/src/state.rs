//! # Slice State
//!
//! [`ResourceState`] is what a view reads: the current page of records, the selected
//! record, the active filters and pagination, and the loading/mutating/error flags.
//!
//! Fields are private. The only writer is [`SliceReducer`](crate::reducer::SliceReducer),
//! which runs inside the store task; everyone else sees immutable snapshots.

use crate::error::ErrorInfo;
use crate::page::Pagination;
use crate::resource::Resource;
use std::fmt::{self, Display};

/// Monotonically increasing number identifying an issued operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

impl Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Latest issued token per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IssuedTokens {
    pub list: RequestToken,
    pub get: RequestToken,
    pub create: RequestToken,
    pub update: RequestToken,
    pub remove: RequestToken,
    pub(crate) counter: u64,
}

impl IssuedTokens {
    pub(crate) fn next(&mut self) -> RequestToken {
        self.counter += 1;
        RequestToken(self.counter)
    }
}

/// An update in flight for one record. A newer update to the same record supersedes it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingUpdate<Id> {
    pub(crate) id: Id,
    pub(crate) token: RequestToken,
    pub(crate) superseded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<R: Resource> {
    pub(crate) items: Vec<R>,
    pub(crate) selected: Option<R>,
    pub(crate) filters: R::Filters,
    pub(crate) pagination: Pagination,
    pub(crate) loading: bool,
    pub(crate) mutations_in_flight: usize,
    pub(crate) error: Option<ErrorInfo>,
    /// An error that arrived while a list was loading; surfaces when the list settles.
    pub(crate) deferred_error: Option<ErrorInfo>,
    pub(crate) tokens: IssuedTokens,
    pub(crate) pending_updates: Vec<PendingUpdate<R::Id>>,
    /// Outcome of the most recently settled update: its token and whether it landed.
    pub(crate) settled_update: Option<(RequestToken, bool)>,
}

impl<R: Resource> Default for ResourceState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            filters: R::Filters::default(),
            pagination: Pagination::default(),
            loading: false,
            mutations_in_flight: 0,
            error: None,
            deferred_error: None,
            tokens: IssuedTokens::default(),
            pending_updates: Vec::new(),
            settled_update: None,
        }
    }
}

impl<R: Resource> ResourceState<R> {
    /// An empty state whose first list will use `page_size`.
    pub fn with_page_size(page_size: u32) -> Self {
        let mut state = Self::default();
        state.pagination.page_size = page_size.max(1);
        state
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &R::Filters {
        &self.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn mutating(&self) -> bool {
        self.mutations_in_flight > 0
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn tokens(&self) -> IssuedTokens {
        self.tokens
    }

    /// Whether the update issued as `token` was applied when it settled.
    ///
    /// Only meaningful on the snapshot returned by the dispatch that settled it.
    pub fn update_landed(&self, token: RequestToken) -> bool {
        self.settled_update == Some((token, true))
    }

    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.find(id).is_some()
    }

    /// Registers an update to `id`, superseding any older one to the same record.
    pub(crate) fn track_update(&mut self, id: R::Id, token: RequestToken) {
        for pending in self.pending_updates.iter_mut().filter(|p| p.id == id) {
            pending.superseded = true;
        }
        self.pending_updates.push(PendingUpdate {
            id,
            token,
            superseded: false,
        });
    }

    /// Forgets the update issued as `token`. Returns whether its result may land.
    pub(crate) fn settle_update(&mut self, token: RequestToken) -> bool {
        let landed = match self.pending_updates.iter().position(|p| p.token == token) {
            Some(index) => !self.pending_updates.remove(index).superseded,
            None => false,
        };
        self.settled_update = Some((token, landed));
        landed
    }

    /// Records a failure without breaking the loading/error exclusivity.
    pub(crate) fn record_error(&mut self, error: ErrorInfo) {
        if self.loading {
            self.deferred_error = Some(error);
        } else {
            self.error = Some(error);
        }
    }

    /// Ends the current list and surfaces anything deferred while it ran.
    pub(crate) fn finish_loading(&mut self) {
        self.loading = false;
        if let Some(error) = self.deferred_error.take() {
            self.error = Some(error);
        }
    }
}
