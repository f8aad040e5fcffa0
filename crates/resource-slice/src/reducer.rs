//! # Reducers
//!
//! A reducer is the only place state transitions happen. It must be a pure function
//! `(State, Intent) -> State`: no I/O, no clock, no randomness. The store runs reducers
//! one at a time, in dispatch order.
//!
//! [`SliceReducer`] is the generic reducer for one [`ResourceState`]. The store root of an
//! application composes several of them behind its own [`Reducer`] implementation.

use crate::intent::{Lifecycle, SliceIntent};
use crate::resource::{InsertPosition, Resource};
use crate::state::ResourceState;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Reducer transforms state based on intents.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: Clone + Default + Send + Sync + 'static;

    /// The intent type this reducer handles.
    type Intent: Debug + Send + 'static;

    /// Process an intent and return the new state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;

    /// Short name of an intent for logs.
    fn label(intent: &Self::Intent) -> String {
        format!("{:?}", intent)
    }
}

/// The generic reducer for a single resource slice.
pub struct SliceReducer<R>(PhantomData<fn() -> R>);

impl<R: Resource> Reducer for SliceReducer<R> {
    type State = ResourceState<R>;
    type Intent = SliceIntent<R>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SliceIntent::List(phase) => reduce_list(&mut state, phase),
            SliceIntent::Get(phase) => reduce_get(&mut state, phase),
            SliceIntent::Create(phase) => reduce_create(&mut state, phase),
            SliceIntent::Update(phase) => reduce_update(&mut state, phase),
            SliceIntent::Remove(phase) => reduce_remove(&mut state, phase),
            SliceIntent::Select(id) => {
                state.selected = state.find(&id).cloned();
            }
            SliceIntent::ClearSelection => state.selected = None,
            SliceIntent::ClearError => {
                state.error = None;
                state.deferred_error = None;
            }
        }
        state
    }

    fn label(intent: &SliceIntent<R>) -> String {
        intent.label()
    }
}

type ListPhase<R> = Lifecycle<
    crate::page::ListQuery<<R as Resource>::Filters>,
    crate::page::PaginatedResponse<R>,
>;

fn reduce_list<R: Resource>(state: &mut ResourceState<R>, phase: ListPhase<R>) {
    match phase {
        Lifecycle::Pending(query) => {
            let query = query.normalized(&state.filters);
            state.tokens.list = state.tokens.next();
            state.filters = query.filters;
            state.pagination.page_number = query.page.number;
            state.pagination.page_size = query.page.size;
            state.loading = true;
            state.error = None;
            state.deferred_error = None;
        }
        // Only the most recently issued list may land; anything older is stale.
        Lifecycle::Fulfilled { token, value } if token == state.tokens.list => {
            state.pagination = value.pagination();
            state.items = value.data;
            state.finish_loading();
        }
        Lifecycle::Rejected { token, error } if token == state.tokens.list => {
            state.deferred_error = None;
            state.loading = false;
            state.error = Some(error);
        }
        Lifecycle::Cancelled { token } if token == state.tokens.list => {
            state.finish_loading();
        }
        Lifecycle::Fulfilled { .. } | Lifecycle::Rejected { .. } | Lifecycle::Cancelled { .. } => {}
    }
}

fn reduce_get<R: Resource>(state: &mut ResourceState<R>, phase: Lifecycle<R::Id, R>) {
    match phase {
        Lifecycle::Pending(_) => {
            state.tokens.get = state.tokens.next();
        }
        Lifecycle::Fulfilled { token, value } if token == state.tokens.get => {
            state.selected = Some(value);
        }
        Lifecycle::Rejected { token, error } if token == state.tokens.get => {
            state.record_error(error);
        }
        Lifecycle::Fulfilled { .. } | Lifecycle::Rejected { .. } | Lifecycle::Cancelled { .. } => {}
    }
}

fn reduce_create<R: Resource>(state: &mut ResourceState<R>, phase: Lifecycle<(), R>) {
    match phase {
        Lifecycle::Pending(()) => {
            state.tokens.create = state.tokens.next();
            state.mutations_in_flight += 1;
        }
        Lifecycle::Fulfilled { value, .. } => {
            mutation_settled(state);
            if let Some(existing) = state.items.iter_mut().find(|item| item.id() == value.id()) {
                *existing = value;
            } else {
                match R::INSERT_POSITION {
                    InsertPosition::Append => state.items.push(value),
                    InsertPosition::Prepend => state.items.insert(0, value),
                }
                let total = state.pagination.total_results + 1;
                state.pagination.recount(total);
            }
        }
        Lifecycle::Rejected { error, .. } => {
            mutation_settled(state);
            state.record_error(error);
        }
        Lifecycle::Cancelled { .. } => mutation_settled(state),
    }
}

fn reduce_update<R: Resource>(state: &mut ResourceState<R>, phase: Lifecycle<R::Id, R>) {
    match phase {
        Lifecycle::Pending(id) => {
            let token = state.tokens.next();
            state.tokens.update = token;
            state.track_update(id, token);
            state.mutations_in_flight += 1;
        }
        // Only the latest update to a given record may land.
        Lifecycle::Fulfilled { token, value } => {
            mutation_settled(state);
            if !state.settle_update(token) {
                return;
            }
            if state.selected.as_ref().is_some_and(|s| s.id() == value.id()) {
                state.selected = Some(value.clone());
            }
            if let Some(existing) = state.items.iter_mut().find(|item| item.id() == value.id()) {
                *existing = value;
            }
        }
        Lifecycle::Rejected { token, error } => {
            mutation_settled(state);
            if state.settle_update(token) {
                state.record_error(error);
            }
        }
        Lifecycle::Cancelled { token } => {
            mutation_settled(state);
            state.settle_update(token);
        }
    }
}

fn reduce_remove<R: Resource>(state: &mut ResourceState<R>, phase: Lifecycle<R::Id, R::Id>) {
    match phase {
        Lifecycle::Pending(_) => {
            state.tokens.remove = state.tokens.next();
            state.mutations_in_flight += 1;
        }
        Lifecycle::Fulfilled { value: id, .. } => {
            mutation_settled(state);
            let before = state.items.len();
            state.items.retain(|item| item.id() != &id);
            let removed = (before - state.items.len()) as u64;
            if removed > 0 {
                let total = state.pagination.total_results.saturating_sub(removed);
                state.pagination.recount(total);
            }
            if state.selected.as_ref().is_some_and(|s| s.id() == &id) {
                state.selected = None;
            }
        }
        Lifecycle::Rejected { error, .. } => {
            mutation_settled(state);
            state.record_error(error);
        }
        Lifecycle::Cancelled { .. } => mutation_settled(state),
    }
}

fn mutation_settled<R: Resource>(state: &mut ResourceState<R>) {
    state.mutations_in_flight = state.mutations_in_flight.saturating_sub(1);
}
