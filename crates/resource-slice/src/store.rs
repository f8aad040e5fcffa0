//! # Store
//!
//! This module defines the [`Store`], the single writer of an application's state tree.
//! It is an actor: one Tokio task owns the state and drains a channel of intents
//! strictly in arrival order, running the [`Reducer`] for each one to completion.
//!
//! Readers never touch the state directly. After every intent the store publishes an
//! immutable `Arc` snapshot through a `watch` channel; [`StoreHandle::get_state`],
//! [`StoreHandle::subscribe`] and [`StoreHandle::listen`] all read from it.
//!
//! # Usage Pattern
//!
//! 1.  **Create**: `Store::new()` returns the store (server) and a cloneable handle.
//! 2.  **Run**: spawn `store.run()` on the runtime.
//! 3.  **Use**: dispatch intents through the handle, typically via a
//!     [`SliceHandle`](crate::SliceHandle).
//! 4.  **Shutdown**: drop every handle; the run loop ends once the channel closes.

use crate::error::SliceError;
use crate::intent::SliceIntent;
use crate::reducer::Reducer;
use crate::resource::Resource;
use crate::state::ResourceState;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// Binds one resource slice into a store root.
///
/// The store root's reducer implements this once per domain so a
/// [`SliceHandle`](crate::SliceHandle) can wrap its intents and find its state.
pub trait SliceOf<R: Resource>: Reducer {
    fn wrap(intent: SliceIntent<R>) -> Self::Intent;

    fn project(state: &Self::State) -> &ResourceState<R>;
}

struct Envelope<Rd: Reducer> {
    intent: Rd::Intent,
    respond_to: oneshot::Sender<Arc<Rd::State>>,
}

/// The actor that owns the state tree.
pub struct Store<Rd: Reducer> {
    receiver: mpsc::Receiver<Envelope<Rd>>,
    state: Arc<Rd::State>,
    publisher: watch::Sender<Arc<Rd::State>>,
}

impl<Rd: Reducer> Store<Rd> {
    /// Creates a store with the default state and its handle.
    ///
    /// `buffer_size` is the capacity of the intent channel; dispatchers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreHandle<Rd>) {
        Self::with_state(buffer_size, Rd::State::default())
    }

    pub fn with_state(buffer_size: usize, initial: Rd::State) -> (Self, StoreHandle<Rd>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let state = Arc::new(initial);
        let (publisher, snapshots) = watch::channel(state.clone());
        let store = Self {
            receiver,
            state,
            publisher,
        };
        let handle = StoreHandle { sender, snapshots };
        (store, handle)
    }

    /// Runs the store's event loop until every handle has been dropped.
    pub async fn run(mut self) {
        let store_type = std::any::type_name::<Rd>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(store_type, "Store started");

        let mut processed: u64 = 0;
        while let Some(Envelope { intent, respond_to }) = self.receiver.recv().await {
            debug!(store_type, intent = %Rd::label(&intent), "Dispatch");
            trace!(?intent, "Intent payload");
            let previous = (*self.state).clone();
            self.state = Arc::new(Rd::reduce(previous, intent));
            processed += 1;
            self.publisher.send_replace(self.state.clone());
            let _ = respond_to.send(self.state.clone());
        }

        info!(store_type, processed, "Shutdown");
    }

    /// Spawns the run loop on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

/// Cloneable handle to a running [`Store`].
pub struct StoreHandle<Rd: Reducer> {
    sender: mpsc::Sender<Envelope<Rd>>,
    snapshots: watch::Receiver<Arc<Rd::State>>,
}

impl<Rd: Reducer> Clone for StoreHandle<Rd> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<Rd: Reducer> StoreHandle<Rd> {
    /// Sends an intent and waits until its reducer has run.
    ///
    /// Returns the snapshot produced by *this* intent, which later intents cannot
    /// have touched yet.
    pub async fn dispatch(&self, intent: Rd::Intent) -> Result<Arc<Rd::State>, SliceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Envelope { intent, respond_to })
            .await
            .map_err(|_| SliceError::StoreClosed)?;
        response.await.map_err(|_| SliceError::StoreDropped)
    }

    /// The latest published snapshot.
    pub fn get_state(&self) -> Arc<Rd::State> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription<Rd::State> {
        let mut receiver = self.snapshots.clone();
        receiver.mark_unchanged();
        Subscription { receiver }
    }

    /// Calls `listener` with every new snapshot until the returned handle is dropped
    /// or the store shuts down.
    pub fn listen<F>(&self, mut listener: F) -> ListenerHandle
    where
        F: FnMut(&Rd::State) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let task = tokio::spawn(async move {
            while let Some(snapshot) = subscription.changed().await {
                listener(&snapshot);
            }
        });
        ListenerHandle { task }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// A pull-style subscription. Dropping it unsubscribes.
///
/// Snapshots published faster than they are read are coalesced: `changed` always
/// yields the latest one.
pub struct Subscription<S> {
    receiver: watch::Receiver<Arc<S>>,
}

impl<S> Subscription<S> {
    pub fn current(&self) -> Arc<S> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot. `None` once the store has shut down.
    pub async fn changed(&mut self) -> Option<Arc<S>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

/// Keeps a [`StoreHandle::listen`] callback alive.
pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: i64,
        history: Vec<i64>,
    }

    #[derive(Debug)]
    enum CounterIntent {
        Add(i64),
        Reset,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Intent = CounterIntent;

        fn reduce(mut state: Counter, intent: CounterIntent) -> Counter {
            match intent {
                CounterIntent::Add(n) => state.value += n,
                CounterIntent::Reset => state.value = 0,
            }
            state.history.push(state.value);
            state
        }
    }

    #[tokio::test]
    async fn test_dispatch_returns_post_intent_snapshot() {
        let (store, handle) = Store::<CounterReducer>::new(8);
        let task = store.spawn();

        let snapshot = handle.dispatch(CounterIntent::Add(5)).await.unwrap();
        assert_eq!(snapshot.value, 5);
        let snapshot = handle.dispatch(CounterIntent::Add(-2)).await.unwrap();
        assert_eq!(snapshot.value, 3);
        assert_eq!(handle.get_state().value, 3);

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_intents_are_processed_in_order() {
        let (store, handle) = Store::<CounterReducer>::new(2);
        let task = store.spawn();

        for n in 1..=20 {
            handle.dispatch(CounterIntent::Add(n)).await.unwrap();
        }
        handle.dispatch(CounterIntent::Reset).await.unwrap();

        let state = handle.get_state();
        assert_eq!(state.history.len(), 21);
        assert_eq!(state.history[19], 210);
        assert_eq!(state.value, 0);

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_subscription_sees_changes_and_ends_on_shutdown() {
        let (store, handle) = Store::<CounterReducer>::new(8);
        let task = store.spawn();
        let mut subscription = handle.subscribe();

        handle.dispatch(CounterIntent::Add(1)).await.unwrap();
        let seen = subscription.changed().await.unwrap();
        assert_eq!(seen.value, 1);

        drop(handle);
        task.await.unwrap();
        assert!(subscription.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_listener_stops_after_unsubscribe() {
        let (store, handle) = Store::<CounterReducer>::new(8);
        let task = store.spawn();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();

        let listener = handle.listen(move |state: &Counter| {
            let _ = seen_tx.send(state.value);
        });
        handle.dispatch(CounterIntent::Add(7)).await.unwrap();
        assert_eq!(seen_rx.recv().await, Some(7));

        listener.unsubscribe();
        handle.dispatch(CounterIntent::Add(1)).await.unwrap();
        assert_eq!(seen_rx.recv().await, None);

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_fails() {
        let (store, handle) = Store::<CounterReducer>::new(8);
        drop(store);
        let result = handle.dispatch(CounterIntent::Add(1)).await;
        assert!(matches!(result, Err(SliceError::StoreClosed)));
    }
}
