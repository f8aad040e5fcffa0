//! # Store Lifecycle
//!
//! [`AdminStore`] is the conductor: it builds the state tree, spawns the store task,
//! wires one domain client per slice to it and to a single remote client, and shuts
//! everything down in order.
//!
//! ## Wiring
//!
//! ```rust,ignore
//! let config = AppConfig::load()?;
//! let admin = AdminStore::from_config(&config)?;
//!
//! admin.receivables.open_for_customer(12).await?;
//! let open = admin.state().receivables.items().len();
//!
//! admin.shutdown().await?;
//! ```
//!
//! The store is an explicit value, never a global. Tests build it with
//! [`AdminStore::new`] and a [`MockRemote`](resource_slice::mock::MockRemote).
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - each holds a handle to the store's intent channel
//! 2. **Store detects closure** - `recv()` returns `None` once the last handle is gone
//! 3. **Await completion** - the store task logs how many intents it reduced and exits
//!
//! Clones of the clients handed out elsewhere keep the store alive; drop them first.

use crate::clients::{CommunicationClient, ItemReturnClient, ReceivableClient, TemplateClient};
use crate::config::{AppConfig, ConfigError};
use crate::store::{AppReducer, AppState};
use resource_slice::{
    HttpClient, ListenerHandle, RemoteClient, SliceError, SliceHandle, Store, StoreHandle,
    Subscription,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors raised while building the admin store.
#[derive(Debug, Error)]
pub enum AdminStoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] SliceError),
}

/// The running store plus one client per domain slice.
pub struct AdminStore {
    pub communications: CommunicationClient,
    pub receivables: ReceivableClient,
    pub item_returns: ItemReturnClient,
    pub templates: TemplateClient,
    store: StoreHandle<AppReducer>,
    task: JoinHandle<()>,
}

impl AdminStore {
    /// Spawns the store and wires every slice to `remote`. Must run inside a Tokio runtime.
    pub fn new(remote: Arc<dyn RemoteClient>, config: &AppConfig) -> Self {
        let limits = config.page_limits();
        let initial = AppState::with_page_size(limits.default_size);
        let (store, handle) = Store::<AppReducer>::with_state(config.store.intent_buffer, initial);
        let task = store.spawn();

        Self {
            communications: CommunicationClient::new(SliceHandle::new(
                handle.clone(),
                remote.clone(),
                limits,
            )),
            receivables: ReceivableClient::new(SliceHandle::new(
                handle.clone(),
                remote.clone(),
                limits,
            )),
            item_returns: ItemReturnClient::new(SliceHandle::new(
                handle.clone(),
                remote.clone(),
                limits,
            )),
            templates: TemplateClient::new(SliceHandle::new(handle.clone(), remote, limits)),
            store: handle,
            task,
        }
    }

    /// Validates `config` and talks to the backend it names over HTTP.
    pub fn from_config(config: &AppConfig) -> Result<Self, AdminStoreError> {
        config.validate()?;
        let remote = HttpClient::new(config.http_config())?;
        info!(base_url = remote.base_url(), "Admin store configured");
        Ok(Self::new(Arc::new(remote), config))
    }

    /// The latest snapshot of the whole tree.
    pub fn state(&self) -> Arc<AppState> {
        self.store.get_state()
    }

    pub fn subscribe(&self) -> Subscription<AppState> {
        self.store.subscribe()
    }

    pub fn listen<F>(&self, listener: F) -> ListenerHandle
    where
        F: FnMut(&AppState) + Send + 'static,
    {
        self.store.listen(listener)
    }

    /// Direct access to the store, e.g. to dispatch local intents.
    pub fn store(&self) -> &StoreHandle<AppReducer> {
        &self.store
    }

    /// Gracefully shuts down the store.
    ///
    /// Returns `Err` if the store task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down admin store...");

        drop(self.communications);
        drop(self.receivables);
        drop(self.item_returns);
        drop(self.templates);
        drop(self.store);

        if let Err(e) = self.task.await {
            error!("Store task failed: {:?}", e);
            return Err(format!("Store task failed: {:?}", e));
        }

        info!("Admin store shutdown complete.");
        Ok(())
    }
}
