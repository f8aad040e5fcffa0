//! # Admin Store
//!
//! The client-side state store of the business administration dashboard, built on
//! [`resource_slice`].
//!
//! - **[model]**: the domain records ([`Communication`](model::Communication),
//!   [`Receivable`](model::Receivable), [`ItemReturn`](model::ItemReturn),
//!   [`Template`](model::Template)) and their filters and payloads.
//! - **[store]**: the state tree, the domain-tagged intent and the routing reducer.
//! - **[clients]**: one client per domain with its extra operations.
//! - **[lifecycle]**: [`AdminStore`](lifecycle::AdminStore), which wires and runs it all.
//! - **[config]**: TOML configuration.

pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use lifecycle::{AdminStore, AdminStoreError};
pub use store::{AppIntent, AppReducer, AppState};
