//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for a process using this crate.
//!
//! The format is compact and hides the module prefix (`with_target(false)`); every log
//! line from a slice carries a `slice` field instead, so filtering by resource stays easy.
//!
//! ```bash
//! # Lifecycle of each operation (issued, settled, superseded)
//! RUST_LOG=info cargo run
//!
//! # Every intent the store reduces, with its payload
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a list followed by a create reads:
//!
//! ```text
//! INFO Store started store_type="AppReducer"
//! INFO list{slice="receivables" ...}: Listed token=#1 received=5 total=5
//! INFO create{slice="templates" ...}: Created token=#1 id=12
//! ```

/// Installs a global compact subscriber filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already set; use [`try_setup_tracing`] in tests.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`] but returns `false` instead of panicking when a subscriber exists.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
