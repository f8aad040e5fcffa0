//! # Mock Remote & Testing Guide
//!
//! [`MockRemote`] implements [`RemoteClient`] entirely in memory. Tests queue the
//! requests they expect together with the response each one should get, drive a slice,
//! then call [`MockRemote::verify`] to make sure nothing was left unanswered.
//!
//! ## When to use the mock vs a real backend
//!
//! | Feature | MockRemote | HttpClient + mock backend |
//! |---------|------------|---------------------------|
//! | **Speed** | Instant (in-memory) | Fast (binds a local port) |
//! | **Ordering control** | Gates let a test release responses in any order | Whatever the scheduler does |
//! | **Use Case** | Slice and reducer behavior | Wire format, status mapping |
//! | **Error Injection** | `return_err` | Route returns a status |
//!
//! ## Controlling response order
//!
//! A response queued with [`ExpectationBuilder::gated`] is held until the returned
//! [`Gate`] is released. This is how tests reproduce two overlapping lists whose
//! responses arrive out of order:
//!
//! ```rust,ignore
//! let mock = MockRemote::new();
//! let first = mock.expect(Method::Get, "/receivables").gated(page_a);
//! mock.expect(Method::Get, "/receivables").return_json(page_b);
//!
//! let slow = tokio::spawn(async move { slice.list(filters_a, page).await });
//! mock.wait_for_requests(1).await;
//! slice.list(filters_b, page).await?;   // lands first
//! first.release();                      // stale, dropped
//! ```

use crate::error::SliceError;
use crate::remote::{Method, RemoteClient, RemoteRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Reply {
    Ready(Result<Value, SliceError>),
    Gated {
        release: oneshot::Receiver<()>,
        response: Result<Value, SliceError>,
    },
}

struct Expectation {
    method: Method,
    path: String,
    reply: Reply,
}

#[derive(Default)]
struct Shared {
    expectations: Mutex<VecDeque<Expectation>>,
    received: Mutex<Vec<RemoteRequest>>,
    mismatches: Mutex<Vec<String>>,
    arrivals: Notify,
}

/// An in-memory [`RemoteClient`] with expectation tracking.
///
/// Cloning shares the expectation queue, so a test can keep one clone for assertions
/// and hand another to the code under test.
#[derive(Clone, Default)]
pub struct MockRemote {
    shared: Arc<Shared>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the next request to be `method path` (query parameters are not matched).
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            shared: self.shared.clone(),
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.shared.received.lock().clone()
    }

    /// Waits until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        loop {
            let notified = self.shared.arrivals.notified();
            if self.shared.received.lock().len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Verifies that all expectations were met and no request was unexpected.
    pub fn verify(&self) {
        let mismatches = self.shared.mismatches.lock();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", *mismatches);
        }
        let remaining = self.shared.expectations.lock();
        if !remaining.is_empty() {
            let pending: Vec<String> = remaining
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                pending
            );
        }
    }
}

#[async_trait]
impl RemoteClient for MockRemote {
    async fn request(&self, request: RemoteRequest) -> Result<Value, SliceError> {
        let expectation = self.shared.expectations.lock().pop_front();
        let summary = format!("{} {}", request.method, request.path);
        self.shared.received.lock().push(request.clone());
        self.shared.arrivals.notify_waiters();

        let Some(expectation) = expectation else {
            self.shared.mismatches.lock().push(summary.clone());
            return Err(SliceError::Transport(format!("unexpected request {}", summary)));
        };
        if expectation.method != request.method || expectation.path != request.path {
            let message = format!(
                "expected {} {}, got {}",
                expectation.method, expectation.path, summary
            );
            self.shared.mismatches.lock().push(message.clone());
            return Err(SliceError::Transport(message));
        }

        match expectation.reply {
            Reply::Ready(response) => response,
            Reply::Gated { release, response } => {
                // A dropped gate releases too.
                let _ = release.await;
                response
            }
        }
    }
}

/// Builder for one expected request.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    shared: Arc<Shared>,
}

impl ExpectationBuilder {
    fn push(self, reply: Reply) {
        self.shared.expectations.lock().push_back(Expectation {
            method: self.method,
            path: self.path,
            reply,
        });
    }

    /// Responds with `body` serialized to JSON.
    pub fn return_json<T: Serialize>(self, body: T) {
        let response = serde_json::to_value(body).map_err(SliceError::from);
        self.push(Reply::Ready(response));
    }

    /// Responds with an empty body.
    pub fn return_empty(self) {
        self.push(Reply::Ready(Ok(Value::Null)));
    }

    pub fn return_err(self, error: SliceError) {
        self.push(Reply::Ready(Err(error)));
    }

    /// Responds with `body` once the returned gate is released.
    pub fn gated<T: Serialize>(self, body: T) -> Gate {
        let response = serde_json::to_value(body).map_err(SliceError::from);
        self.gated_response(response)
    }

    /// Fails with `error` once the returned gate is released.
    pub fn gated_err(self, error: SliceError) -> Gate {
        self.gated_response(Err(error))
    }

    fn gated_response(self, response: Result<Value, SliceError>) -> Gate {
        let (sender, release) = oneshot::channel();
        self.push(Reply::Gated { release, response });
        Gate { sender }
    }
}

/// Holds back a gated response until released.
pub struct Gate {
    sender: oneshot::Sender<()>,
}

impl Gate {
    pub fn release(self) {
        let _ = self.sender.send(());
    }
}
