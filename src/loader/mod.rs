//! View data loaders.
//!
//! A loader binds a screen's fetches to its lifecycle. Every activation gets a
//! new generation number; a settlement only lands if its generation is still
//! the current one. Parameter changes, refreshes and teardown therefore turn
//! any in-flight request into a no-op instead of letting it overwrite newer
//! state.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::models::FetchOutcome;

/// Proof of one activation, handed back on settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<P> {
    pub generation: u64,
    pub param: P,
}

/// Point-in-time view of a loader.
#[derive(Debug, Clone, Serialize)]
pub struct LoaderSnapshot<P, T> {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<P>,
    pub outcome: FetchOutcome<T>,
    /// Last successfully loaded data, still shown while a reload is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<T>,
}

impl<P, T> LoaderSnapshot<P, T> {
    /// Data to display: the current result, else the last good one.
    pub fn display_data(&self) -> Option<&T> {
        self.outcome.as_ready().or(self.previous.as_ref())
    }
}

struct LoaderState<P, T> {
    generation: u64,
    param: Option<P>,
    outcome: FetchOutcome<T>,
    last_ready: Option<T>,
}

/// Tri-state loader for one screen resource.
pub struct ViewLoader<P, T> {
    name: &'static str,
    state: Arc<Mutex<LoaderState<P, T>>>,
}

impl<P, T> Clone for ViewLoader<P, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: self.state.clone(),
        }
    }
}

impl<P, T> ViewLoader<P, T>
where
    P: Clone + std::fmt::Debug,
    T: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(LoaderState {
                generation: 0,
                param: None,
                outcome: FetchOutcome::Loading,
                last_ready: None,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a new activation. Earlier activations become stale.
    pub fn begin(&self, param: P) -> Ticket<P> {
        let mut state = self.state.lock();
        state.generation += 1;
        state.param = Some(param.clone());
        state.outcome = FetchOutcome::Loading;
        tracing::debug!(
            loader = self.name,
            generation = state.generation,
            "activating with {:?}",
            param
        );
        Ticket {
            generation: state.generation,
            param,
        }
    }

    /// Re-run the last activation's parameter, if there was one.
    pub fn refresh(&self) -> Option<Ticket<P>> {
        let param = self.state.lock().param.clone()?;
        Some(self.begin(param))
    }

    /// Apply a settled result. Returns `false` when the ticket is stale and the
    /// result was discarded.
    pub fn settle(&self, ticket: &Ticket<P>, outcome: FetchOutcome<T>) -> bool {
        let mut state = self.state.lock();
        if ticket.generation != state.generation {
            tracing::debug!(
                loader = self.name,
                stale = ticket.generation,
                current = state.generation,
                "discarding stale settlement"
            );
            return false;
        }

        if let FetchOutcome::Ready(data) = &outcome {
            state.last_ready = Some(data.clone());
        }
        if let FetchOutcome::Error(message) = &outcome {
            tracing::warn!(loader = self.name, "load failed: {}", message);
        }
        state.outcome = outcome;
        true
    }

    /// Drop all state and invalidate every outstanding activation.
    pub fn teardown(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.param = None;
        state.outcome = FetchOutcome::Loading;
        state.last_ready = None;
        tracing::debug!(
            loader = self.name,
            generation = state.generation,
            "torn down"
        );
    }

    pub fn is_current(&self, ticket: &Ticket<P>) -> bool {
        self.state.lock().generation == ticket.generation
    }

    pub fn snapshot(&self) -> LoaderSnapshot<P, T> {
        let state = self.state.lock();
        LoaderSnapshot {
            generation: state.generation,
            param: state.param.clone(),
            outcome: state.outcome.clone(),
            previous: state.last_ready.clone(),
        }
    }

    /// Activate, await the fetch, settle, and report the resulting state.
    ///
    /// If another activation started meanwhile, this call's result is dropped
    /// and the returned snapshot reflects the newer activation.
    pub async fn run<F, Fut>(&self, param: P, fetch: F) -> LoaderSnapshot<P, T>
    where
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = FetchOutcome<T>>,
    {
        let ticket = self.begin(param.clone());
        let outcome = fetch(param).await;
        self.settle(&ticket, outcome);
        self.snapshot()
    }
}
