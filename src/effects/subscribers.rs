//! Subscriber registry and fan-out dispatch.
//!
//! Callbacks are registered per event name and run after a transition
//! commits. One dispatch starts every matching callback, waits for all of
//! them, and returns their results in registration order.

use crate::effects::transition::{MachineError, SubscriberError};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::trace;

/// Result produced by a single subscriber.
pub type SubscriberResult = Result<Value, SubscriberError>;

/// Boxed async subscriber callback.
///
/// Receives owned copies of the committed context and the transition data.
pub type Subscriber<C, D> = Arc<dyn Fn(C, D) -> BoxFuture<'static, SubscriberResult> + Send + Sync>;

/// Subscribers keyed by event name, in registration order.
pub struct SubscriberRegistry<C, D> {
    entries: Vec<(String, Subscriber<C, D>)>,
}

impl<C, D> SubscriberRegistry<C, D>
where
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `callback` under `event`.
    pub fn on<F, Fut>(&mut self, event: impl Into<String>, callback: F)
    where
        F: Fn(C, D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SubscriberResult> + Send + 'static,
    {
        let subscriber: Subscriber<C, D> = Arc::new(move |context, data| callback(context, data).boxed());
        self.entries.push((event.into(), subscriber));
    }

    /// Number of callbacks registered under `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.entries.iter().filter(|(name, _)| name == event).count()
    }

    /// Run every callback registered under `event` concurrently.
    ///
    /// All callbacks run to completion. If any failed, the first failure in
    /// registration order is returned.
    pub async fn emit(&self, event: &str, context: &C, data: &D) -> Result<Vec<Value>, MachineError> {
        let pending: Vec<BoxFuture<'static, SubscriberResult>> = self
            .entries
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, subscriber)| subscriber(context.clone(), data.clone()))
            .collect();

        trace!(event, subscribers = pending.len(), "dispatching subscribers");

        join_all(pending)
            .await
            .into_iter()
            .collect::<Result<Vec<Value>, SubscriberError>>()
            .map_err(|source| MachineError::Subscriber {
                event: event.to_string(),
                source,
            })
    }
}

impl<C, D> Default for SubscriberRegistry<C, D>
where
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> fmt::Debug for SubscriberRegistry<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}
