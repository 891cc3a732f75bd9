//! Listener registry for incoming events
//!
//! The registry maps an event-type string to an ordered list of async
//! callbacks. A parsed inbound frame is fanned out in two tiers: first to
//! the listeners registered under the record's exact `type`, then to the
//! listeners registered under the reserved wildcard type (`"message"`),
//! each tier in registration order.
//!
//! Lifecycle events the socket emits about itself (`open`, `error`,
//! `close`, `reconnect_failed`) dispatch to their own type only; wildcard
//! listeners see parsed inbound frames, not local lifecycle events.
//!
//! # Removal by identity
//!
//! Closures have no usable identity in Rust, so `add` hands back a
//! [`ListenerId`] and `remove` takes it. Removing an id that is not
//! registered is a no-op. Dispatch iterates over a snapshot of the list,
//! so a listener may remove itself (or others) while running without
//! disturbing the fan-out already in flight.
//!
//! # Examples
//!
//! ```rust,no_run
//! use evsock_client::ListenerRegistry;
//!
//! # async fn example(registry: &ListenerRegistry) {
//! let id = registry
//!     .add("new_message", |record| async move {
//!         println!("chat message: {:?}", record.field("content"));
//!     })
//!     .await;
//!
//! registry.remove("new_message", id).await;
//! # }
//! ```

use evsock_core::{event, EventRecord};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Type for listener callbacks
pub type ListenerFn =
    Arc<dyn Fn(EventRecord) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Handle identifying one registered listener
///
/// Returned by [`ListenerRegistry::add`]; required to remove the listener
/// again. Ids are unique across the registry's lifetime and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Inner {
    next_id: u64,
    listeners: HashMap<String, Vec<(ListenerId, ListenerFn)>>,
}

/// Registry of event listeners keyed by event type
#[derive(Clone)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Register a listener for an event type
    ///
    /// Multiple listeners per type are permitted; invocation order follows
    /// registration order. Use [`evsock_core::event::WILDCARD`] as the type
    /// to receive every successfully parsed inbound frame.
    pub async fn add<F, Fut>(&self, event_type: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(EventRecord) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        let listener: ListenerFn = Arc::new(move |record| Box::pin(listener(record)));
        inner
            .listeners
            .entry(event_type.into())
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a listener by id
    ///
    /// Returns whether a listener was removed. Once this returns, the
    /// listener is not invoked for any frame handled afterwards.
    pub async fn remove(&self, event_type: &str, id: ListenerId) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(list) = inner.listeners.get_mut(event_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|(listener_id, _)| *listener_id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            inner.listeners.remove(event_type);
        }
        removed
    }

    /// Check whether any listener is registered for a type
    pub async fn has_listeners(&self, event_type: &str) -> bool {
        self.inner.lock().await.listeners.contains_key(event_type)
    }

    /// Snapshot the listener list for a type, in registration order
    async fn snapshot(&self, event_type: &str) -> Vec<ListenerFn> {
        let inner = self.inner.lock().await;
        inner
            .listeners
            .get(event_type)
            .map(|list| list.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default()
    }

    /// Fan a parsed inbound frame out to listeners
    ///
    /// Exact-type tier first, then the wildcard tier, both receiving the
    /// same record.
    pub async fn dispatch_frame(&self, record: EventRecord) {
        for listener in self.snapshot(&record.event_type).await {
            listener(record.clone()).await;
        }
        for listener in self.snapshot(event::WILDCARD).await {
            listener(record.clone()).await;
        }
    }

    /// Deliver a lifecycle event to its exact-type listeners only
    pub async fn dispatch_local(&self, record: EventRecord) {
        for listener in self.snapshot(&record.event_type).await {
            listener(record.clone()).await;
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
