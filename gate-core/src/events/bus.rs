//! Synchronous named-event publish/subscribe registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::{error, trace};
use uuid::Uuid;

use super::types::EventPayload;

type Handler = Arc<dyn Fn(&EventPayload) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

struct HandlerEntry {
    id: SubscriptionId,
    once: bool,
    handler: Handler,
}

/// A pub/sub registry keyed by topic name.
///
/// Handlers for a topic run synchronously in registration order. Each
/// invocation is isolated: a handler returning an error is logged and never
/// prevents later handlers from running, nor does the error reach the
/// publisher. There is no ordering guarantee across different topics.
///
/// The handler list is snapshotted before delivery, so handlers may freely
/// publish or (un)subscribe re-entrantly; such registry changes take effect
/// from the next publish.
#[derive(Default)]
pub struct EventBus {
    topics: Mutex<HashMap<CompactString, SmallVec<[HandlerEntry; 4]>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`, appended after existing handlers.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&EventPayload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(topic, handler, false)
    }

    /// Like [`subscribe`](Self::subscribe), but the handler is removed
    /// after its first invocation.
    pub fn subscribe_once<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&EventPayload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(topic, handler, true)
    }

    /// Remove the subscription with the given handle. No-op when absent.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) {
        let mut topics = self.lock();
        if let Some(entries) = topics.get_mut(topic) {
            entries.retain(|e| e.id != id);
            if entries.is_empty() {
                topics.remove(topic);
            }
        }
    }

    /// Invoke every handler currently registered for `topic`, in
    /// registration order, passing `payload` to each.
    pub fn publish(&self, topic: &str, payload: &EventPayload) {
        let snapshot: SmallVec<[(SubscriptionId, bool, Handler); 4]> = {
            let topics = self.lock();
            match topics.get(topic) {
                Some(entries) => entries
                    .iter()
                    .map(|e| (e.id, e.once, Arc::clone(&e.handler)))
                    .collect(),
                None => {
                    trace!(topic, "publish with no subscribers");
                    return;
                }
            }
        };

        let mut spent: SmallVec<[SubscriptionId; 4]> = SmallVec::new();
        for (id, once, handler) in &snapshot {
            if let Err(e) = handler(payload) {
                error!(topic, error = %e, "event handler failed");
            }
            if *once {
                spent.push(*id);
            }
        }

        if !spent.is_empty() {
            let mut topics = self.lock();
            if let Some(entries) = topics.get_mut(topic) {
                entries.retain(|e| !spent.contains(&e.id));
                if entries.is_empty() {
                    topics.remove(topic);
                }
            }
        }
    }

    /// Number of live subscriptions for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock().get(topic).map_or(0, SmallVec::len)
    }

    fn register<F>(&self, topic: &str, handler: F, once: bool) -> SubscriptionId
    where
        F: Fn(&EventPayload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.lock()
            .entry(CompactString::from(topic))
            .or_default()
            .push(HandlerEntry {
                id,
                once,
                handler: Arc::new(handler),
            });
        id
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CompactString, SmallVec<[HandlerEntry; 4]>>> {
        // A poisoned registry is still structurally sound; keep serving.
        self.topics.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload() -> EventPayload {
        EventPayload::timestamp_only()
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            bus.subscribe("t", move |_| {
                log.lock().unwrap().push(tag);
                Ok(())
            });
        }

        bus.publish("t", &payload());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_handler_does_not_block_later_handlers() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        bus.subscribe("t", |_| anyhow::bail!("boom"));
        let hits2 = Arc::clone(&hits);
        bus.subscribe("t", move |_| {
            hits2.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.publish("t", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn once_handler_runs_exactly_once() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits2 = Arc::clone(&hits);
        bus.subscribe_once("t", move |_| {
            hits2.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.publish("t", &payload());
        bus.publish("t", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count("t"), 0);
    }

    #[test]
    fn unsubscribe_removes_only_the_matching_handler() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_a = Arc::clone(&hits);
        let a = bus.subscribe("t", move |_| {
            hits_a.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let hits_b = Arc::clone(&hits);
        bus.subscribe("t", move |_| {
            hits_b.fetch_add(10, Ordering::SeqCst);
            Ok(())
        });

        bus.unsubscribe("t", a);
        bus.publish("t", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 10);

        // Unsubscribing an already-removed handle is a no-op.
        bus.unsubscribe("t", a);
        bus.unsubscribe("missing", a);
    }

    #[test]
    fn handlers_may_subscribe_reentrantly() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let bus2 = Arc::clone(&bus);
        let hits2 = Arc::clone(&hits);
        bus.subscribe("t", move |_| {
            let hits3 = Arc::clone(&hits2);
            bus2.subscribe("t", move |_| {
                hits3.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            Ok(())
        });

        // First publish registers the inner handler but must not invoke it.
        bus.publish("t", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        // Second publish reaches the handler registered during the first.
        bus.publish("t", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn topics_are_independent() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits2 = Arc::clone(&hits);
        bus.subscribe("a", move |_| {
            hits2.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.publish("b", &payload());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
