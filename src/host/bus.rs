use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::{HostError, HostResult, Notification, NotificationSink, Scope, SubscriptionId};

/// Where an emitted notification is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// App-wide emit: only global subscriptions see it.
    #[allow(dead_code)]
    App,
    /// Emit aimed at the window: window and global subscriptions see it.
    Window,
}

struct Subscriber {
    id: SubscriptionId,
    scope: Scope,
    name: String,
    sink: NotificationSink,
}

/// Name-keyed publish/subscribe channel between the host shell and its
/// listeners.
///
/// Sinks run outside the lock, in subscription order, so a sink may
/// subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub struct NotificationBus {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, scope: Scope, name: &str, sink: NotificationSink) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Subscriber {
            id,
            scope,
            name: name.to_string(),
            sink,
        });
        tracing::trace!(?scope, name, id = id.0, "subscribed");
        id
    }

    /// Remove a subscription. Releasing an unknown id is an error.
    pub fn unsubscribe(&self, id: SubscriptionId) -> HostResult<()> {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        if subscribers.len() == before {
            return Err(HostError::Subscription(format!(
                "unknown subscription {}",
                id.0
            )));
        }
        Ok(())
    }

    /// Deliver a notification to every matching subscriber.
    ///
    /// Returns the number of sinks invoked.
    pub fn emit(&self, target: Target, name: &str, payload: Value) -> usize {
        let matching: Vec<(Scope, NotificationSink)> = self
            .lock()
            .iter()
            .filter(|s| s.name == name)
            .filter(|s| s.scope == Scope::Global || target == Target::Window)
            .map(|s| (s.scope, Arc::clone(&s.sink)))
            .collect();

        tracing::debug!(name, ?target, listeners = matching.len(), "emit");
        for (scope, sink) in &matching {
            sink(Notification {
                name: name.to_string(),
                scope: *scope,
                payload: payload.clone(),
            });
        }
        matching.len()
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorder() -> (NotificationSink, Arc<Mutex<Vec<Notification>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: NotificationSink = Arc::new(move |n| sink_seen.lock().expect("lock").push(n));
        (sink, seen)
    }

    #[test]
    fn window_emit_reaches_both_scopes() {
        let bus = NotificationBus::new();
        let (sink, seen) = recorder();
        bus.subscribe(Scope::Global, "drag://drop", sink.clone());
        bus.subscribe(Scope::Window, "drag://drop", sink);

        let delivered = bus.emit(Target::Window, "drag://drop", json!(["/a"]));
        assert_eq!(delivered, 2);
        let seen = seen.lock().expect("lock");
        assert_eq!(seen[0].scope, Scope::Global);
        assert_eq!(seen[1].scope, Scope::Window);
        assert_eq!(seen[1].payload, json!(["/a"]));
    }

    #[test]
    fn app_emit_skips_window_subscriptions() {
        let bus = NotificationBus::new();
        let (sink, seen) = recorder();
        bus.subscribe(Scope::Global, "file-drop", sink.clone());
        bus.subscribe(Scope::Window, "file-drop", sink);

        assert_eq!(bus.emit(Target::App, "file-drop", Value::Null), 1);
        assert_eq!(seen.lock().expect("lock")[0].scope, Scope::Global);
    }

    #[test]
    fn emit_filters_by_name() {
        let bus = NotificationBus::new();
        let (sink, seen) = recorder();
        bus.subscribe(Scope::Window, "file-drop", sink);
        assert_eq!(bus.emit(Target::Window, "file-drop-hover", Value::Null), 0);
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = NotificationBus::new();
        let (sink, seen) = recorder();
        let id = bus.subscribe(Scope::Window, "file-drop", sink);
        bus.unsubscribe(id).expect("unsubscribe");
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit(Target::Window, "file-drop", json!(["/a"]));
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn double_unsubscribe_is_an_error() {
        let bus = NotificationBus::new();
        let (sink, _) = recorder();
        let id = bus.subscribe(Scope::Global, "x", sink);
        bus.unsubscribe(id).expect("first release");
        assert!(matches!(
            bus.unsubscribe(id),
            Err(HostError::Subscription(_))
        ));
    }

    #[test]
    fn sink_may_unsubscribe_during_emit() {
        let bus = Arc::new(NotificationBus::new());
        let bus_in_sink = Arc::clone(&bus);
        let id_slot = Arc::new(Mutex::new(None::<SubscriptionId>));
        let slot_in_sink = Arc::clone(&id_slot);
        let sink: NotificationSink = Arc::new(move |_| {
            if let Some(id) = slot_in_sink.lock().expect("lock").take() {
                let _ = bus_in_sink.unsubscribe(id);
            }
        });
        let id = bus.subscribe(Scope::Global, "x", sink);
        *id_slot.lock().expect("lock") = Some(id);

        assert_eq!(bus.emit(Target::App, "x", Value::Null), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
