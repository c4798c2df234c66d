use crate::event_bus::Event;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

pub type SubscribeFn = Arc<dyn Fn(&dyn Event) + Send + Sync>;

/// Handle returned by a subscription; removes exactly that handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct Subscriber {
    id: SubscriptionId,
    subscriber: SubscribeFn,
}

impl Subscriber {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&dyn Event) + Send + Sync + 'static,
    {
        Self {
            id: SubscriptionId::new(),
            subscriber: Arc::new(handler),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn subscriber(&self) -> SubscribeFn {
        self.subscriber.clone()
    }
}

/// Wraps a handler for one concrete event type.
pub fn make_subscriber<T, F>(handler: F) -> Subscriber
where
    T: Event + 'static,
    F: Fn(&T) + Send + Sync + 'static,
{
    let wrapped = move |event: &dyn Event| {
        if let Some(specific) = event.as_any().downcast_ref::<T>() {
            handler(specific);
        } else {
            tracing::warn!("Received event of unexpected type");
        }
    };

    Subscriber::new(wrapped)
}

/// Mapping between event types and their handlers, in subscription order.
#[derive(Default)]
pub struct EventSubscriptions {
    subscriptions: HashMap<TypeId, Vec<Subscriber>>,
}

impl EventSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscriber(&mut self, type_id: TypeId, subscriber: Subscriber) -> SubscriptionId {
        let id = subscriber.id();
        self.subscriptions
            .entry(type_id)
            .or_default()
            .push(subscriber);
        id
    }

    /// Removes the handler registered under `id`. Returns whether one was found.
    pub fn remove_subscriber(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.subscriptions.retain(|_, subscribers| {
            let before = subscribers.len();
            subscribers.retain(|s| s.id() != id);
            removed |= subscribers.len() != before;
            !subscribers.is_empty()
        });
        removed
    }

    /// Handler functions registered for `type_id`, cloned so the caller can
    /// run them without holding a borrow of the map.
    pub fn handlers_for(&self, type_id: &TypeId) -> Vec<SubscribeFn> {
        self.subscriptions
            .get(type_id)
            .map(|subs| subs.iter().map(Subscriber::subscriber).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod event_subscription_tests {
    use super::*;
    use std::sync::Mutex;

    struct TestMessageEvent {
        message: &'static str,
    }

    #[test]
    fn add_and_remove_subscriber_test() {
        let mut subscriptions = EventSubscriptions::new();
        let first = subscriptions.add_subscriber(
            TypeId::of::<TestMessageEvent>(),
            make_subscriber(|_: &TestMessageEvent| {}),
        );
        let second = subscriptions.add_subscriber(
            TypeId::of::<TestMessageEvent>(),
            make_subscriber(|_: &TestMessageEvent| {}),
        );
        assert_ne!(first, second);
        assert_eq!(subscriptions.len(), 2);

        assert!(subscriptions.remove_subscriber(first));
        assert!(!subscriptions.remove_subscriber(first));
        assert_eq!(subscriptions.len(), 1);

        assert!(subscriptions.remove_subscriber(second));
        assert!(subscriptions.is_empty());
    }

    #[test]
    fn handlers_run_in_subscription_order_test() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subscriptions = EventSubscriptions::new();
        for tag in ["fire1", "fire2"] {
            let log = Arc::clone(&log);
            subscriptions.add_subscriber(
                TypeId::of::<TestMessageEvent>(),
                make_subscriber(move |event: &TestMessageEvent| {
                    log.lock().unwrap().push(format!("{tag}: {}", event.message));
                }),
            );
        }

        let event = TestMessageEvent { message: "test" };
        for handler in subscriptions.handlers_for(&TypeId::of::<TestMessageEvent>()) {
            handler(&event as &dyn Event);
        }

        assert_eq!(*log.lock().unwrap(), vec!["fire1: test", "fire2: test"]);
    }
}
