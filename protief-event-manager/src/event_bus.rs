use crate::event_subscription::{make_subscriber, EventSubscriptions, SubscriptionId};
use std::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock};

/// Anything `'static` can be published.
pub trait Event: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Synchronous typed publish/subscribe bus.
///
/// Handlers run on the publishing thread, in subscription order. The lock is
/// released before handlers run, so a handler may subscribe or unsubscribe.
#[derive(Default)]
pub struct EventBus {
    event_subscriptions: RwLock<EventSubscriptions>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(event_subscriptions: EventSubscriptions) -> Self {
        Self {
            event_subscriptions: RwLock::new(event_subscriptions),
        }
    }

    pub fn subscribe<T, F>(&self, handler: F) -> SubscriptionId
    where
        T: Event + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.event_subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_subscriber(TypeId::of::<T>(), make_subscriber(handler))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove_subscriber(id)
    }

    /// Delivers `event` to every handler of its type. Returns the number of
    /// handlers that ran.
    pub fn publish<T: Event>(&self, event: &T) -> usize {
        let type_id = event.as_any().type_id();
        let handlers = self
            .event_subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers_for(&type_id);

        if handlers.is_empty() {
            tracing::debug!("No subscribers found for event type: {:?}", type_id);
        }
        for handler in &handlers {
            handler(event as &dyn Event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.event_subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
