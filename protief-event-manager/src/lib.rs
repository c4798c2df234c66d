pub mod event_bus;
pub mod event_subscription;

pub use event_bus::{Event, EventBus};
pub use event_subscription::{make_subscriber, EventSubscriptions, Subscriber, SubscriptionId};
