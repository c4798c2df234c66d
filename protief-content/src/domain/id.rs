use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of entity ids.
///
/// Ids are assigned once when an entity is created and never reassigned.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Millisecond timestamp ids.
///
/// Two calls within the same millisecond still yield distinct ids: the
/// generator never hands out a value smaller than or equal to the previous
/// one.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: AtomicI64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next strictly increasing millisecond value.
    pub fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if now > prev { now } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        self.next_millis().to_string()
    }
}

/// Draws ids from `ids` until one is not taken.
pub(crate) fn fresh_id<F>(ids: &dyn IdGenerator, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = ids.next_id();
        if !taken(&id) {
            return id;
        }
    }
}
