//! Time and id collaborators consumed by the tweet service.
//!
//! # Responsibility
//! - Abstract `now()` and `new_id()` so service logic stays deterministic
//!   under test.
//!
//! # Invariants
//! - `Clock::now_ms` returns Unix epoch milliseconds.
//! - `IdGenerator::next_id` never returns the same id twice per instance.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Source of creation/edit timestamps.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Source of opaque unique ids for tweets and comments.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Wall clock backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        // A clock before 1970 collapses to zero rather than failing the call.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            })
    }
}

/// Settable clock for deterministic timestamps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}

/// Random UUID v4 ids in hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable ids `<prefix>-000001`, `<prefix>-000002`, ...
///
/// Lexical order equals issue order up to 999_999 ids.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}-{value:06}", self.prefix)
    }
}

impl<T: Clock + ?Sized> Clock for std::rc::Rc<T> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidGenerator};

    #[test]
    fn sequential_ids_are_padded_and_increasing() {
        let ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t-000001");
        assert_eq!(ids.next_id(), "t-000002");
    }

    #[test]
    fn uuid_generator_yields_distinct_ids() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(100);
        clock.advance(50);
        assert_eq!(clock.now_ms(), 150);
        clock.set(7);
        assert_eq!(clock.now_ms(), 7);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
