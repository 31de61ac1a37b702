use crate::backend::memory::{MemoryConnector, MemoryStore};
use crate::config::AcquireStrategy;
use crate::locks::{Clock, LockCoordinator};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub(crate) fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .unwrap();
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poison| poison.into_inner());
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

/// Store, clock, and a coordinator wired to both.
pub(crate) struct Harness {
    pub(crate) store: MemoryStore,
    pub(crate) clock: ManualClock,
    pub(crate) coordinator: LockCoordinator<MemoryConnector, ManualClock>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_strategy(AcquireStrategy::CheckThenSet)
    }

    pub(crate) fn with_strategy(strategy: AcquireStrategy) -> Self {
        let store = MemoryStore::new();
        let clock = ManualClock::at(2026, 10, 19, 9, 30);
        let coordinator =
            LockCoordinator::with_clock(store.connector(), clock.clone()).with_strategy(strategy);
        Self {
            store,
            clock,
            coordinator,
        }
    }

    /// Advance the store and the clock together.
    pub(crate) fn advance(&self, by: Duration) {
        self.store.advance(by);
        self.clock.advance(by);
    }
}
