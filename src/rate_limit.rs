//! Per-caller fixed-window admission control.
//!
//! Records live behind [`RateLimitStore`] so the process-local map is one
//! implementation among others. Admission is an optimistic read followed by a
//! compare-and-swap, so concurrent calls for the same caller cannot both slip
//! under the limit.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Window state for one caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed { reset_at: DateTime<Utc> },
    Denied { reset_at: DateTime<Utc> },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        match self {
            Admission::Allowed { reset_at } | Admission::Denied { reset_at } => *reset_at,
        }
    }
}

/// Storage for rate-limit records.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateLimitRecord>;

    /// Replace the record for `key` with `next` only if it currently equals
    /// `expected` (`None` meaning absent). Returns whether the swap happened.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<RateLimitRecord>,
        next: RateLimitRecord,
    ) -> bool;

    /// Drop records whose window ended before `now`. Returns how many went.
    fn evict_expired(&self, now: DateTime<Utc>) -> usize;
}

/// Process-local store. Grows with the number of distinct callers unless
/// [`RateLimitStore::evict_expired`] is called.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn get(&self, key: &str) -> Option<RateLimitRecord> {
        self.records.lock().get(key).copied()
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<RateLimitRecord>,
        next: RateLimitRecord,
    ) -> bool {
        let mut records = self.records.lock();
        if records.get(key).copied() != expected {
            return false;
        }
        records.insert(key.to_string(), next);
        true
    }

    fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| now <= record.window_reset_at);
        before - records.len()
    }
}

/// Time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Fixed-window limiter over an injected store
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
        window: Duration,
        max_requests: u32,
    ) -> Self {
        Self {
            store,
            clock,
            window,
            max_requests,
        }
    }

    /// In-memory store and wall clock.
    pub fn in_memory(window: Duration, max_requests: u32) -> Self {
        Self::new(
            Arc::new(InMemoryRateLimitStore::new()),
            Arc::new(SystemClock),
            window,
            max_requests,
        )
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn store(&self) -> &Arc<dyn RateLimitStore> {
        &self.store
    }

    /// Admit or deny one request from `caller_id`, consuming a slot on admit.
    /// Denial leaves the record untouched.
    pub fn check_and_consume(&self, caller_id: &str) -> Admission {
        loop {
            let now = self.clock.now();
            let current = self.store.get(caller_id);

            let next = match current {
                Some(record) if now <= record.window_reset_at => {
                    if record.count >= self.max_requests {
                        debug!(
                            caller_id,
                            count = record.count,
                            reset_at = %record.window_reset_at,
                            "Rate limit denied"
                        );
                        return Admission::Denied {
                            reset_at: record.window_reset_at,
                        };
                    }
                    RateLimitRecord {
                        count: record.count + 1,
                        window_reset_at: record.window_reset_at,
                    }
                }
                _ => RateLimitRecord {
                    count: 1,
                    window_reset_at: now + self.window,
                },
            };

            if self.store.compare_and_swap(caller_id, current, next) {
                return Admission::Allowed {
                    reset_at: next.window_reset_at,
                };
            }
            // Lost a race for this caller; re-read and decide again.
        }
    }
}
