use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Sentinel for "no successful ping yet"
const NEVER: i64 = i64::MIN;

/// State shared between the poll loop (single writer) and the /health handler (readers)
///
/// Both fields are plain atomics: readers only need the timestamp, so there is
/// no invariant spanning the two that would call for a lock.
#[derive(Debug)]
pub struct MonitorState {
    /// Unix milliseconds of the last successful ping, `NEVER` until the first one
    last_success_ms: AtomicI64,
    consecutive_failures: AtomicU32,
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            last_success_ms: AtomicI64::new(NEVER),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        match self.last_success_ms.load(Ordering::Acquire) {
            NEVER => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }

    pub fn record_success_at(&self, at: DateTime<Utc>) {
        self.last_success_ms
            .store(at.timestamp_millis(), Ordering::Release);
    }

    pub fn record_success(&self) {
        self.record_success_at(Utc::now());
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Acquire)
    }

    pub fn set_consecutive_failures(&self, failures: u32) {
        self.consecutive_failures.store(failures, Ordering::Release);
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}
