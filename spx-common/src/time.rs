//! Timestamp utilities and clock sources
//!
//! All playback bookkeeping is done in wall-clock milliseconds. Components
//! never read the system clock directly; they hold a [`Clock`] so tests can
//! drive elapsed play and pause intervals deterministically.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of wall-clock time in milliseconds
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_ms(&self) -> i64;
}

/// Clock backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually advanced clock
///
/// Clones share the same underlying time value, so a test can keep one
/// handle while the component under test owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock reading `start_ms`
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Move time forward by `ms`
    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Format milliseconds as seconds with millisecond precision (`"1.250s"`)
pub fn format_millis(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let abs = ms.unsigned_abs();
    format!("{}{}.{:03}s", sign, abs / 1000, abs % 1000)
}
