//! Monotonic clocks
//!
//! Every time-dependent component reads time through [`Clock`] so tests can
//! drive animations deterministically with a [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic time in milliseconds
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since an arbitrary, fixed origin
    fn now_ms(&self) -> f64;
}

/// Clock shared between a scheduler and the animations it drives
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    // f64 bit pattern
    now: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: AtomicU64::new(0.0f64.to_bits()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Move time forward by `ms` milliseconds. Negative values are ignored.
    pub fn advance(&self, ms: f64) {
        if ms.is_nan() || ms <= 0.0 {
            return;
        }
        let next = self.now_ms() + ms;
        self.now.store(next.to_bits(), Ordering::SeqCst);
    }

    /// Jump to an absolute time, never moving backwards
    pub fn set(&self, ms: f64) {
        if ms > self.now_ms() {
            self.now.store(ms.to_bits(), Ordering::SeqCst);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now.load(Ordering::SeqCst))
    }
}
