//! Tick scheduler
//!
//! Animations do not own timers. They ask the scheduler for a tick and get
//! back a [`TickId`]; the host pumps the scheduler from its event loop.
//! Keys are generational, so a cancelled tick can never be mistaken for a
//! live one, even if its slot is reused.

use glide_core::SharedClock;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Cancel token for a scheduled tick
    pub struct TickId;
}

struct PendingTick {
    due_at: f64,
}

/// Lifetime counters, mostly for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub scheduled: u64,
    pub cancelled: u64,
    pub fired: u64,
}

impl SchedulerStats {
    /// Ticks scheduled but neither cancelled nor fired
    pub fn outstanding(&self) -> u64 {
        self.scheduled - self.cancelled - self.fired
    }
}

/// Holds every pending tick for the animations sharing one clock
pub struct AnimationScheduler {
    ticks: SlotMap<TickId, PendingTick>,
    clock: SharedClock,
    stats: SchedulerStats,
}

impl AnimationScheduler {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            ticks: SlotMap::with_key(),
            clock,
            stats: SchedulerStats::default(),
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Schedule a tick `delay_ms` from now
    pub fn schedule_after(&mut self, delay_ms: f64) -> TickId {
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        let due_at = self.clock.now_ms() + delay;
        self.stats.scheduled += 1;
        self.ticks.insert(PendingTick { due_at })
    }

    /// Cancel a pending tick. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TickId) -> bool {
        let removed = self.ticks.remove(id).is_some();
        if removed {
            self.stats.cancelled += 1;
            tracing::debug!(?id, "tick cancelled");
        }
        removed
    }

    pub fn is_pending(&self, id: TickId) -> bool {
        self.ticks.contains_key(id)
    }

    /// Consume `id` if it is due. Returns true exactly once per tick.
    pub fn take_if_due(&mut self, id: TickId) -> bool {
        let now = self.clock.now_ms();
        match self.ticks.get(id) {
            Some(tick) if tick.due_at <= now => {
                self.ticks.remove(id);
                self.stats.fired += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume every due tick, earliest first
    pub fn take_due(&mut self) -> Vec<TickId> {
        let now = self.clock.now_ms();
        let mut due: Vec<(TickId, f64)> = self
            .ticks
            .iter()
            .filter(|(_, tick)| tick.due_at <= now)
            .map(|(id, tick)| (id, tick.due_at))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (id, _) in &due {
            self.ticks.remove(*id);
        }
        self.stats.fired += due.len() as u64;
        due.into_iter().map(|(id, _)| id).collect()
    }

    /// When the earliest pending tick is due
    pub fn next_due(&self) -> Option<f64> {
        self.ticks
            .values()
            .map(|tick| tick.due_at)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Number of pending ticks
    pub fn active_count(&self) -> usize {
        self.ticks.len()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}
