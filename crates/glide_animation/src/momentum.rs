//! Momentum tracker
//!
//! Turns a released gesture into a decaying position curve. The curve is a
//! closed-form function of elapsed time, so the result is the same whether
//! the tracker is sampled every 8ms or every 40ms.
//!
//! Phases:
//!
//! ```text
//! Scrolling ──crossed bound──> Overshot ──time up──> Snapback ──time up──> Done
//!     │                  (overshoot off)                                    ▲
//!     └────────────────────── time up / crossed bound ─────────────────────┘
//! ```

use glide_core::SharedClock;

use crate::easing::Easing;

/// Motion phase of a [`MomentumTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MomentumPhase {
    /// Decelerating freely inside the bounds
    Scrolling,
    /// Carried past a bound, still decelerating
    Overshot,
    /// Returning to the bound that was overshot
    Snapback,
    /// At rest
    #[default]
    Done,
}

/// Tuning for a [`MomentumTracker`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumConfig {
    pub easing: Easing,
    /// Carry past a bound and snap back instead of stopping dead
    pub overshoot_enabled: bool,
    pub overshoot_duration_ms: f64,
    pub snapback_duration_ms: f64,
    /// Furthest an overshoot may carry past a bound; `None` leaves it unlimited
    pub max_overshoot: Option<f32>,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            easing: Easing::EaseOutQuad,
            overshoot_enabled: false,
            overshoot_duration_ms: 250.0,
            snapback_duration_ms: 500.0,
            max_overshoot: None,
        }
    }
}

impl MomentumConfig {
    /// Scrolling/done only, as used by wrapping containers
    pub fn simple() -> Self {
        Self::default()
    }

    pub fn with_overshoot() -> Self {
        Self {
            overshoot_enabled: true,
            ..Default::default()
        }
    }
}

/// Time-sampled momentum simulation for one axis
pub struct MomentumTracker {
    config: MomentumConfig,
    clock: SharedClock,
    phase: MomentumPhase,
    position: f32,
    /// Position the current phase started from
    origin: f32,
    /// Displacement the current phase covers when it runs to completion
    travel: f32,
    start_time: f64,
    duration: f64,
    bounds: Option<(f32, f32)>,
    /// Bound to come to rest on after leaving the bounds
    rest: f32,
}

impl MomentumTracker {
    pub fn new(config: MomentumConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            phase: MomentumPhase::Done,
            position: 0.0,
            origin: 0.0,
            travel: 0.0,
            start_time: 0.0,
            duration: 0.0,
            bounds: None,
            rest: 0.0,
        }
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Replace the tuning. Takes effect on the next `start`.
    pub fn set_config(&mut self, config: MomentumConfig) {
        self.config = config;
    }

    /// Begin a new motion.
    ///
    /// `velocity` is the total displacement covered by the time `duration_ms`
    /// elapses. `bounds` is `(min, max)`; `None` means unbounded. A zero
    /// velocity or a non-positive duration leaves the tracker at rest.
    pub fn start(&mut self, position: f32, velocity: f32, duration_ms: f64, bounds: Option<(f32, f32)>) {
        self.reset();
        self.position = position;
        self.bounds = bounds.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });

        let movable = duration_ms.is_finite()
            && duration_ms > 0.0
            && velocity.is_finite()
            && velocity != 0.0
            && position.is_finite();
        if !movable {
            tracing::trace!(position, velocity, duration_ms, "momentum start without motion");
            return;
        }

        let now = self.clock.now_ms();
        if let Some(bound) = self.outside_bound(position) {
            self.begin_snapback(now, bound);
            return;
        }

        self.phase = MomentumPhase::Scrolling;
        self.origin = position;
        self.travel = velocity;
        self.start_time = now;
        self.duration = duration_ms;
    }

    /// Sample the curve at the current time and return the new position
    pub fn update(&mut self) -> f32 {
        if self.phase == MomentumPhase::Done {
            return self.position;
        }

        let now = self.clock.now_ms();
        let elapsed = (now - self.start_time).clamp(0.0, self.duration);
        let t = (elapsed / self.duration) as f32;
        let finished = elapsed >= self.duration;
        let easing = self.config.easing;

        match self.phase {
            MomentumPhase::Scrolling => {
                let x = self.origin + self.travel * easing.apply(t);
                if let Some(bound) = self.outside_bound(x) {
                    let speed = self.travel * easing.slope(t) / self.duration as f32;
                    self.begin_overshoot(now, bound, speed);
                } else {
                    self.position = x;
                    if finished {
                        self.phase = MomentumPhase::Done;
                    }
                }
            }
            MomentumPhase::Overshot => {
                self.position = self.origin + self.travel * easing.apply(t);
                if finished {
                    self.begin_snapback(now, self.rest);
                }
            }
            MomentumPhase::Snapback => {
                if finished {
                    self.position = self.rest;
                    self.phase = MomentumPhase::Done;
                } else {
                    self.position = self.origin + self.travel * easing.apply(t);
                }
            }
            MomentumPhase::Done => {}
        }

        self.position
    }

    /// Jump straight to where the current motion would come to rest
    pub fn finish(&mut self) -> f32 {
        match self.phase {
            MomentumPhase::Scrolling => {
                let x = self.origin + self.travel;
                self.position = self.outside_bound(x).unwrap_or(x);
            }
            MomentumPhase::Overshot | MomentumPhase::Snapback => self.position = self.rest,
            MomentumPhase::Done => {}
        }
        self.phase = MomentumPhase::Done;
        self.position
    }

    /// Back to the initial zero state
    pub fn reset(&mut self) {
        self.phase = MomentumPhase::Done;
        self.position = 0.0;
        self.origin = 0.0;
        self.travel = 0.0;
        self.start_time = 0.0;
        self.duration = 0.0;
        self.bounds = None;
        self.rest = 0.0;
    }

    /// Last computed position; stable between `update` calls
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn phase(&self) -> MomentumPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == MomentumPhase::Done
    }

    fn outside_bound(&self, x: f32) -> Option<f32> {
        let (min, max) = self.bounds?;
        if x < min {
            Some(min)
        } else if x > max {
            Some(max)
        } else {
            None
        }
    }

    /// `speed` is the instantaneous velocity in units per millisecond
    fn begin_overshoot(&mut self, now: f64, bound: f32, speed: f32) {
        self.position = bound;
        self.rest = bound;

        let duration = self.config.overshoot_duration_ms;
        if !self.config.overshoot_enabled || duration <= 0.0 {
            self.phase = MomentumPhase::Done;
            return;
        }

        // Half of the distance the current speed would coast in the overshoot window
        let mut travel = speed * duration as f32 / self.config.easing.launch_slope() / 2.0;
        if let Some(limit) = self.config.max_overshoot {
            travel = travel.clamp(-limit.abs(), limit.abs());
        }
        tracing::trace!(bound, travel, "momentum overshot");

        self.phase = MomentumPhase::Overshot;
        self.origin = bound;
        self.travel = travel;
        self.start_time = now;
        self.duration = duration;
    }

    fn begin_snapback(&mut self, now: f64, bound: f32) {
        self.rest = bound;

        let duration = self.config.snapback_duration_ms;
        if !(duration.is_finite() && duration > 0.0) {
            self.position = bound;
            self.phase = MomentumPhase::Done;
            return;
        }

        self.phase = MomentumPhase::Snapback;
        self.origin = self.position;
        self.travel = bound - self.position;
        self.start_time = now;
        self.duration = duration;
    }
}

impl std::fmt::Debug for MomentumTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MomentumTracker")
            .field("phase", &self.phase)
            .field("position", &self.position)
            .field("origin", &self.origin)
            .field("travel", &self.travel)
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// Displacement a motion of `duration_ms` must cover so that it launches at
/// `velocity` (units per millisecond) under `easing`
pub fn travel_for_velocity(easing: Easing, velocity: f32, duration_ms: f64) -> f32 {
    velocity * duration_ms as f32 / easing.launch_slope()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::ManualClock;
    use std::sync::Arc;

    fn tracker(config: MomentumConfig) -> (MomentumTracker, Arc<ManualClock>) {
        let clock = ManualClock::shared();
        (MomentumTracker::new(config, clock.clone()), clock)
    }

    #[test]
    fn test_full_displacement_at_duration() {
        let (mut t, clock) = tracker(MomentumConfig::simple());
        t.start(100.0, -50.0, 500.0, None);
        assert_eq!(t.phase(), MomentumPhase::Scrolling);

        clock.advance(500.0);
        assert_eq!(t.update(), 50.0);
        assert!(t.is_done());
    }

    #[test]
    fn test_zero_velocity_is_noop() {
        let (mut t, clock) = tracker(MomentumConfig::simple());
        t.start(-120.0, 0.0, 500.0, None);
        assert!(t.is_done());
        assert_eq!(t.position(), -120.0);

        clock.advance(100.0);
        assert_eq!(t.update(), -120.0);
    }

    #[test]
    fn test_non_positive_duration_is_done() {
        let (mut t, _clock) = tracker(MomentumConfig::simple());
        t.start(10.0, 200.0, 0.0, None);
        assert!(t.is_done());
        assert_eq!(t.position(), 10.0);

        t.start(10.0, 200.0, -5.0, None);
        assert!(t.is_done());

        t.start(10.0, 200.0, f64::NAN, None);
        assert!(t.is_done());
    }

    #[test]
    fn test_position_stable_between_updates() {
        let (mut t, clock) = tracker(MomentumConfig::simple());
        t.start(0.0, 100.0, 1000.0, None);
        clock.advance(250.0);
        let p = t.update();
        assert_eq!(t.position(), p);
        assert_eq!(t.position(), p);
        assert!(p > 0.0 && p < 100.0);
    }

    #[test]
    fn test_frame_rate_independent() {
        let (mut fast, fast_clock) = tracker(MomentumConfig::simple());
        let (mut slow, slow_clock) = tracker(MomentumConfig::simple());
        fast.start(0.0, -400.0, 600.0, None);
        slow.start(0.0, -400.0, 600.0, None);

        for _ in 0..30 {
            fast_clock.advance(10.0);
            fast.update();
        }
        for _ in 0..10 {
            slow_clock.advance(30.0);
            slow.update();
        }

        assert!((fast.position() - slow.position()).abs() < 1e-3);
    }

    #[test]
    fn test_elapsed_equal_to_duration_terminates() {
        let (mut t, clock) = tracker(MomentumConfig::simple());
        t.start(0.0, 10.0, 100.0, None);
        clock.advance(99.0);
        t.update();
        assert!(!t.is_done());

        clock.advance(1.0);
        assert_eq!(t.update(), 10.0);
        assert!(t.is_done());
    }

    #[test]
    fn test_bound_without_overshoot_stops() {
        let (mut t, clock) = tracker(MomentumConfig::simple());
        t.start(-50.0, -300.0, 500.0, Some((-100.0, 0.0)));

        while !t.is_done() {
            clock.advance(10.0);
            t.update();
        }
        assert_eq!(t.position(), -100.0);
    }

    #[test]
    fn test_overshoot_then_snapback() {
        let (mut t, clock) = tracker(MomentumConfig::with_overshoot());
        t.start(-50.0, -300.0, 500.0, Some((-100.0, 0.0)));

        let mut saw_overshot = false;
        let mut furthest = 0.0f32;
        let mut ticks = 0;
        while !t.is_done() && ticks < 1000 {
            clock.advance(10.0);
            let p = t.update();
            furthest = furthest.min(p);
            saw_overshot |= t.phase() == MomentumPhase::Overshot;
            ticks += 1;
        }

        assert!(saw_overshot);
        assert!(furthest < -100.0);
        assert_eq!(t.position(), -100.0);
        assert!(t.is_done());
    }

    #[test]
    fn test_overshoot_distance_is_limited() {
        let config = MomentumConfig {
            max_overshoot: Some(60.0),
            ..MomentumConfig::with_overshoot()
        };
        let (mut t, clock) = tracker(config);
        t.start(0.0, -5000.0, 500.0, Some((-600.0, 0.0)));

        let mut furthest = 0.0f32;
        let mut ticks = 0;
        while !t.is_done() && ticks < 1000 {
            clock.advance(10.0);
            furthest = furthest.min(t.update());
            ticks += 1;
        }

        assert!(furthest < -600.0);
        assert!(furthest >= -660.0, "overshot to {furthest}");
        assert_eq!(t.position(), -600.0);
    }

    #[test]
    fn test_start_outside_bounds_snaps_back() {
        let (mut t, clock) = tracker(MomentumConfig::with_overshoot());
        t.start(40.0, -10.0, 500.0, Some((-100.0, 0.0)));
        assert_eq!(t.phase(), MomentumPhase::Snapback);

        clock.advance(250.0);
        let halfway = t.update();
        assert!(halfway > 0.0 && halfway < 40.0);

        clock.advance(250.0);
        assert_eq!(t.update(), 0.0);
        assert!(t.is_done());
    }

    #[test]
    fn test_zero_snapback_duration_lands_immediately() {
        let config = MomentumConfig {
            snapback_duration_ms: 0.0,
            ..MomentumConfig::with_overshoot()
        };
        let (mut t, _clock) = tracker(config);
        t.start(40.0, -10.0, 500.0, Some((-100.0, 0.0)));

        assert!(t.is_done());
        assert_eq!(t.position(), 0.0);
    }

    #[test]
    fn test_finish_jumps_to_rest() {
        let (mut t, clock) = tracker(MomentumConfig::simple());
        t.start(0.0, -500.0, 1000.0, Some((-200.0, 0.0)));
        clock.advance(10.0);
        t.update();

        assert_eq!(t.finish(), -200.0);
        assert!(t.is_done());
    }

    #[test]
    fn test_reset() {
        let (mut t, _clock) = tracker(MomentumConfig::simple());
        t.start(5.0, 50.0, 100.0, None);
        t.reset();
        assert!(t.is_done());
        assert_eq!(t.position(), 0.0);
    }

    #[test]
    fn test_travel_for_velocity() {
        // Ease-out quad launches at twice the average speed
        assert_eq!(travel_for_velocity(Easing::EaseOutQuad, -2.0, 2000.0), -2000.0);
        assert_eq!(travel_for_velocity(Easing::Linear, 1.0, 300.0), 300.0);
    }
}
