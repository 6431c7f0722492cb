//! Fixed-duration interpolation between two values

use crate::easing::Easing;

/// A single eased transition from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    /// Value at `now_ms`, and whether the tween has finished.
    ///
    /// The final sample is exactly `to`.
    pub fn sample(&self, now_ms: f64) -> (f32, bool) {
        if self.duration_ms.is_nan() || self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let elapsed = (now_ms - self.start_ms).max(0.0);
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        let t = (elapsed / self.duration_ms) as f32;
        (self.from + (self.to - self.from) * self.easing.apply(t), false)
    }
}
