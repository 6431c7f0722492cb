//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// `-(t * (t - 2))`, decelerating from full speed to rest
    #[default]
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutCubic,
}

impl Easing {
    /// Apply the easing function to a progress value, clamped to 0.0..=1.0
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => -(t * (t - 2.0)),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// Derivative of [`Easing::apply`] with respect to progress
    pub fn slope(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => 1.0,
            Easing::EaseOutQuad => 2.0 * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    4.0 * t
                } else {
                    4.0 * (1.0 - t)
                }
            }
            Easing::EaseOutCubic => 3.0 * (1.0 - t).powi(2),
        }
    }

    /// Slope at t = 0, never below 1.0 so callers can divide by it
    pub fn launch_slope(&self) -> f32 {
        self.slope(0.0).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseOutCubic,
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_ease_out_quad_matches_formula() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((Easing::EaseOutQuad.apply(t) - (1.0 - (1.0 - t).powi(2))).abs() < 1e-6);
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::EaseOutQuad.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseOutQuad.apply(3.0), 1.0);
    }

    #[test]
    fn test_ease_out_decelerates() {
        assert_eq!(Easing::EaseOutQuad.slope(0.0), 2.0);
        assert!(Easing::EaseOutQuad.slope(0.5) < Easing::EaseOutQuad.slope(0.1));
        assert_eq!(Easing::EaseOutQuad.slope(1.0), 0.0);
    }

    #[test]
    fn test_launch_slope_never_zero() {
        assert_eq!(Easing::EaseInOutQuad.launch_slope(), 1.0);
        assert_eq!(Easing::EaseOutCubic.launch_slope(), 3.0);
    }
}
