//! Scroll configuration
//!
//! [`ScrollConfig`] holds every tunable of a windowed scroller. Individual
//! settings can be changed at runtime through [`ScrollOption`], which is
//! validated as a whole before it is committed.

use glide_animation::{Easing, MomentumConfig};
use glide_core::{ConfigError, ScrollDirection};
use serde::{Deserialize, Serialize};

use crate::scrollbar::{ScrollbarConfig, ScrollbarVisibility};

/// Configuration for scroll behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Scroll axis
    pub direction: ScrollDirection,
    /// Wrap around the data set instead of stopping at its ends
    pub wrap: bool,
    /// How long a flick keeps moving (ms)
    pub scroll_duration_ms: f64,
    /// Carry flicks past the ends and snap back
    pub overshoot_enabled: bool,
    pub overshoot_duration_ms: f64,
    pub snapback_duration_ms: f64,
    /// Distance a pointer must travel before a press becomes a drag
    pub move_threshold: f32,
    /// A release later than this after the last move does not flick (ms)
    pub move_interval_threshold_ms: f64,
    /// Delay between animation ticks (ms)
    pub timer_interval_ms: f64,
    /// Maximum rubber-band distance as a fraction of the viewport (0.0-1.0)
    pub max_overscroll: f32,
    pub easing: Easing,
    /// Delay before re-measuring a slot that reported zero size (ms)
    pub measure_retry_interval_ms: f64,
    pub measure_max_retries: u32,
    pub scrollbar: ScrollbarConfig,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            direction: ScrollDirection::Vertical,
            wrap: false,
            scroll_duration_ms: 2000.0,
            overshoot_enabled: false,
            overshoot_duration_ms: 250.0,
            snapback_duration_ms: 500.0,
            move_threshold: 10.0,
            move_interval_threshold_ms: 150.0,
            timer_interval_ms: 10.0,
            max_overscroll: 0.3,
            easing: Easing::EaseOutQuad,
            measure_retry_interval_ms: 100.0,
            measure_max_retries: 10,
            scrollbar: ScrollbarConfig::default(),
        }
    }
}

impl ScrollConfig {
    /// Config for a wrapping (circular) list
    pub fn circular() -> Self {
        Self {
            wrap: true,
            ..Default::default()
        }
    }

    /// Config with overshoot and snap-back at the ends
    pub fn with_overshoot() -> Self {
        Self {
            overshoot_enabled: true,
            ..Default::default()
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("scroll_duration_ms", self.scroll_duration_ms)?;
        ConfigError::positive("timer_interval_ms", self.timer_interval_ms)?;
        ConfigError::positive("measure_retry_interval_ms", self.measure_retry_interval_ms)?;
        ConfigError::non_negative("overshoot_duration_ms", self.overshoot_duration_ms)?;
        ConfigError::non_negative("snapback_duration_ms", self.snapback_duration_ms)?;
        ConfigError::non_negative("move_interval_threshold_ms", self.move_interval_threshold_ms)?;
        ConfigError::within("move_threshold", self.move_threshold as f64, 0.0, f64::MAX)?;
        ConfigError::within("max_overscroll", self.max_overscroll as f64, 0.0, 1.0)?;
        self.scrollbar.validate()
    }

    /// Apply a single option. The config is left untouched if the result is invalid.
    pub fn apply(&mut self, option: ScrollOption) -> Result<(), ConfigError> {
        let mut next = *self;
        match option {
            ScrollOption::Direction(direction) => next.direction = direction,
            ScrollOption::Wrap(wrap) => next.wrap = wrap,
            ScrollOption::ScrollDuration(ms) => next.scroll_duration_ms = ms,
            ScrollOption::OvershootEnabled(enabled) => next.overshoot_enabled = enabled,
            ScrollOption::OvershootDuration(ms) => next.overshoot_duration_ms = ms,
            ScrollOption::SnapbackDuration(ms) => next.snapback_duration_ms = ms,
            ScrollOption::MoveThreshold(distance) => next.move_threshold = distance,
            ScrollOption::MoveIntervalThreshold(ms) => next.move_interval_threshold_ms = ms,
            ScrollOption::TimerInterval(ms) => next.timer_interval_ms = ms,
            ScrollOption::MaxOverscroll(fraction) => next.max_overscroll = fraction,
            ScrollOption::Easing(easing) => next.easing = easing,
            ScrollOption::ScrollbarVisibility(visibility) => next.scrollbar.visibility = visibility,
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Tuning for the momentum tracker over a viewport `viewport_extent` long.
    /// Wrapping lists never overshoot.
    pub fn momentum(&self, viewport_extent: f32) -> MomentumConfig {
        MomentumConfig {
            easing: self.easing,
            overshoot_enabled: self.overshoot_enabled && !self.wrap,
            overshoot_duration_ms: self.overshoot_duration_ms,
            snapback_duration_ms: self.snapback_duration_ms,
            max_overshoot: Some(viewport_extent * self.max_overscroll),
        }
    }
}

/// One runtime-adjustable setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOption {
    Direction(ScrollDirection),
    Wrap(bool),
    ScrollDuration(f64),
    OvershootEnabled(bool),
    OvershootDuration(f64),
    SnapbackDuration(f64),
    MoveThreshold(f32),
    MoveIntervalThreshold(f64),
    TimerInterval(f64),
    MaxOverscroll(f32),
    Easing(Easing),
    ScrollbarVisibility(ScrollbarVisibility),
}

impl ScrollOption {
    /// Options that change which items the slots hold
    pub fn resets_window(&self) -> bool {
        matches!(self, ScrollOption::Direction(_) | ScrollOption::Wrap(_))
    }
}
