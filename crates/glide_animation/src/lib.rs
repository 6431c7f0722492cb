//! Glide Animation System
//!
//! Time-sampled motion for scroll containers.
//!
//! # Features
//!
//! - **Momentum**: flick deceleration with optional overshoot and snap-back
//! - **Tweens**: fixed-duration interpolation for programmatic scrolling
//! - **Scheduler**: cancellable ticks, so no stale callback can ever fire
//! - **Frame-rate independent**: positions depend on elapsed time only

pub mod easing;
pub mod momentum;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use momentum::{MomentumConfig, MomentumPhase, MomentumTracker};
pub use scheduler::{AnimationScheduler, SchedulerStats, TickId};
pub use tween::Tween;
