//! Gesture tracking
//!
//! [`ScrollState`] is the per-container interaction state machine and
//! [`DragTracker`] turns a stream of pointer samples into an offset and a
//! release velocity.

use glide_core::{Point, ScrollDirection, StateTransitions};

/// Events driving [`ScrollState`]
pub mod scroll_events {
    /// Pointer went down on the container
    pub const DRAG_START: u32 = 100;
    /// Pointer released without enough velocity to flick
    pub const DRAG_END: u32 = 101;
    /// Pointer released with flick velocity, or a fling was requested
    pub const FLICK: u32 = 102;
    /// Timed scroll to a fixed destination started
    pub const SNAP: u32 = 103;
    /// Animation finished
    pub const SETTLED: u32 = 104;
    /// Gesture abandoned or handed to another container
    pub const CANCEL: u32 = 105;
}

/// Interaction state of a scroll container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollState {
    /// Nothing moving
    #[default]
    Idle,
    /// Pointer down, offset follows the pointer
    Dragging,
    /// Momentum tracker drives the offset
    Inertial,
    /// Timed animation to a fixed destination
    Snapping,
}

impl ScrollState {
    /// Content is being moved by an animation
    pub fn is_animating(&self) -> bool {
        matches!(self, ScrollState::Inertial | ScrollState::Snapping)
    }
}

impl StateTransitions for ScrollState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use scroll_events::*;
        use ScrollState::*;
        match (self, event) {
            // A new pointer-down always wins
            (_, DRAG_START) => Some(Dragging),

            (Dragging, DRAG_END) => Some(Idle),
            (_, FLICK) => Some(Inertial),

            (_, SNAP) => Some(Snapping),

            (Inertial | Snapping, SETTLED) => Some(Idle),
            (Dragging | Inertial | Snapping, CANCEL) => Some(Idle),
            _ => None,
        }
    }
}

/// Pointer samples for one drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    start: Point,
    start_time: f64,
    /// Offset when the pointer went down
    base_offset: f32,
    last: Point,
    last_time: f64,
    /// Main-axis speed between the last two samples, units per ms
    velocity: f32,
    /// Pointer has travelled past the move threshold
    moved: bool,
}

impl DragTracker {
    pub fn new(pointer: Point, time_ms: f64, base_offset: f32) -> Self {
        Self {
            start: pointer,
            start_time: time_ms,
            base_offset,
            last: pointer,
            last_time: time_ms,
            velocity: 0.0,
            moved: false,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn base_offset(&self) -> f32 {
        self.base_offset
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn mark_moved(&mut self) {
        self.moved = true;
    }

    /// Displacement from the press point
    pub fn delta(&self, pointer: Point) -> Point {
        pointer - self.start
    }

    /// Pointer is far enough from the press point to count as a drag
    pub fn beyond_threshold(&self, pointer: Point, threshold: f32) -> bool {
        let d = self.delta(pointer);
        d.x.abs() >= threshold || d.y.abs() >= threshold
    }

    /// Record a sample and return the raw, unclamped offset it implies
    pub fn record(&mut self, pointer: Point, time_ms: f64, axis: ScrollDirection) -> f32 {
        let dt = time_ms - self.last_time;
        if dt > 0.0 {
            self.velocity = (axis.main(pointer) - axis.main(self.last)) / dt as f32;
        }
        self.last = pointer;
        self.last_time = time_ms.max(self.last_time);
        self.base_offset + axis.main(self.delta(pointer))
    }

    /// Speed to hand to the momentum tracker on release.
    ///
    /// Zero if the pointer rested longer than `interval_threshold_ms` before
    /// it was lifted, so a slow drag never turns into a phantom flick.
    pub fn release_velocity(&self, release_ms: f64, interval_threshold_ms: f64) -> f32 {
        if self.moved && release_ms - self.last_time <= interval_threshold_ms {
            self.velocity
        } else {
            0.0
        }
    }
}
