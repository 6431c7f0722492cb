//! Pointer routing between nested scroll containers
//!
//! A drag starts on the innermost container under the pointer. If its first
//! decisive movement runs across that container's axis, the drag is handed
//! to the nearest ancestor scrolling along the movement instead.

use glide_core::{Point, ScrollDirection, Size};

use crate::data_source::DataSource;
use crate::ring::RecycleOutcome;
use crate::scroller::WindowedScroller;

/// What a container did with a pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The sample belongs to this container's drag
    Handled,
    /// No drag in progress
    Ignored,
    /// The movement runs across this container's axis; drag released
    HandOff,
}

/// Pointer-facing surface of a scroll container
pub trait ScrollHandler {
    fn axis(&self) -> ScrollDirection;
    fn on_drag_start(&mut self, pointer: Point, time_ms: f64);
    fn on_drag_move(&mut self, pointer: Point, time_ms: f64) -> DragOutcome;
    fn on_drag_stop(&mut self, pointer: Point, time_ms: f64) -> DragOutcome;
    fn cancel_drag(&mut self);
    fn recycle(&mut self);
    fn resize(&mut self, viewport: Size);
}

impl<S: DataSource> ScrollHandler for WindowedScroller<S> {
    fn axis(&self) -> ScrollDirection {
        WindowedScroller::axis(self)
    }

    fn on_drag_start(&mut self, pointer: Point, time_ms: f64) {
        WindowedScroller::on_drag_start(self, pointer, time_ms)
    }

    fn on_drag_move(&mut self, pointer: Point, time_ms: f64) -> DragOutcome {
        WindowedScroller::on_drag_move(self, pointer, time_ms)
    }

    fn on_drag_stop(&mut self, pointer: Point, time_ms: f64) -> DragOutcome {
        WindowedScroller::on_drag_stop(self, pointer, time_ms)
    }

    fn cancel_drag(&mut self) {
        WindowedScroller::cancel_drag(self)
    }

    fn recycle(&mut self) {
        let _: RecycleOutcome = WindowedScroller::recycle(self);
    }

    fn resize(&mut self, viewport: Size) {
        WindowedScroller::resize(self, viewport)
    }
}

/// Routes one pointer stream through a chain of nested containers.
///
/// `chain` is ordered innermost first. The arbiter remembers which container
/// owns the current drag.
#[derive(Debug, Default)]
pub struct GestureArbiter {
    owner: Option<usize>,
    /// Where the current pointer went down
    origin: Option<(Point, f64)>,
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position in the chain of the container owning the drag
    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    pub fn pointer_down(&mut self, chain: &mut [&mut dyn ScrollHandler], pointer: Point, time_ms: f64) {
        if let Some(inner) = chain.first_mut() {
            inner.on_drag_start(pointer, time_ms);
            self.owner = Some(0);
            self.origin = Some((pointer, time_ms));
        }
    }

    pub fn pointer_move(&mut self, chain: &mut [&mut dyn ScrollHandler], pointer: Point, time_ms: f64) -> DragOutcome {
        let Some(owner) = self.owner else {
            return DragOutcome::Ignored;
        };
        let Some(handler) = chain.get_mut(owner) else {
            self.owner = None;
            return DragOutcome::Ignored;
        };

        let outcome = handler.on_drag_move(pointer, time_ms);
        if outcome != DragOutcome::HandOff {
            return outcome;
        }

        // Nearest ancestor on the axis the pointer is moving along
        let Some((origin, start_ms)) = self.origin else {
            self.owner = None;
            return DragOutcome::Ignored;
        };
        let wanted = ScrollDirection::dominant(pointer - origin);
        let next = chain
            .iter()
            .enumerate()
            .skip(owner + 1)
            .find(|(_, h)| h.axis() == wanted)
            .map(|(i, _)| i);

        match next {
            Some(index) => {
                tracing::debug!(from = owner, to = index, ?wanted, "drag handed off");
                let parent = &mut chain[index];
                parent.on_drag_start(origin, start_ms);
                self.owner = Some(index);
                parent.on_drag_move(pointer, time_ms)
            }
            None => {
                tracing::trace!(?wanted, "no ancestor scrolls along the drag");
                self.owner = None;
                DragOutcome::HandOff
            }
        }
    }

    pub fn pointer_up(&mut self, chain: &mut [&mut dyn ScrollHandler], pointer: Point, time_ms: f64) -> DragOutcome {
        self.origin = None;
        let Some(owner) = self.owner.take() else {
            return DragOutcome::Ignored;
        };
        match chain.get_mut(owner) {
            Some(handler) => handler.on_drag_stop(pointer, time_ms),
            None => DragOutcome::Ignored,
        }
    }
}
