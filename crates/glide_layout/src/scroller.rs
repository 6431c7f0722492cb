//! Windowed scroll container
//!
//! [`WindowedScroller`] shows an arbitrarily large data set through a small
//! ring of slots. Pointer input moves the content directly; releases turn
//! into momentum animations driven by an [`AnimationScheduler`] shared with
//! other containers.
//!
//! # Example
//!
//! ```ignore
//! let clock = ManualClock::shared();
//! let scheduler = Arc::new(Mutex::new(AnimationScheduler::new(clock.clone())));
//! let mut registry = WidgetRegistry::new();
//!
//! let mut list = WindowedScroller::builder((0..1000).collect::<Vec<u32>>())
//!     .viewport(Size::new(320.0, 200.0))
//!     .slot_size(40.0)
//!     .scheduler(&scheduler)
//!     .build(&mut registry)?;
//!
//! list.fling(-200.0, 500.0);
//! while list.pump() {
//!     clock.advance(10.0);
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use glide_animation::momentum::travel_for_velocity;
use glide_animation::{AnimationScheduler, MomentumTracker, TickId, Tween};
use glide_core::{
    ConfigError, Point, ScrollDirection, ScrollEvent, ScrollEventKind, SharedClock, Size,
    StateTransitions, SystemClock, WidgetId, WidgetKind, WidgetRegistry,
};

use crate::config::{ScrollConfig, ScrollOption};
use crate::data_source::DataSource;
use crate::gesture::{scroll_events, DragTracker, ScrollState};
use crate::handler::DragOutcome;
use crate::render::{project, SlotFrame};
use crate::ring::{RecycleOutcome, RingGeometry, SlotRing};
use crate::scrollbar::{thumb_geometry, ScrollIndicator, ScrollbarRenderInfo};

/// Share of pointer travel applied once a drag passes an end
const RUBBER_BAND: f32 = 0.55;

type MeasureFn = Box<dyn Fn() -> f32>;

/// How items are arranged inside a slot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Layout {
    /// One item per slot
    #[default]
    List,
    /// As many items per slot as fit across the viewport
    Grid { cell_cross_extent: f32 },
}

impl Layout {
    /// Items per row for a viewport `cross_extent` wide
    pub fn columns(&self, cross_extent: f32) -> usize {
        match self {
            Layout::List => 1,
            Layout::Grid { cell_cross_extent } => ((cross_extent / cell_cross_extent).floor() as usize).max(1),
        }
    }

    fn cell_cross_extent(&self) -> f32 {
        match self {
            Layout::List => 0.0,
            Layout::Grid { cell_cross_extent } => *cell_cross_extent,
        }
    }

    fn widget_kind(&self, wrap: bool) -> WidgetKind {
        match self {
            Layout::Grid { .. } => WidgetKind::Grid,
            Layout::List if wrap => WidgetKind::Circular,
            Layout::List => WidgetKind::List,
        }
    }
}

fn lock(scheduler: &Mutex<AnimationScheduler>) -> MutexGuard<'_, AnimationScheduler> {
    scheduler.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`WindowedScroller`]
pub struct ScrollerBuilder<S: DataSource> {
    source: S,
    config: ScrollConfig,
    layout: Layout,
    viewport: Size,
    slot_size: Option<f32>,
    measure: Option<MeasureFn>,
    scheduler: Option<Arc<Mutex<AnimationScheduler>>>,
    clock: Option<SharedClock>,
    label: Option<String>,
}

impl<S: DataSource> ScrollerBuilder<S> {
    pub fn config(mut self, config: ScrollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    /// Fixed main-axis size of every slot
    pub fn slot_size(mut self, size: f32) -> Self {
        self.slot_size = Some(size);
        self
    }

    /// Measure the slot size from the host. A zero result is retried later.
    pub fn measure_with<F: Fn() -> f32 + 'static>(mut self, measure: F) -> Self {
        self.measure = Some(Box::new(measure));
        self
    }

    /// Drive animations from a shared scheduler. The container only keeps a
    /// weak reference; without one, animations jump to their end.
    pub fn scheduler(mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) -> Self {
        self.scheduler = Some(Arc::clone(scheduler));
        self
    }

    /// Time source. Defaults to the scheduler's clock.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn build(self, registry: &mut WidgetRegistry) -> Result<WindowedScroller<S>, ConfigError> {
        self.config.validate()?;
        if !self.viewport.is_valid() {
            return Err(ConfigError::OutOfRange {
                name: "viewport",
                value: self.viewport.width.min(self.viewport.height) as f64,
            });
        }
        if let Layout::Grid { cell_cross_extent } = self.layout {
            ConfigError::within("cell_cross_extent", cell_cross_extent as f64, f64::MIN_POSITIVE, f64::MAX)?;
        }
        match (self.slot_size, &self.measure) {
            (Some(size), _) => ConfigError::within("slot_size", size as f64, f64::MIN_POSITIVE, f64::MAX)?,
            (None, None) => return Err(ConfigError::MissingMeasurement),
            (None, Some(_)) => {}
        }

        let clock = match (self.clock, &self.scheduler) {
            (Some(clock), _) => clock,
            (None, Some(scheduler)) => lock(scheduler).clock().clone(),
            (None, None) => SystemClock::shared(),
        };

        let kind = self.layout.widget_kind(self.config.wrap);
        let id = match self.label {
            Some(label) => registry.create_labeled(kind, label),
            None => registry.create(kind),
        };

        let mut scroller = WindowedScroller {
            id,
            tracker: MomentumTracker::new(
                self.config.momentum(self.config.direction.main_extent(self.viewport)),
                clock.clone(),
            ),
            config: self.config,
            layout: self.layout,
            source: self.source,
            ring: SlotRing::new(0, self.slot_size.unwrap_or(0.0)),
            offset: 0.0,
            viewport: self.viewport,
            slot_size: self.slot_size,
            measure: self.measure,
            measure_attempts: 0,
            columns: 1,
            state: ScrollState::Idle,
            drag: None,
            snap: None,
            scheduler: self.scheduler.as_ref().map(Arc::downgrade).unwrap_or_default(),
            clock,
            anim_tick: None,
            measure_tick: None,
            indicator: ScrollIndicator::default(),
            resize_anchor: None,
            events: Vec::new(),
        };
        scroller.refresh();

        tracing::debug!(?id, ?kind, slots = scroller.ring.len(), "scroller built");
        Ok(scroller)
    }
}

// ============================================================================
// Scroller
// ============================================================================

/// Virtualized scroll container over a [`DataSource`]
pub struct WindowedScroller<S: DataSource> {
    id: WidgetId,
    config: ScrollConfig,
    layout: Layout,
    source: S,
    ring: SlotRing<S::Item>,
    /// Main-axis offset; 0 at the start, negative further in
    offset: f32,
    viewport: Size,
    slot_size: Option<f32>,
    measure: Option<MeasureFn>,
    measure_attempts: u32,
    columns: usize,
    state: ScrollState,
    drag: Option<DragTracker>,
    tracker: MomentumTracker,
    snap: Option<Tween>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    clock: SharedClock,
    /// At most one pending animation tick
    anim_tick: Option<TickId>,
    measure_tick: Option<TickId>,
    indicator: ScrollIndicator,
    /// Item kept centered across consecutive column-changing resizes
    resize_anchor: Option<usize>,
    events: Vec<ScrollEvent>,
}

impl<S: DataSource> WindowedScroller<S> {
    pub fn builder(source: S) -> ScrollerBuilder<S> {
        ScrollerBuilder {
            source,
            config: ScrollConfig::default(),
            layout: Layout::default(),
            viewport: Size::default(),
            slot_size: None,
            measure: None,
            scheduler: None,
            clock: None,
            label: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the data. Call [`refresh`](Self::refresh) after
    /// changing the item count.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn ring(&self) -> &SlotRing<S::Item> {
        &self.ring
    }

    pub fn tracker(&self) -> &MomentumTracker {
        &self.tracker
    }

    pub fn is_momentum_done(&self) -> bool {
        self.tracker.is_done()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Measured slot size, `None` until a measurement succeeds
    pub fn slot_size(&self) -> Option<f32> {
        self.slot_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Pending animation tick, if any
    pub fn pending_tick(&self) -> Option<TickId> {
        self.anim_tick
    }

    pub fn axis(&self) -> ScrollDirection {
        self.config.direction
    }

    pub fn geometry(&self) -> RingGeometry {
        RingGeometry {
            item_count: self.source.count(),
            columns: self.columns,
            wrap: self.config.wrap,
        }
    }

    /// Rows needed to cover the viewport
    pub fn visible_count(&self) -> usize {
        match self.slot_size {
            Some(size) => ((self.viewport_extent() / size).ceil() as usize).max(1),
            None => 0,
        }
    }

    pub fn content_extent(&self) -> f32 {
        self.geometry().rows() as f32 * self.slot_size.unwrap_or(0.0)
    }

    /// Offset range `(min, max)` for a non-wrapping container
    pub fn bounds(&self) -> (f32, f32) {
        (-(self.content_extent() - self.viewport_extent()).max(0.0), 0.0)
    }

    /// Current scroll position as a point on the scroll axis
    pub fn scroll_position(&self) -> Point {
        self.axis().point(self.offset, 0.0)
    }

    /// First data index in view
    pub fn first_visible_index(&self) -> Option<usize> {
        let size = self.slot_size?;
        let geometry = self.geometry();
        let logical = (-self.offset / size).floor() as i64;
        let row = if geometry.wrap {
            geometry.resolve(logical, 0)?
        } else {
            logical.clamp(0, geometry.rows().checked_sub(1)? as i64) as usize
        };
        Some(row * self.columns)
    }

    /// Data index under a viewport-relative point
    pub fn index_at(&self, point: Point) -> Option<usize> {
        let size = self.slot_size?;
        let axis = self.axis();
        let main = axis.main(point);
        let cross = axis.cross(point);
        if !(0.0..=self.viewport_extent()).contains(&main)
            || !(0.0..=axis.cross_extent(self.viewport)).contains(&cross)
        {
            return None;
        }

        let geometry = self.geometry();
        let row = geometry.resolve(((main - self.offset) / size).floor() as i64, 0)?;
        let column = match self.layout {
            Layout::List => 0,
            Layout::Grid { cell_cross_extent } => (cross / cell_cross_extent).floor() as usize,
        };
        if column >= self.columns {
            return None;
        }

        let index = row * self.columns + column;
        (index < geometry.item_count).then_some(index)
    }

    /// Frames for the host to draw
    pub fn frames(&self) -> Vec<SlotFrame> {
        project(&self.ring, self.offset, self.axis(), self.layout.cell_cross_extent())
    }

    pub fn scrollbar_info(&self) -> ScrollbarRenderInfo {
        let viewport = self.viewport_extent();
        let content = self.content_extent();
        let (thumb_length, thumb_offset) = thumb_geometry(&self.config.scrollbar, viewport, content, self.offset);
        ScrollbarRenderInfo {
            visible: self.indicator.is_visible(&self.config.scrollbar, content > viewport),
            thumb_length,
            thumb_offset,
        }
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<ScrollEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn on_drag_start(&mut self, pointer: Point, time_ms: f64) {
        // Cancel before anything else so no stale tick lands mid-drag
        self.cancel_animation_tick();
        self.tracker.reset();
        self.snap = None;
        self.end_motion();

        self.drag = Some(DragTracker::new(pointer, time_ms, self.offset));
        self.transition(scroll_events::DRAG_START);
    }

    pub fn on_drag_move(&mut self, pointer: Point, time_ms: f64) -> DragOutcome {
        let axis = self.axis();
        let threshold = self.config.move_threshold;
        let Some(drag) = self.drag.as_mut() else {
            tracing::trace!("pointer move without a drag ignored");
            return DragOutcome::Ignored;
        };

        let raw = drag.record(pointer, time_ms, axis);
        let starting = !drag.has_moved();
        if starting {
            if !drag.beyond_threshold(pointer, threshold) {
                return DragOutcome::Handled;
            }
            if ScrollDirection::dominant(drag.delta(pointer)) != axis {
                self.cancel_drag();
                return DragOutcome::HandOff;
            }
            drag.mark_moved();
        }

        if starting {
            self.resize_anchor = None;
            self.begin_motion();
        }
        let offset = self.constrain_drag(raw);
        self.set_offset(offset);
        DragOutcome::Handled
    }

    pub fn on_drag_stop(&mut self, pointer: Point, time_ms: f64) -> DragOutcome {
        // Taken first: moves arriving after the release are ignored
        let Some(drag) = self.drag.take() else {
            return DragOutcome::Ignored;
        };

        if !drag.has_moved() {
            self.transition(scroll_events::DRAG_END);
            if let Some(index) = self.index_at(pointer) {
                tracing::debug!(id = ?self.id, index, "select");
                self.emit(ScrollEventKind::Select { index });
            }
            return DragOutcome::Handled;
        }

        let velocity = drag.release_velocity(time_ms, self.config.move_interval_threshold_ms);
        if velocity != 0.0 {
            let duration = self.config.scroll_duration_ms;
            self.fling(travel_for_velocity(self.config.easing, velocity, duration), duration);
        } else {
            self.transition(scroll_events::DRAG_END);
            self.come_to_rest();
        }
        DragOutcome::Handled
    }

    /// Abandon the current drag without flicking
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            self.transition(scroll_events::CANCEL);
            self.come_to_rest();
        }
    }

    // ------------------------------------------------------------------
    // Programmatic scrolling
    // ------------------------------------------------------------------

    /// Start a momentum scroll that travels `velocity` over `duration_ms`
    pub fn fling(&mut self, velocity: f32, duration_ms: f64) {
        self.cancel_animation_tick();
        self.drag = None;
        self.snap = None;
        self.resize_anchor = None;

        let bounds = (!self.config.wrap).then(|| self.bounds());
        self.tracker.set_config(self.config.momentum(self.viewport_extent()));
        self.tracker.start(self.offset, velocity, duration_ms, bounds);
        if self.tracker.is_done() {
            self.transition(scroll_events::CANCEL);
            self.come_to_rest();
            return;
        }

        self.transition(scroll_events::FLICK);
        self.begin_motion();
        self.schedule_tick();
    }

    /// Scroll to `offset`, immediately or over `duration_ms`
    pub fn scroll_to(&mut self, offset: f32, duration_ms: Option<f64>) {
        if !offset.is_finite() {
            tracing::debug!(offset, "non-finite scroll target ignored");
            return;
        }
        self.resize_anchor = None;
        let target = self.constrain(offset);
        self.animate_to(target, duration_ms.unwrap_or(0.0));
    }

    /// Center the first item matching `predicate`. Returns its index.
    pub fn center_to<F>(&mut self, predicate: F, duration_ms: Option<f64>) -> Option<usize>
    where
        F: Fn(usize, &S::Item) -> bool,
    {
        let index = (0..self.source.count())
            .find(|&i| self.source.item_at(i).is_some_and(|item| predicate(i, &item)))?;
        self.center_to_index(index, duration_ms).then_some(index)
    }

    /// Center the row holding `index`. Returns false if it does not exist.
    pub fn center_to_index(&mut self, index: usize, duration_ms: Option<f64>) -> bool {
        let Some(size) = self.slot_size else {
            return false;
        };
        if index >= self.source.count() {
            return false;
        }
        let row = index / self.columns;
        self.scroll_to(self.centered_offset(row, size), duration_ms);
        true
    }

    /// Bring slot contents in line with the current offset
    pub fn recycle(&mut self) -> RecycleOutcome {
        if self.slot_size.is_none() {
            return RecycleOutcome::default();
        }
        let geometry = self.geometry();
        if self.ring.geometry().is_some_and(|bound| bound.item_count != geometry.item_count) {
            let clamped = self.constrain(self.offset);
            if clamped != self.offset {
                tracing::debug!(id = ?self.id, count = geometry.item_count, offset = clamped, "item count changed, offset clamped");
                self.offset = clamped;
                self.emit(ScrollEventKind::Update { offset: clamped });
            }
        }
        self.ring.recycle(self.offset, geometry, &self.source)
    }

    // ------------------------------------------------------------------
    // Timer
    // ------------------------------------------------------------------

    /// Run this container's due ticks. Returns true while work is pending.
    pub fn pump(&mut self) -> bool {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return self.state.is_animating();
        };

        let (anim_due, measure_due) = {
            let mut scheduler = lock(&scheduler);
            let anim_due = self.anim_tick.is_some_and(|id| scheduler.take_if_due(id));
            let measure_due = self.measure_tick.is_some_and(|id| scheduler.take_if_due(id));
            (anim_due, measure_due)
        };

        if measure_due {
            self.measure_tick = None;
            self.remeasure();
        }
        if anim_due {
            self.anim_tick = None;
            self.on_animation_tick();
        }

        self.state.is_animating() || self.measure_tick.is_some()
    }

    fn on_animation_tick(&mut self) {
        match self.state {
            ScrollState::Inertial => {
                let position = self.tracker.update();
                self.set_offset(position);
                if self.tracker.is_done() {
                    self.settle();
                } else {
                    self.schedule_tick();
                }
            }
            ScrollState::Snapping => {
                let Some(tween) = self.snap else {
                    self.settle();
                    return;
                };
                let (value, finished) = tween.sample(self.clock.now_ms());
                self.set_offset(value);
                if finished {
                    self.settle();
                } else {
                    self.schedule_tick();
                }
            }
            state => tracing::debug!(?state, "stale animation tick ignored"),
        }
    }

    fn schedule_tick(&mut self) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            // Nothing will drive the animation
            self.finish_animation();
            return;
        };

        let mut scheduler = lock(&scheduler);
        if let Some(stale) = self.anim_tick.take() {
            scheduler.cancel(stale);
        }
        self.anim_tick = Some(scheduler.schedule_after(self.config.timer_interval_ms));
    }

    fn cancel_animation_tick(&mut self) {
        if let Some(id) = self.anim_tick.take() {
            if let Some(scheduler) = self.scheduler.upgrade() {
                lock(&scheduler).cancel(id);
            }
        }
    }

    fn cancel_measure_retry(&mut self) {
        if let Some(id) = self.measure_tick.take() {
            if let Some(scheduler) = self.scheduler.upgrade() {
                lock(&scheduler).cancel(id);
            }
        }
    }

    fn finish_animation(&mut self) {
        let target = match self.state {
            ScrollState::Inertial => self.tracker.finish(),
            ScrollState::Snapping => self.snap.map_or(self.offset, |tween| tween.to()),
            _ => return,
        };
        self.set_offset(target);
        self.settle();
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Re-measure the slot size and rebuild the window
    pub fn refresh(&mut self) {
        self.measure_attempts = 0;
        self.cancel_measure_retry();
        self.remeasure();
    }

    /// New viewport size. Keeps the centered item in view.
    pub fn resize(&mut self, viewport: Size) {
        if !viewport.is_valid() {
            tracing::debug!(?viewport, "invalid viewport ignored");
            return;
        }
        self.stop_motion();

        let Some(size) = self.slot_size else {
            self.viewport = viewport;
            return;
        };

        let axis = self.axis();
        let old_extent = self.viewport_extent();
        let old_columns = self.columns;
        let new_columns = self.layout.columns(axis.cross_extent(viewport));
        self.viewport = viewport;

        let offset = if new_columns == old_columns {
            // Same rows: keep the content point under the center fixed
            self.offset + (self.viewport_extent() - old_extent) / 2.0
        } else {
            let anchor = match self.resize_anchor {
                Some(anchor) => anchor,
                None => self.center_row(old_extent) * old_columns,
            };
            self.resize_anchor = Some(anchor);
            self.columns = new_columns;
            self.ring.invalidate();

            let rows = self.geometry().rows();
            let row = (anchor as f64 / new_columns as f64).round() as usize;
            self.centered_offset(row.min(rows.saturating_sub(1)), size)
        };

        let geometry = self.geometry();
        self.ring.resize(self.visible_count() + 2, geometry, &self.source);
        self.offset = self.constrain(offset);
        self.recycle();

        tracing::debug!(id = ?self.id, ?viewport, columns = self.columns, offset = self.offset, "resized");
        self.emit(ScrollEventKind::Update { offset: self.offset });
    }

    /// Change one setting at runtime
    pub fn apply_option(&mut self, option: ScrollOption) -> Result<(), ConfigError> {
        self.config.apply(option)?;
        self.tracker.set_config(self.config.momentum(self.viewport_extent()));
        if option.resets_window() {
            self.stop_motion();
            self.offset = 0.0;
            self.resize_anchor = None;
            self.rebuild();
        }
        Ok(())
    }

    /// Unregister from `registry` and release scheduled work
    pub fn destroy(self, registry: &mut WidgetRegistry) {
        registry.destroy(self.id);
    }

    fn remeasure(&mut self) {
        if let Some(measure) = &self.measure {
            let size = measure();
            if size.is_finite() && size > 0.0 {
                self.slot_size = Some(size);
                self.measure_attempts = 0;
            } else {
                self.schedule_measure_retry();
            }
        }
        self.rebuild();
    }

    fn schedule_measure_retry(&mut self) {
        if self.measure_tick.is_some() {
            return;
        }
        if self.measure_attempts >= self.config.measure_max_retries {
            tracing::warn!(id = ?self.id, attempts = self.measure_attempts, "slot still measures zero, giving up until next refresh");
            return;
        }
        let Some(scheduler) = self.scheduler.upgrade() else {
            tracing::warn!(id = ?self.id, "slot measures zero and no scheduler to retry on");
            return;
        };
        self.measure_attempts += 1;
        self.measure_tick = Some(lock(&scheduler).schedule_after(self.config.measure_retry_interval_ms));
    }

    fn rebuild(&mut self) {
        let Some(size) = self.slot_size else {
            return;
        };
        self.columns = self.layout.columns(self.axis().cross_extent(self.viewport));
        self.ring.set_slot_size(size);

        let geometry = self.geometry();
        self.ring.resize(self.visible_count() + 2, geometry, &self.source);
        self.offset = self.constrain(self.offset);
        self.recycle();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn viewport_extent(&self) -> f32 {
        self.axis().main_extent(self.viewport)
    }

    fn center_row(&self, viewport_extent: f32) -> usize {
        let Some(size) = self.slot_size else {
            return 0;
        };
        let geometry = self.geometry();
        let logical = ((-self.offset + viewport_extent / 2.0) / size).floor() as i64;
        if geometry.wrap {
            geometry.resolve(logical, 0).unwrap_or(0)
        } else {
            logical.clamp(0, geometry.rows().saturating_sub(1) as i64) as usize
        }
    }

    fn centered_offset(&self, row: usize, size: f32) -> f32 {
        -(row as f32 * size - (self.viewport_extent() - size) / 2.0)
    }

    /// Clamp a programmatic offset into range
    fn constrain(&self, offset: f32) -> f32 {
        if self.config.wrap {
            return offset;
        }
        let (min, max) = self.bounds();
        offset.clamp(min, max)
    }

    /// Offset for a drag, with rubber-banding past the ends
    fn constrain_drag(&self, raw: f32) -> f32 {
        if self.config.wrap {
            return raw;
        }
        let (min, max) = self.bounds();
        if !self.config.overshoot_enabled {
            return raw.clamp(min, max);
        }

        let limit = self.viewport_extent() * self.config.max_overscroll;
        if raw > max {
            max + ((raw - max) * RUBBER_BAND).min(limit)
        } else if raw < min {
            min - ((min - raw) * RUBBER_BAND).min(limit)
        } else {
            raw
        }
    }

    fn out_of_bounds(&self) -> Option<f32> {
        if self.config.wrap {
            return None;
        }
        let (min, max) = self.bounds();
        (self.offset < min || self.offset > max).then(|| self.offset.clamp(min, max))
    }

    fn animate_to(&mut self, target: f32, duration_ms: f64) {
        self.cancel_animation_tick();
        self.tracker.reset();
        self.drag = None;
        self.snap = None;

        if duration_ms.is_nan() || duration_ms <= 0.0 || target == self.offset {
            if target != self.offset {
                self.begin_motion();
                self.set_offset(target);
            }
            self.transition(scroll_events::CANCEL);
            self.end_motion();
            return;
        }

        self.snap = Some(Tween::new(self.offset, target, self.clock.now_ms(), duration_ms, self.config.easing));
        self.transition(scroll_events::SNAP);
        self.begin_motion();
        self.schedule_tick();
    }

    /// Nothing is driving the content any more
    fn come_to_rest(&mut self) {
        match self.out_of_bounds() {
            Some(bound) => self.animate_to(bound, self.config.snapback_duration_ms),
            None => self.end_motion(),
        }
    }

    fn stop_motion(&mut self) {
        self.cancel_animation_tick();
        self.tracker.reset();
        self.snap = None;
        self.drag = None;
        self.transition(scroll_events::CANCEL);
        self.end_motion();
    }

    fn settle(&mut self) {
        self.cancel_animation_tick();
        self.snap = None;
        self.transition(scroll_events::SETTLED);
        self.normalize_wrap();
        self.end_motion();
    }

    /// Fold a wrapping offset back into one lap of the data set
    fn normalize_wrap(&mut self) {
        if !self.config.wrap {
            return;
        }
        let Some(size) = self.slot_size else {
            return;
        };
        let rows = self.geometry().rows() as i64;
        if rows == 0 {
            return;
        }

        let lap = rows as f32 * size;
        let laps = (-self.offset / lap).floor() as i64;
        if laps != 0 {
            self.offset += laps as f32 * lap;
            self.ring.renumber(-laps * rows);
            self.recycle();
            tracing::trace!(laps, offset = self.offset, "wrap normalized");
        }
    }

    fn set_offset(&mut self, offset: f32) {
        if offset == self.offset {
            return;
        }
        self.offset = offset;
        self.recycle();
        self.emit(ScrollEventKind::Update { offset });
    }

    fn begin_motion(&mut self) {
        if !self.indicator.is_scrolling() {
            self.indicator.on_scroll_start();
            self.emit(ScrollEventKind::Start { offset: self.offset });
        }
    }

    fn end_motion(&mut self) {
        if self.indicator.is_scrolling() {
            self.indicator.on_scroll_stop();
            self.emit(ScrollEventKind::Stop { offset: self.offset });
        }
    }

    fn transition(&mut self, event: u32) {
        if let Some(next) = self.state.on_event(event) {
            if next != self.state {
                tracing::debug!(id = ?self.id, from = ?self.state, to = ?next, "scroll state");
            }
            self.state = next;
        }
    }

    fn emit(&mut self, kind: ScrollEventKind) {
        self.events.push(ScrollEvent { widget: self.id, kind });
    }
}

impl<S: DataSource> Drop for WindowedScroller<S> {
    fn drop(&mut self) {
        self.cancel_animation_tick();
        self.cancel_measure_retry();
    }
}

impl<S: DataSource> std::fmt::Debug for WindowedScroller<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedScroller")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("slot_size", &self.slot_size)
            .field("columns", &self.columns)
            .field("slots", &self.ring.len())
            .finish()
    }
}
