//! Integration tests for windowed scrolling
//!
//! These tests drive complete containers through a manual clock and a shared
//! scheduler, the same way a host frame loop would:
//! - Programmatic scrolls and flings keep the slot window in step
//! - Drags interrupt animations without leaving stale ticks behind
//! - Circular lists, grids and nested containers behave at their edges

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use glide_animation::AnimationScheduler;
use glide_core::{Clock, ConfigError, ManualClock, Point, ScrollDirection, ScrollEventKind, Size, WidgetRegistry};
use glide_layout::{
    DataSource, DragOutcome, FnDataSource, GestureArbiter, Layout, ScrollConfig, ScrollHandler, ScrollOption, ScrollState, WindowedScroller,
};

struct Harness {
    clock: Arc<ManualClock>,
    scheduler: Arc<Mutex<AnimationScheduler>>,
    registry: WidgetRegistry,
}

impl Harness {
    fn new() -> Self {
        let clock = ManualClock::shared();
        let scheduler = Arc::new(Mutex::new(AnimationScheduler::new(clock.clone())));
        Self {
            clock,
            scheduler,
            registry: WidgetRegistry::new(),
        }
    }

    fn list(&mut self, count: u32, config: ScrollConfig) -> WindowedScroller<Vec<u32>> {
        WindowedScroller::builder((0..count).collect::<Vec<u32>>())
            .config(config)
            .viewport(Size::new(320.0, 200.0))
            .slot_size(40.0)
            .scheduler(&self.scheduler)
            .build(&mut self.registry)
            .unwrap()
    }

    /// Pump in 10ms steps until nothing is pending
    fn run<S: DataSource>(&self, scroller: &mut WindowedScroller<S>) -> usize {
        let mut frames = 0;
        while scroller.pump() {
            self.clock.advance(10.0);
            frames += 1;
            assert!(frames < 10_000, "animation never settled");
        }
        frames
    }

    fn active_ticks(&self) -> usize {
        self.scheduler.lock().unwrap().active_count()
    }
}

/// Test that a scroll then a fling keep the ring aligned with the offset
#[test]
fn test_scroll_then_fling_keeps_window_in_step() {
    let mut h = Harness::new();
    let mut list = h.list(1000, ScrollConfig::default());
    assert_eq!(list.ring().len(), 7);

    list.scroll_to(-400.0, None);
    assert_eq!(list.first_visible_index(), Some(10));
    assert_eq!(list.ring().indices(), (9..16).collect::<Vec<_>>());

    list.fling(-200.0, 500.0);
    assert_eq!(list.state(), ScrollState::Inertial);
    h.run(&mut list);

    let y = list.scroll_position().y;
    assert!(y <= -400.0);
    assert_eq!(y, -600.0);
    assert!(list.is_momentum_done());
    assert_eq!(list.state(), ScrollState::Idle);
    assert_eq!(list.first_visible_index(), Some(15));
    assert!(list.ring().is_consistent(list.geometry()));
    assert_eq!(list.ring().indices(), (14..21).collect::<Vec<_>>());
}

/// Test that a drag during momentum cancels the pending tick
#[test]
fn test_drag_during_momentum_leaves_one_tick() {
    let mut h = Harness::new();
    let mut list = h.list(1000, ScrollConfig::default());

    list.fling(-2000.0, 2000.0);
    for _ in 0..5 {
        h.clock.advance(10.0);
        list.pump();
    }
    assert_eq!(h.active_ticks(), 1);

    let t = h.clock.now_ms();
    list.on_drag_start(Point::new(100.0, 100.0), t);
    assert_eq!(list.state(), ScrollState::Dragging);
    assert_eq!(h.active_ticks(), 0);

    // The cancelled tick never lands
    let frozen = list.offset();
    h.clock.advance(100.0);
    list.pump();
    assert_eq!(list.offset(), frozen);

    let t = h.clock.now_ms();
    assert_eq!(list.on_drag_move(Point::new(100.0, 60.0), t + 10.0), DragOutcome::Handled);
    assert_eq!(list.on_drag_move(Point::new(100.0, 20.0), t + 20.0), DragOutcome::Handled);
    assert_eq!(list.offset(), frozen - 80.0);

    assert_eq!(list.on_drag_stop(Point::new(100.0, 20.0), t + 25.0), DragOutcome::Handled);
    assert_eq!(list.state(), ScrollState::Inertial);

    assert_eq!(h.active_ticks(), 1);
    assert_eq!(h.scheduler.lock().unwrap().stats().outstanding(), 1);
}

/// Test that a fling past the end stops at the boundary
#[test]
fn test_fling_stops_at_end() {
    let mut h = Harness::new();
    let mut list = h.list(20, ScrollConfig::default());
    assert_eq!(list.bounds(), (-600.0, 0.0));

    list.fling(-5000.0, 500.0);
    h.run(&mut list);

    assert_eq!(list.offset(), -600.0);
    assert_eq!(list.first_visible_index(), Some(15));
    assert!(list.ring().is_consistent(list.geometry()));
    assert_eq!(
        list.ring().rows(),
        vec![Some(14), Some(15), Some(16), Some(17), Some(18), Some(19), None]
    );

    // Flinging towards the start from the start does nothing
    list.scroll_to(0.0, None);
    list.take_events();
    list.fling(500.0, 500.0);
    h.run(&mut list);
    assert_eq!(list.offset(), 0.0);
}

/// Test that recycling twice at the same offset rebinds nothing
#[test]
fn test_recycle_is_idempotent() {
    let mut h = Harness::new();
    let mut list = h.list(1000, ScrollConfig::default());
    list.scroll_to(-410.0, None);

    let rebinds = list.ring().rebinds();
    let outcome = list.recycle();
    assert_eq!(outcome.rebound, 0);
    assert_eq!(outcome.shift, 0);
    assert_eq!(list.ring().rebinds(), rebinds);
}

/// Test that a circular list folds its offset back after settling
#[test]
fn test_circular_list_wraps() {
    let mut h = Harness::new();
    let mut list = h.list(10, ScrollConfig::circular());

    list.fling(-1000.0, 500.0);
    h.run(&mut list);

    // 1000px is two and a half laps of 400px
    assert_eq!(list.offset(), -200.0);
    assert_eq!(list.first_visible_index(), Some(5));
    assert_eq!(
        list.ring().rows(),
        vec![Some(4), Some(5), Some(6), Some(7), Some(8), Some(9), Some(0)]
    );
    assert!(list.ring().is_consistent(list.geometry()));

    // Before the first item wraps to the last ones
    list.scroll_to(120.0, None);
    assert_eq!(list.first_visible_index(), Some(7));
}

/// Test that a grid keeps the same item centered across column changes
#[test]
fn test_grid_resize_keeps_anchor() {
    let mut h = Harness::new();
    let mut grid = WindowedScroller::builder((0..100).collect::<Vec<u32>>())
        .layout(Layout::Grid { cell_cross_extent: 100.0 })
        .viewport(Size::new(300.0, 200.0))
        .slot_size(50.0)
        .scheduler(&h.scheduler)
        .build(&mut h.registry)
        .unwrap();
    assert_eq!(grid.columns(), 3);

    grid.scroll_to(-1000.0, None);
    assert_eq!(grid.index_at(Point::new(10.0, 100.0)), Some(66));

    grid.resize(Size::new(500.0, 200.0));
    assert_eq!(grid.columns(), 5);
    assert_eq!(grid.offset(), -575.0);
    assert!(grid.ring().is_consistent(grid.geometry()));

    // Back to three columns: the remembered item returns, not a drifted one
    grid.resize(Size::new(300.0, 200.0));
    assert_eq!(grid.columns(), 3);
    assert_eq!(grid.offset(), -1025.0);
    assert_eq!(grid.index_at(Point::new(10.0, 100.0)), Some(66));
}

/// Test that invalid settings are rejected and leave the container as it was
#[test]
fn test_invalid_config_rejected() {
    let mut h = Harness::new();

    let config = ScrollConfig {
        scroll_duration_ms: 0.0,
        ..Default::default()
    };
    let result = WindowedScroller::builder(vec![1, 2, 3])
        .config(config)
        .viewport(Size::new(100.0, 100.0))
        .slot_size(20.0)
        .build(&mut h.registry);
    assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));

    let result = WindowedScroller::builder(vec![1, 2, 3])
        .viewport(Size::new(100.0, 100.0))
        .build(&mut h.registry);
    assert!(matches!(result, Err(ConfigError::MissingMeasurement)));
    assert!(h.registry.is_empty());

    let mut list = h.list(100, ScrollConfig::default());
    let err = list.apply_option(ScrollOption::MaxOverscroll(2.0));
    assert!(matches!(err, Err(ConfigError::OutOfRange { .. })));
    assert_eq!(list.config().max_overscroll, 0.3);
}

/// Test that switching to circular mode rebuilds the window
#[test]
fn test_wrap_option_resets_window() {
    let mut h = Harness::new();
    let mut list = h.list(10, ScrollConfig::default());
    list.scroll_to(-120.0, None);

    list.apply_option(ScrollOption::Wrap(true)).unwrap();
    assert_eq!(list.offset(), 0.0);
    assert_eq!(list.ring().rows()[0], Some(9));
}

/// Test that a vertical drag starting on a horizontal child moves the parent
#[test]
fn test_cross_axis_drag_hands_off_to_parent() {
    let mut h = Harness::new();
    let mut outer = h.list(100, ScrollConfig::default());
    let mut inner = WindowedScroller::builder((0..50).collect::<Vec<u32>>())
        .config(ScrollConfig {
            direction: ScrollDirection::Horizontal,
            ..Default::default()
        })
        .viewport(Size::new(300.0, 40.0))
        .slot_size(60.0)
        .scheduler(&h.scheduler)
        .build(&mut h.registry)
        .unwrap();

    let mut arbiter = GestureArbiter::new();
    {
        let mut chain: [&mut dyn ScrollHandler; 2] = [&mut inner, &mut outer];
        arbiter.pointer_down(&mut chain, Point::new(100.0, 100.0), 0.0);
        assert_eq!(arbiter.owner(), Some(0));

        // Under the threshold nothing is decided yet
        assert_eq!(arbiter.pointer_move(&mut chain, Point::new(102.0, 95.0), 5.0), DragOutcome::Handled);
        assert_eq!(arbiter.owner(), Some(0));

        assert_eq!(arbiter.pointer_move(&mut chain, Point::new(102.0, 70.0), 10.0), DragOutcome::Handled);
        assert_eq!(arbiter.owner(), Some(1));
    }

    assert_eq!(inner.offset(), 0.0);
    assert_eq!(inner.state(), ScrollState::Idle);
    assert_eq!(outer.state(), ScrollState::Dragging);
    assert_eq!(outer.offset(), -30.0);
}

/// Test that a tap selects the item under the pointer
#[test]
fn test_tap_selects_item() {
    let mut h = Harness::new();
    let mut list = h.list(100, ScrollConfig::default());
    list.scroll_to(-400.0, None);
    list.take_events();

    list.on_drag_start(Point::new(50.0, 90.0), 0.0);
    list.on_drag_stop(Point::new(52.0, 92.0), 80.0);

    let events = list.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, ScrollEventKind::Select { index: 12 });
    assert_eq!(list.offset(), -400.0);
}

/// Test that dragging past the start rubber-bands and snaps back
#[test]
fn test_overscroll_snaps_back() {
    let mut h = Harness::new();
    let mut list = h.list(100, ScrollConfig::with_overshoot());

    list.on_drag_start(Point::new(10.0, 50.0), 0.0);
    list.on_drag_move(Point::new(10.0, 150.0), 16.0);
    assert_eq!(list.offset(), 55.0);

    // Capped at 30% of the viewport
    list.on_drag_move(Point::new(10.0, 250.0), 32.0);
    assert!((list.offset() - 60.0).abs() < 1e-3);

    // Released long after the last move: no flick, just the snap back
    list.on_drag_stop(Point::new(10.0, 250.0), 400.0);
    assert_eq!(list.state(), ScrollState::Snapping);
    h.run(&mut list);

    assert_eq!(list.offset(), 0.0);
    assert_eq!(list.state(), ScrollState::Idle);

    let kinds: Vec<_> = list.take_events().into_iter().map(|e| e.kind).collect();
    assert!(matches!(kinds.first(), Some(ScrollEventKind::Start { .. })));
    assert_eq!(kinds.last(), Some(&ScrollEventKind::Stop { offset: 0.0 }));
}

/// Test that a zero slot measurement is retried on the scheduler
#[test]
fn test_zero_measurement_is_retried() {
    let mut h = Harness::new();
    let size = Rc::new(Cell::new(0.0f32));
    let measured = size.clone();

    let mut list = WindowedScroller::builder((0..100).collect::<Vec<u32>>())
        .viewport(Size::new(320.0, 200.0))
        .measure_with(move || measured.get())
        .scheduler(&h.scheduler)
        .build(&mut h.registry)
        .unwrap();
    assert_eq!(list.slot_size(), None);
    assert!(list.ring().is_empty());
    assert_eq!(h.active_ticks(), 1);

    size.set(40.0);
    h.clock.advance(100.0);
    assert!(!list.pump());

    assert_eq!(list.slot_size(), Some(40.0));
    assert_eq!(list.ring().len(), 7);
    assert_eq!(list.first_visible_index(), Some(0));
}

/// Test that dropping a container cancels its pending work
#[test]
fn test_drop_cancels_ticks() {
    let mut h = Harness::new();
    let mut list = h.list(1000, ScrollConfig::default());
    let id = list.id();

    list.fling(-500.0, 500.0);
    assert_eq!(h.active_ticks(), 1);

    list.destroy(&mut h.registry);
    assert_eq!(h.active_ticks(), 0);
    assert!(!h.registry.contains(id));
}

/// Test that a container without a scheduler jumps to the end of animations
#[test]
fn test_without_scheduler_animations_complete_at_once() {
    let mut registry = WidgetRegistry::new();
    let mut list = WindowedScroller::builder((0..1000).collect::<Vec<u32>>())
        .viewport(Size::new(320.0, 200.0))
        .slot_size(40.0)
        .build(&mut registry)
        .unwrap();

    list.fling(-200.0, 500.0);
    assert_eq!(list.offset(), -200.0);
    assert_eq!(list.state(), ScrollState::Idle);

    list.scroll_to(-1000.0, Some(300.0));
    assert_eq!(list.offset(), -1000.0);
    assert!(!list.pump());
}

/// Test that centering finds an item by content
#[test]
fn test_center_to_item() {
    let mut h = Harness::new();
    let mut list = h.list(1000, ScrollConfig::default());

    let index = list.center_to(|_, item| *item == 500, Some(250.0));
    assert_eq!(index, Some(500));
    assert_eq!(list.state(), ScrollState::Snapping);
    h.run(&mut list);

    // Row 500 sits 80px below the top of a 200px viewport
    assert_eq!(list.offset(), -19_920.0);
    assert_eq!(list.index_at(Point::new(10.0, 100.0)), Some(500));
    assert_eq!(list.center_to(|_, item| *item == 5000, None), None);
}

/// Test that a shrinking data set clears slots past the new end
#[test]
fn test_shrinking_count_clears_stale_slots() {
    let mut h = Harness::new();
    let count = Rc::new(Cell::new(1000usize));
    let current = count.clone();
    let source = FnDataSource::builder()
        .item_at(|i| Some(i as u32))
        .count_with(move || current.get())
        .build()
        .unwrap();
    let mut list = WindowedScroller::builder(source)
        .viewport(Size::new(320.0, 200.0))
        .slot_size(40.0)
        .scheduler(&h.scheduler)
        .build(&mut h.registry)
        .unwrap();

    list.scroll_to(-400.0, None);
    count.set(12);
    list.scroll_to(-440.0, None);

    assert_eq!(list.offset(), -280.0);
    assert_eq!(list.ring().indices(), (6..12).collect::<Vec<_>>());
    assert!(list.ring().is_consistent(list.geometry()));
    assert!(list
        .ring()
        .slots()
        .flat_map(|s| s.cells())
        .all(|c| c.index < 12 && c.item == Some(c.index as u32)));

    // A plain recycle after a shrink pulls the offset back in range
    count.set(1000);
    list.scroll_to(-400.0, None);
    list.take_events();
    count.set(8);
    list.recycle();

    assert_eq!(list.offset(), -120.0);
    assert_eq!(list.ring().indices(), (2..8).collect::<Vec<_>>());
    assert!(list.ring().is_consistent(list.geometry()));
    assert_eq!(
        list.take_events().last().map(|e| e.kind),
        Some(ScrollEventKind::Update { offset: -120.0 })
    );
}

/// Test that a hard fling overshoots the end by at most the configured share of the viewport
#[test]
fn test_fling_overshoot_is_bounded() {
    let mut h = Harness::new();
    let mut list = h.list(20, ScrollConfig::with_overshoot());

    list.fling(-5000.0, 500.0);
    let mut furthest = 0.0f32;
    let mut frames = 0;
    while list.pump() {
        h.clock.advance(10.0);
        furthest = furthest.min(list.offset());
        frames += 1;
        assert!(frames < 10_000, "animation never settled");
    }

    assert!(furthest < -600.0);
    assert!(furthest >= -660.01, "overshot to {furthest}");
    assert_eq!(list.offset(), -600.0);
    assert!(list.ring().is_consistent(list.geometry()));
}
