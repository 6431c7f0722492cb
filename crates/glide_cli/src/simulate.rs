//! Headless scroll sessions
//!
//! Builds a scroller from a [`SimulationConfig`], plays its script and
//! reports every frame.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use glide_animation::AnimationScheduler;
use glide_core::events::event_types;
use glide_core::{EventDispatcher, ManualClock, Point, ScrollEvent, SharedClock, Size, SystemClock, WidgetRegistry};
use glide_layout::{FnDataSource, Layout, WindowedScroller};
use serde::Serialize;

use crate::config::{LayoutKind, SimulationConfig, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One line of output
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub time_ms: f64,
    pub step: usize,
    pub state: String,
    pub offset: f32,
    pub first_visible: Option<usize>,
    /// Data row held by each slot, in ring order
    pub rows: Vec<Option<usize>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

/// Advances time between frames
enum Driver {
    Manual(Arc<ManualClock>),
    Realtime(tokio::time::Interval),
}

impl Driver {
    async fn frame(&mut self, frame_ms: f64) {
        match self {
            Driver::Manual(clock) => clock.advance(frame_ms),
            Driver::Realtime(interval) => {
                interval.tick().await;
            }
        }
    }

    async fn wait(&mut self, ms: f64) {
        match self {
            Driver::Manual(clock) => clock.advance(ms),
            Driver::Realtime(_) => tokio::time::sleep(Duration::from_secs_f64(ms.max(0.0) / 1000.0)).await,
        }
    }
}

pub struct Simulation<W: Write> {
    config: SimulationConfig,
    clock: SharedClock,
    driver: Driver,
    /// Keeps the scheduler alive; the scroller only holds a weak reference
    _scheduler: Arc<Mutex<AnimationScheduler>>,
    registry: WidgetRegistry,
    scroller: WindowedScroller<FnDataSource<String>>,
    dispatcher: EventDispatcher,
    /// Filled by the dispatcher's handlers, drained once per frame
    event_log: Arc<Mutex<Vec<String>>>,
    format: OutputFormat,
    out: W,
    step: usize,
    frames: u64,
}

impl<W: Write> Simulation<W> {
    pub fn new(config: SimulationConfig, realtime: bool, format: OutputFormat, out: W) -> Result<Self> {
        let (clock, driver) = if realtime {
            let period = Duration::from_secs_f64(config.script.frame_ms / 1000.0);
            (SystemClock::shared(), Driver::Realtime(tokio::time::interval(period)))
        } else {
            let manual = ManualClock::shared();
            let clock: SharedClock = manual.clone();
            (clock, Driver::Manual(manual))
        };
        let scheduler = Arc::new(Mutex::new(AnimationScheduler::new(clock.clone())));

        let prefix = config.data.prefix.clone();
        let source = FnDataSource::builder()
            .item_at(move |index| Some(format!("{prefix}{index}")))
            .count(config.data.count)
            .build()?;

        let layout = match config.layout.kind {
            LayoutKind::List => Layout::List,
            LayoutKind::Grid => Layout::Grid {
                cell_cross_extent: config.layout.cell_cross_extent,
            },
        };

        let mut registry = WidgetRegistry::new();
        let scroller = WindowedScroller::builder(source)
            .config(config.scroll)
            .layout(layout)
            .viewport(Size::new(config.viewport.width, config.viewport.height))
            .slot_size(config.layout.slot_size)
            .scheduler(&scheduler)
            .label("simulation")
            .build(&mut registry)
            .context("Failed to build scroller")?;

        let event_log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for event_type in [
            event_types::SCROLL_START,
            event_types::SCROLL_UPDATE,
            event_types::SCROLL_STOP,
            event_types::SELECT,
        ] {
            let log = Arc::clone(&event_log);
            dispatcher.register(scroller.id(), event_type, move |event| {
                log.lock().unwrap_or_else(PoisonError::into_inner).push(describe(event));
            });
        }

        Ok(Self {
            config,
            clock,
            driver,
            _scheduler: scheduler,
            registry,
            scroller,
            dispatcher,
            event_log,
            format,
            out,
            step: 0,
            frames: 0,
        })
    }

    /// Play every scripted step, then tear the scroller down
    pub async fn run(mut self) -> Result<W> {
        self.emit_frame()?;

        let steps = std::mem::take(&mut self.config.script.steps);
        for (i, step) in steps.iter().enumerate() {
            self.step = i + 1;
            tracing::debug!(step = self.step, ?step, "running step");
            self.apply(step).await?;
            self.settle().await?;
        }

        tracing::info!(steps = steps.len(), frames = self.frames, "simulation finished");
        let Simulation {
            scroller,
            mut registry,
            mut dispatcher,
            out,
            ..
        } = self;
        dispatcher.unregister_widget(scroller.id());
        scroller.destroy(&mut registry);
        Ok(out)
    }

    async fn apply(&mut self, step: &Step) -> Result<()> {
        match *step {
            Step::ScrollTo { offset, duration_ms } => self.scroller.scroll_to(offset, duration_ms),
            Step::Fling { velocity, duration_ms } => {
                let duration = duration_ms.unwrap_or(self.config.scroll.scroll_duration_ms);
                self.scroller.fling(velocity, duration);
            }
            Step::Drag {
                from,
                to,
                duration_ms,
                moves,
            } => {
                let moves = moves.max(1);
                let pause = duration_ms / moves as f64;
                self.scroller.on_drag_start(from, self.clock.now_ms());
                for m in 1..=moves {
                    self.driver.wait(pause).await;
                    let t = m as f32 / moves as f32;
                    let pointer = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
                    self.scroller.on_drag_move(pointer, self.clock.now_ms());
                    self.scroller.pump();
                    self.emit_frame()?;
                }
                self.scroller.on_drag_stop(to, self.clock.now_ms());
            }
            Step::Tap { at } => {
                let now = self.clock.now_ms();
                self.scroller.on_drag_start(at, now);
                self.scroller.on_drag_stop(at, now);
            }
            Step::Center { index, duration_ms } => {
                if !self.scroller.center_to_index(index, duration_ms) {
                    tracing::warn!(index, "center target out of range");
                }
            }
            Step::Resize { width, height } => self.scroller.resize(Size::new(width, height)),
            Step::Wait { ms } => self.driver.wait(ms).await,
        }
        self.emit_frame()
    }

    /// Run frames until the scroller has nothing left to do
    async fn settle(&mut self) -> Result<()> {
        let frame_ms = self.config.script.frame_ms;
        let mut frames = 0;
        let mut pending = self.scroller.pump();
        while pending {
            if frames >= self.config.script.max_frames {
                tracing::warn!(step = self.step, frames, "step did not settle, moving on");
                break;
            }
            self.driver.frame(frame_ms).await;
            pending = self.scroller.pump();
            frames += 1;
            self.emit_frame()?;
        }
        Ok(())
    }

    fn emit_frame(&mut self) -> Result<()> {
        self.dispatcher.dispatch_all(self.scroller.take_events());
        let events = std::mem::take(&mut *self.event_log.lock().unwrap_or_else(PoisonError::into_inner));
        let record = FrameRecord {
            time_ms: self.clock.now_ms(),
            step: self.step,
            state: format!("{:?}", self.scroller.state()),
            offset: self.scroller.offset(),
            first_visible: self.scroller.first_visible_index(),
            rows: self.scroller.ring().rows(),
            events,
        };
        self.frames += 1;

        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &record)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => writeln!(self.out, "{}", render_text(&record))?,
        }
        Ok(())
    }
}

fn describe(event: &ScrollEvent) -> String {
    format!("{:?}", event.kind)
}

fn render_text(record: &FrameRecord) -> String {
    let rows = record
        .rows
        .iter()
        .map(|row| row.map_or_else(|| "-".to_string(), |r| r.to_string()))
        .collect::<Vec<_>>()
        .join(" ");
    let first = record.first_visible.map_or_else(|| "-".to_string(), |i| i.to_string());

    let mut line = format!(
        "[{:>8.1}ms] #{:<2} {:<9} offset={:>10.2} first={:<6} slots=[{}]",
        record.time_ms, record.step, record.state, record.offset, first, rows
    );
    if !record.events.is_empty() {
        line.push_str("  ");
        line.push_str(&record.events.join(", "));
    }
    line
}
