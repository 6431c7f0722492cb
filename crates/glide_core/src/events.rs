//! Event types and dispatch
//!
//! Scroll containers queue [`ScrollEvent`]s; the host drains them and routes
//! them to per-widget handlers through an [`EventDispatcher`].

use rustc_hash::FxHashMap;

use crate::registry::WidgetId;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    /// Content started moving (drag past threshold, flick or animated scroll)
    pub const SCROLL_START: EventType = 30;
    /// Offset changed
    pub const SCROLL_UPDATE: EventType = 31;
    /// Content came to rest
    pub const SCROLL_STOP: EventType = 32;
    /// An item was activated
    pub const SELECT: EventType = 33;
}

/// Event emitted by a scroll container
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    pub widget: WidgetId,
    pub kind: ScrollEventKind,
}

/// Event-specific data
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEventKind {
    Start { offset: f32 },
    Update { offset: f32 },
    Stop { offset: f32 },
    Select { index: usize },
}

impl ScrollEvent {
    pub fn event_type(&self) -> EventType {
        match self.kind {
            ScrollEventKind::Start { .. } => event_types::SCROLL_START,
            ScrollEventKind::Update { .. } => event_types::SCROLL_UPDATE,
            ScrollEventKind::Stop { .. } => event_types::SCROLL_STOP,
            ScrollEventKind::Select { .. } => event_types::SELECT,
        }
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&ScrollEvent) + Send + Sync>;

/// Dispatches scroll events to registered handlers
pub struct EventDispatcher {
    handlers: FxHashMap<(WidgetId, EventType), Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for a widget and event type
    pub fn register<F>(&mut self, widget: WidgetId, event_type: EventType, handler: F)
    where
        F: Fn(&ScrollEvent) + Send + Sync + 'static,
    {
        self.handlers
            .entry((widget, event_type))
            .or_default()
            .push(Box::new(handler));
    }

    /// Drop every handler registered for a widget
    pub fn unregister_widget(&mut self, widget: WidgetId) {
        self.handlers.retain(|(id, _), _| *id != widget);
    }

    /// Dispatch an event to all registered handlers. Returns how many ran.
    pub fn dispatch(&self, event: &ScrollEvent) -> usize {
        match self.handlers.get(&(event.widget, event.event_type())) {
            Some(handlers) => {
                for handler in handlers {
                    handler(event);
                }
                handlers.len()
            }
            None => 0,
        }
    }

    /// Dispatch a batch of events in order
    pub fn dispatch_all(&self, events: impl IntoIterator<Item = ScrollEvent>) {
        for event in events {
            self.dispatch(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
