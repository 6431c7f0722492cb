//! Widget registry
//!
//! Scroll widgets are registered here when they are built and removed when
//! they are destroyed. The host owns the registry and passes it in, so there
//! is no process-wide table of widgets.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Unique identifier for a registered widget
    pub struct WidgetId;
}

/// Kind of windowed container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Linear list, clamps at both ends
    List,
    /// Linear grid of rows, clamps at both ends
    Grid,
    /// List that wraps around its data set
    Circular,
}

/// Metadata kept for each live widget
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEntry {
    pub kind: WidgetKind,
    pub label: Option<String>,
}

/// Owner of widget identities
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: SlotMap<WidgetId, WidgetEntry>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            widgets: SlotMap::with_key(),
        }
    }

    /// Register a new widget
    pub fn create(&mut self, kind: WidgetKind) -> WidgetId {
        let id = self.widgets.insert(WidgetEntry { kind, label: None });
        tracing::debug!(?id, ?kind, "widget registered");
        id
    }

    /// Register a new widget with a human-readable label
    pub fn create_labeled(&mut self, kind: WidgetKind, label: impl Into<String>) -> WidgetId {
        let label = label.into();
        let id = self.widgets.insert(WidgetEntry {
            kind,
            label: Some(label.clone()),
        });
        tracing::debug!(?id, ?kind, %label, "widget registered");
        id
    }

    /// Unregister a widget. Returns its entry if it was still live.
    pub fn destroy(&mut self, id: WidgetId) -> Option<WidgetEntry> {
        let entry = self.widgets.remove(id);
        if entry.is_some() {
            tracing::debug!(?id, "widget destroyed");
        }
        entry
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetEntry> {
        self.widgets.get(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Number of live widgets of one kind
    pub fn count_of(&self, kind: WidgetKind) -> usize {
        self.widgets.values().filter(|w| w.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
