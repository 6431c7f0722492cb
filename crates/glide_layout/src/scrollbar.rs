//! Scrollbar bookkeeping
//!
//! Tracks whether the position indicator is showing and where its thumb
//! sits. Drawing it is left to the host.

use glide_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Scrollbar visibility modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollbarVisibility {
    /// Always show the scrollbar
    Always,
    /// Show while content moves, hide once it comes to rest
    #[default]
    Auto,
    /// Never show the scrollbar (content still scrollable)
    Never,
}

/// Configuration for scrollbar geometry and behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarConfig {
    pub visibility: ScrollbarVisibility,
    /// Minimum thumb length in pixels
    pub min_thumb_length: f32,
    /// Padding from both ends of the track
    pub edge_padding: f32,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            visibility: ScrollbarVisibility::Auto,
            min_thumb_length: 30.0,
            edge_padding: 2.0,
        }
    }
}

impl ScrollbarConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::within("scrollbar.min_thumb_length", self.min_thumb_length as f64, 0.0, f64::MAX)?;
        ConfigError::within("scrollbar.edge_padding", self.edge_padding as f64, 0.0, f64::MAX)
    }
}

/// What the host needs to draw the indicator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollbarRenderInfo {
    pub visible: bool,
    /// Thumb length along the scroll axis
    pub thumb_length: f32,
    /// Thumb start, measured from the start of the viewport
    pub thumb_offset: f32,
}

/// Visibility state of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollIndicator {
    scrolling: bool,
}

impl ScrollIndicator {
    /// Content started moving
    pub fn on_scroll_start(&mut self) {
        self.scrolling = true;
    }

    /// Content came to rest
    pub fn on_scroll_stop(&mut self) {
        self.scrolling = false;
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn is_visible(&self, config: &ScrollbarConfig, can_scroll: bool) -> bool {
        match config.visibility {
            ScrollbarVisibility::Always => can_scroll,
            ScrollbarVisibility::Auto => can_scroll && self.scrolling,
            ScrollbarVisibility::Never => false,
        }
    }
}

/// Thumb `(length, offset)` for a track as long as the viewport
///
/// `offset` is the scroll offset (0 at the start, negative further in).
pub fn thumb_geometry(config: &ScrollbarConfig, viewport: f32, content: f32, offset: f32) -> (f32, f32) {
    let content = content.max(viewport);
    let track = (viewport - config.edge_padding * 2.0).max(0.0);
    if content <= 0.0 || track <= 0.0 {
        return (0.0, config.edge_padding);
    }

    let thumb = (viewport / content * viewport)
        .max(config.min_thumb_length)
        .min(track);

    let max_scroll = content - viewport;
    let progress = if max_scroll > 0.0 {
        (-offset / max_scroll).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (thumb, config.edge_padding + progress * (track - thumb))
}
