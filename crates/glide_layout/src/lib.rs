//! Glide Layout Engine
//!
//! Virtualized scroll containers that display large data sets through a
//! small, fixed set of recycled slots.
//!
//! # Features
//!
//! - **Slot recycling**: a ring of `visible + 2` slots follows the scroll offset
//! - **Lists, grids and circular lists** over any [`DataSource`]
//! - **Momentum scrolling** with optional overshoot and snap-back
//! - **Nested containers**: cross-axis drags are handed to the parent
//! - **Scrollbar** geometry and visibility
//!
//! # Example
//!
//! ```ignore
//! use glide_layout::prelude::*;
//!
//! let mut list = WindowedScroller::builder(items)
//!     .viewport(Size::new(320.0, 480.0))
//!     .slot_size(48.0)
//!     .scheduler(&scheduler)
//!     .build(&mut registry)?;
//!
//! list.scroll_to(-960.0, Some(300.0));
//! ```

pub mod config;
pub mod data_source;
pub mod gesture;
pub mod handler;
pub mod render;
pub mod ring;
pub mod scrollbar;
pub mod scroller;

pub use config::{ScrollConfig, ScrollOption};
pub use data_source::{DataSource, FnDataSource, FnDataSourceBuilder, ItemCount};
pub use gesture::{DragTracker, ScrollState};
pub use handler::{DragOutcome, GestureArbiter, ScrollHandler};
pub use render::{CellFrame, SlotFrame};
pub use ring::{Cell, RecycleOutcome, RingGeometry, Slot, SlotId, SlotRing};
pub use scrollbar::{ScrollIndicator, ScrollbarConfig, ScrollbarRenderInfo, ScrollbarVisibility};
pub use scroller::{Layout, ScrollerBuilder, WindowedScroller};

/// Everything needed to build and drive a container
pub mod prelude {
    pub use crate::config::{ScrollConfig, ScrollOption};
    pub use crate::data_source::{DataSource, FnDataSource};
    pub use crate::handler::{DragOutcome, GestureArbiter, ScrollHandler};
    pub use crate::scroller::{Layout, WindowedScroller};
    pub use glide_animation::{AnimationScheduler, Easing};
    pub use glide_core::{ManualClock, Point, ScrollDirection, Size, WidgetRegistry};
}
