//! Glide Core
//!
//! Foundational primitives shared by the Glide windowing engine:
//!
//! - **Geometry**: points, sizes and the scroll axis
//! - **Clocks**: monotonic millisecond clocks, real or manually driven
//! - **Events**: scroll events emitted to host code and their dispatcher
//! - **Registry**: explicit lifecycle for scroll widgets
//!
//! # Example
//!
//! ```rust
//! use glide_core::{ManualClock, Clock};
//!
//! let clock = ManualClock::new();
//! clock.advance(16.0);
//! assert_eq!(clock.now_ms(), 16.0);
//! ```

pub mod clock;
pub mod error;
pub mod events;
pub mod geometry;
pub mod registry;
pub mod state;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::ConfigError;
pub use events::{EventDispatcher, EventType, ScrollEvent, ScrollEventKind};
pub use geometry::{Point, ScrollDirection, Size};
pub use registry::{WidgetEntry, WidgetId, WidgetKind, WidgetRegistry};
pub use state::StateTransitions;
