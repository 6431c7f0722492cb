//! State transition trait for widget interaction states

use std::hash::Hash;

/// State types that react to event ids by moving to a new state
///
/// ```ignore
/// impl StateTransitions for DragState {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (DragState::Idle, PRESS) => Some(DragState::Pressed),
///             (DragState::Pressed, RELEASE) => Some(DragState::Idle),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}
