// WidgetHost - the seam between the drag controller and the window manager
//
// The host owns the overlay view. The controller only tells it where the
// widget should be, whether the end-affordance is visible, and when a tap
// should be treated as a click.

use serde::{Deserialize, Serialize};

use super::event::AffordanceSignal;
use super::geometry::Position;

/// Callbacks implemented by the platform shim
pub trait WidgetHost {
    /// Move the overlay to `position`
    fn apply_position(&mut self, position: Position);

    /// Show or hide the end-affordance overlay
    fn set_affordance_visible(&mut self, visible: bool);

    /// Run the widget's click action
    fn perform_click(&mut self);

    /// Convenience wrapper over [`WidgetHost::set_affordance_visible`]
    fn signal_affordance(&mut self, signal: AffordanceSignal) {
        self.set_affordance_visible(signal.is_visible());
    }
}

/// A single host callback invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    ApplyPosition { x: i32, y: i32 },
    Affordance { signal: AffordanceSignal },
    Click,
}

/// Host that records every callback in order
///
/// Used by trace replay, the JNI bridge and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn click_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Click))
            .count()
    }

    /// Last position applied, if any
    pub fn last_position(&self) -> Option<Position> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::ApplyPosition { x, y } => Some(Position::new(*x, *y)),
            _ => None,
        })
    }

    /// Current affordance visibility, if it was ever signalled
    pub fn affordance_visible(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::Affordance { signal } => Some(signal.is_visible()),
            _ => None,
        })
    }
}

impl WidgetHost for RecordingHost {
    fn apply_position(&mut self, position: Position) {
        self.calls.push(HostCall::ApplyPosition {
            x: position.x,
            y: position.y,
        });
    }

    fn set_affordance_visible(&mut self, visible: bool) {
        let signal = if visible {
            AffordanceSignal::Show
        } else {
            AffordanceSignal::Hide
        };
        self.calls.push(HostCall::Affordance { signal });
    }

    fn perform_click(&mut self) {
        self.calls.push(HostCall::Click);
    }
}

impl<H: WidgetHost + ?Sized> WidgetHost for &mut H {
    fn apply_position(&mut self, position: Position) {
        (**self).apply_position(position);
    }

    fn set_affordance_visible(&mut self, visible: bool) {
        (**self).set_affordance_visible(visible);
    }

    fn perform_click(&mut self) {
        (**self).perform_click();
    }
}
