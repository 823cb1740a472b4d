//! Pointer input and controller output types.

use serde::{Deserialize, Serialize};

use super::geometry::{Position, TouchPoint};

/// Raw pointer action as reported by the host touch listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

impl PointerAction {
    /// Map an Android `MotionEvent` action code.
    ///
    /// Only `ACTION_DOWN` (0), `ACTION_UP` (1) and `ACTION_MOVE` (2) are
    /// interpreted; everything else is left to the host.
    pub fn from_motion_action(code: i32) -> Option<Self> {
        match code {
            0 => Some(PointerAction::Down),
            1 => Some(PointerAction::Up),
            2 => Some(PointerAction::Move),
            _ => None,
        }
    }
}

/// One raw pointer event.
///
/// `position` is the widget's current offset and is only read for `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub touch: TouchPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl PointerEvent {
    pub fn down(position: Position, touch: TouchPoint) -> Self {
        Self {
            action: PointerAction::Down,
            touch,
            position: Some(position),
        }
    }

    pub fn moved(touch: TouchPoint) -> Self {
        Self {
            action: PointerAction::Move,
            touch,
            position: None,
        }
    }

    pub fn up(touch: TouchPoint) -> Self {
        Self {
            action: PointerAction::Up,
            touch,
            position: None,
        }
    }
}

/// Visibility signal for the end-affordance overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceSignal {
    Show,
    Hide,
}

impl AffordanceSignal {
    pub fn is_visible(&self) -> bool {
        matches!(self, AffordanceSignal::Show)
    }
}

/// What a single pointer event did to the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "position", rename_all = "snake_case")]
pub enum GestureOutcome {
    /// A session was opened; nothing visible changed.
    Pressed,
    /// The widget moved to the clamped position.
    Moved(Position),
    /// Release within tolerance; the click action fired.
    Tap,
    /// Release after a drag; the widget stays where it is.
    DragEnd(Position),
    /// Out-of-protocol event dropped.
    Ignored,
}

impl GestureOutcome {
    /// Stable integer tag used by the JNI bridge.
    pub fn kind_code(&self) -> i32 {
        match self {
            GestureOutcome::Ignored => 0,
            GestureOutcome::Pressed => 1,
            GestureOutcome::Moved(_) => 2,
            GestureOutcome::Tap => 3,
            GestureOutcome::DragEnd(_) => 4,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            GestureOutcome::Moved(position) | GestureOutcome::DragEnd(position) => Some(*position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_action_mapping() {
        assert_eq!(PointerAction::from_motion_action(0), Some(PointerAction::Down));
        assert_eq!(PointerAction::from_motion_action(1), Some(PointerAction::Up));
        assert_eq!(PointerAction::from_motion_action(2), Some(PointerAction::Move));
        // ACTION_CANCEL
        assert_eq!(PointerAction::from_motion_action(3), None);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_string(&GestureOutcome::Moved(Position::new(-25, 500))).unwrap();
        assert_eq!(json, r#"{"kind":"moved","position":{"x":-25,"y":500}}"#);

        let json = serde_json::to_string(&GestureOutcome::Tap).unwrap();
        assert_eq!(json, r#"{"kind":"tap"}"#);
    }

    #[test]
    fn test_pointer_event_position_optional() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"action":"move","touch":{"x":1.0,"y":2.0}}"#).unwrap();
        assert_eq!(event, PointerEvent::moved(TouchPoint::new(1.0, 2.0)));
    }
}
