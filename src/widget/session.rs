// PointerSession - transient state for one down -> up gesture

use serde::{Deserialize, Serialize};

use super::geometry::{PointerDelta, Position, TouchPoint};

/// Snapshot taken on pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSession {
    /// Widget offset when the gesture started
    pub origin_position: Position,
    /// Raw pointer coordinates when the gesture started
    pub origin_touch: TouchPoint,
}

impl PointerSession {
    pub fn new(origin_position: Position, origin_touch: TouchPoint) -> Self {
        Self {
            origin_position,
            origin_touch,
        }
    }

    /// Displacement of `touch` relative to the session start
    ///
    /// Computed as `origin_touch - touch`. The overlay is anchored to the
    /// bottom/end corner, so moving the finger right or down shrinks the
    /// offset.
    pub fn delta(&self, touch: TouchPoint) -> PointerDelta {
        self.origin_touch.delta_to(touch)
    }

    /// Unclamped position for `touch`
    pub fn candidate(&self, touch: TouchPoint) -> Position {
        self.origin_position.offset(self.delta(touch))
    }
}

/// Externally visible controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Idle,
    Pressed,
    Dragging,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_adds_inverted_touch_delta() {
        let session = PointerSession::new(Position::new(500, 500), TouchPoint::new(300.0, 300.0));
        assert_eq!(
            session.candidate(TouchPoint::new(900.0, 300.0)),
            Position::new(-100, 500)
        );
        assert_eq!(
            session.candidate(TouchPoint::new(250.0, 350.0)),
            Position::new(550, 450)
        );
    }
}
