// DragWidgetController - tap/drag state machine for the floating overlay
//
// | State    | Event | Next     | Host side effects                    |
// | -------- | ----- | -------- | ------------------------------------ |
// | Idle     | Down  | Pressed  | none                                 |
// | Idle     | Move  | Idle     | none (ignored)                       |
// | Idle     | Up    | Idle     | none (ignored)                       |
// | Pressed  | Down  | Pressed  | none, session replaced               |
// | Pressed  | Move  | Dragging | hide affordance, apply position      |
// | Pressed  | Up    | Idle     | show affordance, click if within tol |
// | Dragging | Down  | Pressed  | none, session replaced               |
// | Dragging | Move  | Dragging | hide affordance, apply position      |
// | Dragging | Up    | Idle     | show affordance, click if within tol |
//
// Tap classification looks only at the total displacement between down and
// up. A drag that wanders off and returns near its start still counts as a
// tap, and the widget stays where the last move put it.
//
// The origin position is never clamped on down; an out-of-bounds widget is
// pulled back in by the first move.

use super::event::{AffordanceSignal, GestureOutcome, PointerAction, PointerEvent};
use super::geometry::{Position, TouchPoint, WidgetBounds};
use super::host::WidgetHost;
use super::session::{GestureState, PointerSession};
use crate::config::GestureConfig;
use crate::telemetry;

/// Default tap tolerance in pixels
pub const CLICK_DRAG_TOLERANCE: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Pressed(PointerSession),
    Dragging {
        session: PointerSession,
        position: Position,
    },
}

/// Interprets pointer events for one overlay widget
pub struct DragWidgetController<H: WidgetHost> {
    bounds: WidgetBounds,
    tolerance: f32,
    phase: Phase,
    last_position: Option<Position>,
    host: H,
}

impl<H: WidgetHost> DragWidgetController<H> {
    /// Create a controller with the default tap tolerance
    pub fn new(bounds: WidgetBounds, host: H) -> Self {
        Self {
            bounds,
            tolerance: CLICK_DRAG_TOLERANCE,
            phase: Phase::Idle,
            last_position: None,
            host,
        }
    }

    /// Create a controller using the gesture section of the app config
    pub fn with_config(bounds: WidgetBounds, config: &GestureConfig, host: H) -> Self {
        Self::new(bounds, host).with_tolerance(config.click_drag_tolerance)
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Seed the position used when a down event carries none
    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.last_position = Some(position);
        self
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn bounds(&self) -> WidgetBounds {
        self.bounds
    }

    /// Replace the clamp rectangle, e.g. after a display rotation
    ///
    /// An in-flight gesture picks up the new bounds on its next move.
    pub fn set_bounds(&mut self, bounds: WidgetBounds) {
        log::debug!("[DragWidget] Bounds updated: {:?}", bounds);
        self.bounds = bounds;
    }

    pub fn state(&self) -> GestureState {
        match self.phase {
            Phase::Idle => GestureState::Idle,
            Phase::Pressed(_) => GestureState::Pressed,
            Phase::Dragging { .. } => GestureState::Dragging,
        }
    }

    /// Session of the gesture in progress, if any
    pub fn session(&self) -> Option<PointerSession> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pressed(session) | Phase::Dragging { session, .. } => Some(session),
        }
    }

    /// Most recent widget position known to the controller
    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Route a raw event to the matching entry point
    pub fn dispatch(&mut self, event: PointerEvent) -> GestureOutcome {
        match event.action {
            PointerAction::Down => {
                let position = event
                    .position
                    .or(self.last_position)
                    .unwrap_or_default();
                self.on_pointer_down(position, event.touch)
            }
            PointerAction::Move => self.on_pointer_move(event.touch),
            PointerAction::Up => self.on_pointer_up(event.touch),
        }
    }

    /// Start a gesture, replacing any session still in flight
    pub fn on_pointer_down(&mut self, current_position: Position, touch: TouchPoint) -> GestureOutcome {
        if !matches!(self.phase, Phase::Idle) {
            tracing::debug!("[DragWidget] Down while gesture active, restarting session");
        }

        tracing::debug!(
            "[DragWidget] Down at position=({}, {}) touch=({}, {})",
            current_position.x,
            current_position.y,
            touch.x,
            touch.y
        );

        self.phase = Phase::Pressed(PointerSession::new(current_position, touch));
        self.last_position = Some(current_position);
        GestureOutcome::Pressed
    }

    /// Drag the widget, clamped to the screen
    pub fn on_pointer_move(&mut self, touch: TouchPoint) -> GestureOutcome {
        let session = match self.phase {
            Phase::Idle => return self.ignore(PointerAction::Move),
            Phase::Pressed(session) | Phase::Dragging { session, .. } => session,
        };

        let candidate = session.candidate(touch);
        let position = self.bounds.clamp(candidate);
        if position != candidate {
            telemetry::hub().record_clamp(candidate, position);
        }

        tracing::debug!(
            "[DragWidget] Move touch=({}, {}) candidate=({}, {}) position=({}, {})",
            touch.x,
            touch.y,
            candidate.x,
            candidate.y,
            position.x,
            position.y
        );

        self.phase = Phase::Dragging { session, position };
        self.last_position = Some(position);

        self.host.signal_affordance(AffordanceSignal::Hide);
        self.host.apply_position(position);
        GestureOutcome::Moved(position)
    }

    /// Finish the gesture as a tap or a drag-end
    pub fn on_pointer_up(&mut self, touch: TouchPoint) -> GestureOutcome {
        let (session, position) = match self.phase {
            Phase::Idle => return self.ignore(PointerAction::Up),
            Phase::Pressed(session) => (session, session.origin_position),
            Phase::Dragging { session, position } => (session, position),
        };
        self.phase = Phase::Idle;

        self.host.signal_affordance(AffordanceSignal::Show);

        let delta = session.delta(touch);
        if delta.within(self.tolerance) {
            tracing::debug!("[DragWidget] Up classified as tap (delta={:?})", delta);
            self.host.perform_click();
            telemetry::hub().record_tap(position);
            GestureOutcome::Tap
        } else {
            tracing::debug!(
                "[DragWidget] Up classified as drag end at ({}, {}) (delta={:?})",
                position.x,
                position.y,
                delta
            );
            telemetry::hub().record_drag_end(session.origin_position, position);
            GestureOutcome::DragEnd(position)
        }
    }

    fn ignore(&self, action: PointerAction) -> GestureOutcome {
        tracing::debug!("[DragWidget] Ignoring {:?} while idle", action);
        telemetry::hub().record_ignored(action);
        GestureOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::geometry::{ScreenSize, WidgetExtent};
    use crate::widget::host::{HostCall, RecordingHost};

    fn controller() -> DragWidgetController<RecordingHost> {
        let bounds = WidgetBounds::new(
            ScreenSize {
                width: 1000,
                height: 2000,
            },
            WidgetExtent {
                width: 100,
                height: 100,
            },
        )
        .unwrap();
        DragWidgetController::new(bounds, RecordingHost::new())
    }

    fn touch(x: f32, y: f32) -> TouchPoint {
        TouchPoint::new(x, y)
    }

    #[test]
    fn test_move_clamps_to_negative_limit() {
        let mut c = controller();
        c.on_pointer_down(Position::new(500, 500), touch(300.0, 300.0));
        let outcome = c.on_pointer_move(touch(900.0, 300.0));

        assert_eq!(outcome, GestureOutcome::Moved(Position::new(-25, 500)));
        assert_eq!(c.state(), GestureState::Dragging);
        assert_eq!(
            c.host().calls(),
            &[
                HostCall::Affordance {
                    signal: AffordanceSignal::Hide
                },
                HostCall::ApplyPosition { x: -25, y: 500 },
            ]
        );
    }

    #[test]
    fn test_small_release_is_tap() {
        let mut c = controller();
        c.on_pointer_down(Position::new(200, 200), touch(300.0, 300.0));
        let outcome = c.on_pointer_up(touch(295.0, 297.0));

        assert_eq!(outcome, GestureOutcome::Tap);
        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(c.host().click_count(), 1);
        assert_eq!(c.host().last_position(), None);
        assert_eq!(c.host().affordance_visible(), Some(true));
        assert_eq!(c.last_position(), Some(Position::new(200, 200)));
    }

    #[test]
    fn test_tolerance_boundary_is_exclusive() {
        let mut c = controller();
        c.on_pointer_down(Position::new(200, 200), touch(300.0, 300.0));
        assert_eq!(
            c.on_pointer_up(touch(290.0, 300.0)),
            GestureOutcome::DragEnd(Position::new(200, 200))
        );
        assert_eq!(c.host().click_count(), 0);

        c.on_pointer_down(Position::new(200, 200), touch(300.0, 300.0));
        assert_eq!(c.on_pointer_up(touch(291.0, 309.0)), GestureOutcome::Tap);
    }

    #[test]
    fn test_both_axes_must_be_within_tolerance() {
        let mut c = controller();
        c.on_pointer_down(Position::new(200, 200), touch(300.0, 300.0));
        let outcome = c.on_pointer_up(touch(301.0, 340.0));
        assert!(matches!(outcome, GestureOutcome::DragEnd(_)));
        assert_eq!(c.host().click_count(), 0);
    }

    #[test]
    fn test_drag_end_keeps_last_clamped_position() {
        let mut c = controller();
        c.on_pointer_down(Position::new(500, 500), touch(300.0, 300.0));
        c.on_pointer_move(touch(250.0, 200.0));
        let outcome = c.on_pointer_up(touch(250.0, 200.0));

        assert_eq!(outcome, GestureOutcome::DragEnd(Position::new(550, 600)));
        assert_eq!(c.last_position(), Some(Position::new(550, 600)));
        assert_eq!(
            c.host().calls().last(),
            Some(&HostCall::Affordance {
                signal: AffordanceSignal::Show
            })
        );
    }

    #[test]
    fn test_return_to_start_after_drag_is_tap() {
        let mut c = controller();
        c.on_pointer_down(Position::new(500, 500), touch(300.0, 300.0));
        c.on_pointer_move(touch(400.0, 300.0));
        let outcome = c.on_pointer_up(touch(302.0, 301.0));

        assert_eq!(outcome, GestureOutcome::Tap);
        assert_eq!(c.host().click_count(), 1);
        assert_eq!(c.last_position(), Some(Position::new(400, 500)));
    }

    #[test]
    fn test_events_while_idle_are_ignored() {
        let mut c = controller();
        assert_eq!(c.on_pointer_move(touch(10.0, 10.0)), GestureOutcome::Ignored);
        assert_eq!(c.on_pointer_up(touch(10.0, 10.0)), GestureOutcome::Ignored);
        assert_eq!(c.state(), GestureState::Idle);
        assert!(c.host().calls().is_empty());
    }

    #[test]
    fn test_second_up_is_ignored() {
        let mut c = controller();
        c.on_pointer_down(Position::new(0, 0), touch(0.0, 0.0));
        assert_eq!(c.on_pointer_up(touch(0.0, 0.0)), GestureOutcome::Tap);
        assert_eq!(c.on_pointer_up(touch(0.0, 0.0)), GestureOutcome::Ignored);
        assert_eq!(c.host().click_count(), 1);
    }

    #[test]
    fn test_down_restarts_session() {
        let mut c = controller();
        c.on_pointer_down(Position::new(100, 100), touch(0.0, 0.0));
        c.on_pointer_move(touch(-50.0, 0.0));
        c.on_pointer_down(Position::new(300, 300), touch(500.0, 500.0));

        assert_eq!(c.state(), GestureState::Pressed);
        let session = c.session().unwrap();
        assert_eq!(session.origin_position, Position::new(300, 300));
        assert_eq!(session.origin_touch, touch(500.0, 500.0));
    }

    #[test]
    fn test_origin_not_clamped_on_down() {
        let mut c = controller();
        c.on_pointer_down(Position::new(-500, 5000), touch(0.0, 0.0));
        assert_eq!(c.on_pointer_up(touch(1.0, 1.0)), GestureOutcome::Tap);
        assert_eq!(c.last_position(), Some(Position::new(-500, 5000)));

        c.on_pointer_down(Position::new(-500, 5000), touch(0.0, 0.0));
        assert_eq!(
            c.on_pointer_move(touch(0.0, 0.0)),
            GestureOutcome::Moved(Position::new(-25, 1925))
        );
    }

    #[test]
    fn test_custom_tolerance() {
        let mut c = controller().with_tolerance(25.0);
        c.on_pointer_down(Position::new(0, 0), touch(100.0, 100.0));
        assert_eq!(c.on_pointer_up(touch(80.0, 120.0)), GestureOutcome::Tap);
    }

    #[test]
    fn test_dispatch_down_without_position_uses_last_known() {
        let mut c = controller();
        c.on_pointer_down(Position::new(500, 500), touch(300.0, 300.0));
        c.on_pointer_move(touch(200.0, 300.0));
        c.on_pointer_up(touch(200.0, 300.0));

        let event = PointerEvent {
            action: PointerAction::Down,
            touch: touch(10.0, 10.0),
            position: None,
        };
        c.dispatch(event);
        assert_eq!(
            c.session().unwrap().origin_position,
            Position::new(600, 500)
        );
    }

    #[test]
    fn test_set_bounds_applies_on_next_move() {
        let mut c = controller();
        c.on_pointer_down(Position::new(500, 500), touch(300.0, 300.0));
        c.set_bounds(
            WidgetBounds::new(
                ScreenSize {
                    width: 400,
                    height: 400,
                },
                WidgetExtent {
                    width: 100,
                    height: 100,
                },
            )
            .unwrap(),
        );
        assert_eq!(
            c.on_pointer_move(touch(300.0, 300.0)),
            GestureOutcome::Moved(Position::new(325, 325))
        );
    }
}
