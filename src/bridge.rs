// Handle-based controller registry for the JNI bridge
//
// Java holds controllers as opaque `long` handles. Each touch call returns a
// fixed-size int frame the overlay service can apply without calling back
// into Rust:
//
//   [kind, x, y, affordance]
//
// kind       - GestureOutcome::kind_code(), or -error_code on failure
// x, y       - new widget position for Moved/DragEnd, otherwise 0
// affordance - 1 show, 0 hide, -1 unchanged

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::config::GestureConfig;
use crate::error::{log_widget_error, ErrorCode, WidgetError};
use crate::telemetry::{self, LifecyclePhase};
use crate::widget::{
    DragWidgetController, GestureOutcome, HostCall, PointerAction, PointerEvent, Position,
    RecordingHost, ScreenSize, TouchPoint, WidgetBounds, WidgetExtent,
};

/// Number of ints in a touch result frame
pub const FRAME_LEN: usize = 4;

const AFFORDANCE_UNCHANGED: i32 = -1;

static REGISTRY: Lazy<Mutex<ControllerRegistry>> =
    Lazy::new(|| Mutex::new(ControllerRegistry::default()));

#[derive(Default)]
struct ControllerRegistry {
    controllers: HashMap<i64, DragWidgetController<RecordingHost>>,
    next_handle: i64,
}

fn registry() -> Result<MutexGuard<'static, ControllerRegistry>, WidgetError> {
    REGISTRY.lock().map_err(|_| WidgetError::StatePoisoned)
}

/// Register a controller and return its handle (always > 0)
pub fn create_controller(
    screen_width: i32,
    screen_height: i32,
    widget_width: i32,
    widget_height: i32,
    gesture: &GestureConfig,
) -> Result<i64, WidgetError> {
    let bounds = WidgetBounds::new(
        ScreenSize {
            width: screen_width,
            height: screen_height,
        },
        WidgetExtent {
            width: widget_width,
            height: widget_height,
        },
    )?;
    let controller = DragWidgetController::with_config(bounds, gesture, RecordingHost::new());

    let mut registry = registry()?;
    registry.next_handle += 1;
    let handle = registry.next_handle;
    registry.controllers.insert(handle, controller);
    drop(registry);

    telemetry::hub().record_lifecycle(LifecyclePhase::ControllerCreated);
    log::info!(
        "[Bridge] Controller {} created ({}x{} screen, {}x{} widget)",
        handle,
        screen_width,
        screen_height,
        widget_width,
        widget_height
    );
    Ok(handle)
}

/// Feed one `MotionEvent` to a controller
///
/// Unknown action codes are ignored without touching the controller.
pub fn on_touch(
    handle: i64,
    action: i32,
    raw_x: f32,
    raw_y: f32,
    position: Position,
) -> Result<[i32; FRAME_LEN], WidgetError> {
    let mut registry = registry()?;
    let controller = registry
        .controllers
        .get_mut(&handle)
        .ok_or(WidgetError::InvalidHandle { handle })?;

    let Some(action) = PointerAction::from_motion_action(action) else {
        return Ok(encode(GestureOutcome::Ignored, &[]));
    };

    let touch = TouchPoint::new(raw_x, raw_y);
    let event = match action {
        PointerAction::Down => PointerEvent::down(position, touch),
        PointerAction::Move => PointerEvent::moved(touch),
        PointerAction::Up => PointerEvent::up(touch),
    };
    let outcome = controller.dispatch(event);
    let calls = controller.host_mut().take_calls();
    Ok(encode(outcome, &calls))
}

/// Update bounds after a configuration change
pub fn update_bounds(
    handle: i64,
    screen_width: i32,
    screen_height: i32,
    widget_width: i32,
    widget_height: i32,
) -> Result<(), WidgetError> {
    let bounds = WidgetBounds::new(
        ScreenSize {
            width: screen_width,
            height: screen_height,
        },
        WidgetExtent {
            width: widget_width,
            height: widget_height,
        },
    )?;
    let mut registry = registry()?;
    registry
        .controllers
        .get_mut(&handle)
        .ok_or(WidgetError::InvalidHandle { handle })?
        .set_bounds(bounds);
    Ok(())
}

/// Drop a controller; unknown handles are an error
pub fn destroy_controller(handle: i64) -> Result<(), WidgetError> {
    let removed = registry()?.controllers.remove(&handle);
    if removed.is_none() {
        return Err(WidgetError::InvalidHandle { handle });
    }
    telemetry::hub().record_lifecycle(LifecyclePhase::ControllerDestroyed);
    log::info!("[Bridge] Controller {} destroyed", handle);
    Ok(())
}

/// Frame reported to Java when a call fails
pub fn error_frame(err: &WidgetError, context: &str) -> [i32; FRAME_LEN] {
    log_widget_error(err, context);
    [-err.code(), 0, 0, AFFORDANCE_UNCHANGED]
}

fn encode(outcome: GestureOutcome, calls: &[HostCall]) -> [i32; FRAME_LEN] {
    let position = outcome.position().unwrap_or_default();
    let affordance = calls
        .iter()
        .rev()
        .find_map(|call| match call {
            HostCall::Affordance { signal } => Some(i32::from(signal.is_visible())),
            _ => None,
        })
        .unwrap_or(AFFORDANCE_UNCHANGED);
    [outcome.kind_code(), position.x, position.y, affordance]
}
