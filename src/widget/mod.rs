// Widget module - floating overlay drag/tap handling
//
// This module provides:
// 1. Geometry: positions, touch points and the clamp rectangle
// 2. DragWidgetController: the pointer-event state machine
// 3. WidgetHost: callbacks the platform shim implements
//
// Typical flow:
// 1. Build WidgetBounds from the display size and widget extent
// 2. Create a DragWidgetController around a WidgetHost
// 3. Feed every touch event through dispatch() (or the on_pointer_* entry points)

pub mod controller;
pub mod event;
pub mod geometry;
pub mod host;
pub mod session;

pub use controller::{DragWidgetController, CLICK_DRAG_TOLERANCE};
pub use event::{AffordanceSignal, GestureOutcome, PointerAction, PointerEvent};
pub use geometry::{PointerDelta, Position, ScreenSize, TouchPoint, WidgetBounds, WidgetExtent};
pub use host::{HostCall, RecordingHost, WidgetHost};
pub use session::{GestureState, PointerSession};
