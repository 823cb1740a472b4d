//! Gesture telemetry event types exposed to the CLI and the JNI bridge.

use serde::{Deserialize, Serialize};

use crate::widget::{PointerAction, Position};

/// Library lifecycle stages reported by the JNI instrumentation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    LibraryLoaded,
    ControllerCreated,
    ControllerDestroyed,
}

/// Metric events covering gesture results and lifecycle details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    Tap {
        position: Position,
    },
    DragEnd {
        origin: Position,
        position: Position,
        distance_px: f32,
    },
    PositionClamped {
        requested: Position,
        applied: Position,
    },
    EventIgnored {
        action: PointerAction,
    },
    Lifecycle {
        phase: LifecyclePhase,
        timestamp_ms: u64,
    },
}
