// Widget error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Widget error code constants shared with the Java side of the bridge
///
/// Error code range: 3001-3006
pub struct WidgetErrorCodes {}

impl WidgetErrorCodes {
    /// Screen dimensions are negative
    pub const INVALID_SCREEN_SIZE: i32 = 3001;

    /// Widget extent is negative
    pub const INVALID_EXTENT: i32 = 3002;

    /// Gesture trace could not be located or read
    pub const TRACE_NOT_FOUND: i32 = 3003;

    /// Gesture trace JSON is malformed
    pub const TRACE_PARSE: i32 = 3004;

    /// Controller handle is unknown to the bridge registry
    pub const INVALID_HANDLE: i32 = 3005;

    /// Controller registry lock was poisoned
    pub const STATE_POISONED: i32 = 3006;
}

/// Log a widget error with structured context
///
/// Fields: error code, component and message, prefixed with the caller
/// supplied context.
pub fn log_widget_error(err: &WidgetError, context: &str) {
    error!(
        "Widget error in {}: code={}, component=DragWidgetController, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Widget-related errors
///
/// Error code ranges: 3001-3006
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// Screen width or height is negative
    InvalidScreenSize { width: i32, height: i32 },

    /// Widget width or height is negative
    InvalidExtent { width: i32, height: i32 },

    /// Trace file is missing or unreadable
    TraceNotFound { path: String },

    /// Trace file contents could not be decoded
    TraceParse { reason: String },

    /// JNI handle does not refer to a live controller
    InvalidHandle { handle: i64 },

    /// Registry mutex was poisoned
    StatePoisoned,
}

impl ErrorCode for WidgetError {
    fn code(&self) -> i32 {
        match self {
            WidgetError::InvalidScreenSize { .. } => WidgetErrorCodes::INVALID_SCREEN_SIZE,
            WidgetError::InvalidExtent { .. } => WidgetErrorCodes::INVALID_EXTENT,
            WidgetError::TraceNotFound { .. } => WidgetErrorCodes::TRACE_NOT_FOUND,
            WidgetError::TraceParse { .. } => WidgetErrorCodes::TRACE_PARSE,
            WidgetError::InvalidHandle { .. } => WidgetErrorCodes::INVALID_HANDLE,
            WidgetError::StatePoisoned => WidgetErrorCodes::STATE_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            WidgetError::InvalidScreenSize { width, height } => {
                format!("Screen size must be non-negative (got {}x{})", width, height)
            }
            WidgetError::InvalidExtent { width, height } => {
                format!("Widget extent must be non-negative (got {}x{})", width, height)
            }
            WidgetError::TraceNotFound { path } => format!("Trace not found: {}", path),
            WidgetError::TraceParse { reason } => format!("Invalid trace: {}", reason),
            WidgetError::InvalidHandle { handle } => {
                format!("No controller registered for handle {}", handle)
            }
            WidgetError::StatePoisoned => "Controller registry lock poisoned".to_string(),
        }
    }
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WidgetError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for WidgetError {}
