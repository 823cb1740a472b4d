// Error types for the floating widget core
//
// The drag controller itself never fails; these errors cover the code around
// it (bounds construction, trace loading, the JNI handle registry) and carry
// numeric codes suitable for passing across the FFI boundary.

mod widget;

pub use widget::{log_widget_error, WidgetError, WidgetErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
