// Floating Widget Core - drag/tap handling for the overlay widget
// Pointer-event state machine with screen clamping, driven by the Android overlay service

// Module declarations
pub mod bridge;
pub mod config;
pub mod error;
pub mod replay;
pub mod telemetry;
pub mod widget;

#[cfg(target_os = "android")]
pub mod android;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::{ErrorCode, WidgetError};
pub use widget::{
    AffordanceSignal, DragWidgetController, GestureOutcome, GestureState, PointerAction,
    PointerEvent, Position, TouchPoint, WidgetBounds, WidgetHost,
};

/// Install the tracing subscriber for the current platform
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    install_subscriber();
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        fn install_subscriber() {
            use tracing_subscriber::layer::SubscriberExt;
            use tracing_subscriber::util::SubscriberInitExt;

            match tracing_android::layer("FloatingWidget") {
                Ok(layer) => {
                    let _ = tracing_subscriber::registry().with(layer).try_init();
                }
                Err(err) => eprintln!("FloatingWidget: failed to open Android log: {err}"),
            }
        }
    } else {
        fn install_subscriber() {
            let filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
