//! Configuration management for the floating widget
//!
//! This module provides runtime configuration loading from JSON files so the
//! tap tolerance, default display geometry and telemetry sizing can be tuned
//! without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::WidgetError;
use crate::widget::{ScreenSize, WidgetBounds, WidgetExtent, CLICK_DRAG_TOLERANCE};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Tap/drag disambiguation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Maximum per-axis displacement (exclusive) for a release to count as a tap
    pub click_drag_tolerance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            // Fingers rarely lift exactly where they landed
            click_drag_tolerance: CLICK_DRAG_TOLERANCE,
        }
    }
}

/// Display geometry used when the host does not report one (CLI, desktop)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// Size of the end-affordance visual the clamp limits derive from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 160,
        }
    }
}

/// Telemetry hub sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
    /// Number of events retained for snapshots
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_capacity: 128,
        }
    }
}

impl AppConfig {
    /// Bounds for the configured display and widget sizes
    pub fn bounds(&self) -> Result<WidgetBounds, WidgetError> {
        WidgetBounds::new(
            ScreenSize {
                width: self.display.width,
                height: self.display.height,
            },
            WidgetExtent {
                width: self.widget.width,
                height: self.widget.height,
            },
        )
    }

    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Configuration on Android
    ///
    /// Display and widget sizes come from the host at controller creation,
    /// so only the defaults are needed here.
    #[cfg(target_os = "android")]
    pub fn load_android() -> Self {
        log::info!("[Config] Using default configuration on Android");
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/widget_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.gesture.click_drag_tolerance, 10.0);
        assert_eq!(config.display.width, 1080);
        assert_eq!(config.widget.width, 160);
        assert_eq!(config.telemetry.history_capacity, 128);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "gesture": { "click_drag_tolerance": 24.0 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.gesture.click_drag_tolerance, 24.0);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_file("does/not/exist/widget_config.json");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    #[cfg(not(target_os = "android"))]
    fn test_load_reads_bundled_asset() {
        // cargo runs unit tests from the package root
        let config = AppConfig::load();
        assert_eq!(config.telemetry.history_capacity, 64);
        assert_eq!(config.gesture.click_drag_tolerance, 10.0);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.widget.width, 160);
    }

    #[test]
    fn test_bounds_from_config() {
        let bounds = AppConfig::default().bounds().unwrap();
        assert_eq!(bounds.negative_limit(), 40);
        assert_eq!(bounds.positive_limit(), 120);
    }

    #[test]
    fn test_bounds_rejects_negative_display() {
        let mut config = AppConfig::default();
        config.display.width = -1;
        assert!(matches!(
            config.bounds(),
            Err(WidgetError::InvalidScreenSize { .. })
        ));
    }
}
