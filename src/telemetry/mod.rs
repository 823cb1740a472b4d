//! Gesture telemetry collector and helpers.
//!
//! The collector multiplexes tap, drag, clamp and lifecycle events into a
//! bounded history plus a broadcast stream, and keeps running tallies
//! for quick reporting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::OnceCell;
use tokio::sync::broadcast;

use crate::config::TelemetryConfig;
use crate::widget::{PointerAction, Position};

pub mod events;

pub use events::{LifecyclePhase, MetricEvent};

/// Global telemetry hub shared across the crate.
static HUB: OnceCell<TelemetryHub> = OnceCell::new();

/// Access the global telemetry hub, creating it with defaults on first use.
pub fn hub() -> &'static TelemetryHub {
    HUB.get_or_init(TelemetryHub::default)
}

/// Size the global hub from config.
///
/// Returns `false` if the hub was already in use; the existing hub is kept.
pub fn init_hub(config: &TelemetryConfig) -> bool {
    HUB.set(TelemetryHub::from_config(config)).is_ok()
}

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity > 0 {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        } else {
            self.dropped_history.fetch_add(1, Ordering::Relaxed);
        }

        // No subscribers is not an error.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

/// Running gesture tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GestureCounts {
    pub taps: u64,
    pub drags: u64,
    pub clamps: u64,
    pub ignored: u64,
}

/// Top-level hub wrapping the collector plus gesture counters.
pub struct TelemetryHub {
    collector: TelemetryCollector,
    taps: AtomicU64,
    drags: AtomicU64,
    clamps: AtomicU64,
    ignored: AtomicU64,
}

impl TelemetryHub {
    pub fn new(channel_capacity: usize, history_capacity: usize) -> Self {
        Self {
            collector: TelemetryCollector::new(channel_capacity, history_capacity),
            taps: AtomicU64::new(0),
            drags: AtomicU64::new(0),
            clamps: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.channel_capacity, config.history_capacity)
    }

    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.collector.snapshot()
    }

    pub fn counts(&self) -> GestureCounts {
        GestureCounts {
            taps: self.taps.load(Ordering::Relaxed),
            drags: self.drags.load(Ordering::Relaxed),
            clamps: self.clamps.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
        }
    }

    pub fn record_tap(&self, position: Position) {
        self.taps.fetch_add(1, Ordering::Relaxed);
        self.collector.publish(MetricEvent::Tap { position });
    }

    pub fn record_drag_end(&self, origin: Position, position: Position) {
        self.drags.fetch_add(1, Ordering::Relaxed);
        let dx = (position.x as f32) - (origin.x as f32);
        let dy = (position.y as f32) - (origin.y as f32);
        self.collector.publish(MetricEvent::DragEnd {
            origin,
            position,
            distance_px: (dx * dx + dy * dy).sqrt(),
        });
    }

    pub fn record_clamp(&self, requested: Position, applied: Position) {
        self.clamps.fetch_add(1, Ordering::Relaxed);
        self.collector
            .publish(MetricEvent::PositionClamped { requested, applied });
    }

    pub fn record_ignored(&self, action: PointerAction) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
        self.collector.publish(MetricEvent::EventIgnored { action });
    }

    pub fn record_lifecycle(&self, phase: LifecyclePhase) {
        self.collector.publish(MetricEvent::Lifecycle {
            phase,
            timestamp_ms: now_ms(),
        });
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
