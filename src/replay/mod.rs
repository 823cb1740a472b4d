//! Gesture trace replay for the diagnostics CLI and regression tests.
//!
//! A trace is a JSON recording of display geometry, the widget's starting
//! position and a pointer event stream. Traces live under `traces/` next to
//! optional `<name>.expect.json` files describing the outcomes a correct
//! controller produces. Replay runs the real controller against a
//! [`RecordingHost`] so every host callback can be inspected.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;
use crate::error::WidgetError;
use crate::widget::{
    DragWidgetController, GestureOutcome, GestureState, HostCall, PointerEvent, Position,
    RecordingHost, ScreenSize, WidgetBounds, WidgetExtent,
};

/// Default location for bundled gesture traces.
pub const DEFAULT_TRACE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/traces");

const EXPECT_SUFFIX: &str = ".expect.json";

/// Recorded gesture stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureTrace {
    pub screen: ScreenSize,
    pub extent: WidgetExtent,
    /// Widget offset before the first event
    #[serde(default)]
    pub initial_position: Position,
    /// Overrides the configured tap tolerance for this trace
    #[serde(default)]
    pub click_drag_tolerance: Option<f32>,
    pub events: Vec<PointerEvent>,
}

impl GestureTrace {
    pub fn bounds(&self) -> Result<WidgetBounds, WidgetError> {
        WidgetBounds::new(self.screen, self.extent)
    }
}

/// Metadata describing an available trace.
#[derive(Clone, Debug)]
pub struct TraceMetadata {
    pub name: String,
    pub path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Loaded trace plus optional expectations.
pub struct TraceData {
    pub metadata: TraceMetadata,
    pub trace: GestureTrace,
    pub expectations: Option<TraceExpectations>,
}

/// One replayed event and what it caused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayStep {
    pub index: usize,
    pub event: PointerEvent,
    pub outcome: GestureOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_calls: Vec<HostCall>,
}

/// Result of running a trace through the controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub final_state: GestureState,
    pub final_position: Option<Position>,
    pub taps: usize,
}

impl ReplayReport {
    pub fn outcomes(&self) -> Vec<GestureOutcome> {
        self.steps.iter().map(|step| step.outcome).collect()
    }
}

/// JSON expectation schema for trace verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceExpectations {
    #[serde(default)]
    pub notes: Option<String>,
    /// Per-event outcomes, in order
    #[serde(default)]
    pub outcomes: Option<Vec<GestureOutcome>>,
    #[serde(default)]
    pub final_position: Option<Position>,
    #[serde(default)]
    pub taps: Option<usize>,
}

impl TraceExpectations {
    pub fn verify(&self, actual: &ReplayReport) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        if let Some(expected) = &self.outcomes {
            let actual_outcomes = actual.outcomes();
            let longest = expected.len().max(actual_outcomes.len());
            for idx in 0..longest {
                let want = expected.get(idx);
                let got = actual_outcomes.get(idx);
                if want != got {
                    failures.push(ExpectationFailure {
                        field: "outcome".to_string(),
                        index: Some(idx),
                        expected: serde_json::to_value(want).unwrap_or_default(),
                        actual: serde_json::to_value(got).unwrap_or_default(),
                    });
                }
            }
        }

        if let Some(position) = self.final_position {
            if actual.final_position != Some(position) {
                failures.push(ExpectationFailure {
                    field: "final_position".to_string(),
                    index: None,
                    expected: serde_json::to_value(position).unwrap_or_default(),
                    actual: serde_json::to_value(actual.final_position).unwrap_or_default(),
                });
            }
        }

        if let Some(taps) = self.taps {
            if actual.taps != taps {
                failures.push(ExpectationFailure {
                    field: "taps".to_string(),
                    index: None,
                    expected: taps.into(),
                    actual: actual.taps.into(),
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing a replay with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "field": failure.field,
                    "index": failure.index,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Single mismatch between expectation and replay.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub field: String,
    pub index: Option<usize>,
    pub expected: serde_json::Value,
    pub actual: serde_json::Value,
}

/// Catalog responsible for discovering traces on disk.
pub struct TraceCatalog {
    root: PathBuf,
}

impl TraceCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all traces by their metadata.
    pub fn discover(&self) -> Result<Vec<TraceMetadata>> {
        let mut traces = Vec::new();
        if !self.root.exists() {
            return Ok(traces);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_trace = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.ends_with(".json") && !name.ends_with(EXPECT_SUFFIX))
                .unwrap_or(false);
            if is_trace {
                traces.push(self.metadata_for_path(&path)?);
            }
        }

        traces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(traces)
    }

    /// Load a trace and its expectations by name or path.
    pub fn load(&self, trace: &str, override_expect: Option<PathBuf>) -> Result<TraceData> {
        let path = self.resolve_trace_path(trace)?;
        let metadata = self.metadata_for_path(&path)?;

        let json = fs::read_to_string(&path).map_err(|_| WidgetError::TraceNotFound {
            path: path.display().to_string(),
        })?;
        let parsed: GestureTrace =
            serde_json::from_str(&json).map_err(|err| WidgetError::TraceParse {
                reason: format!("{}: {}", path.display(), err),
            })?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading expectation {}", path.display()))?;
                Some(
                    serde_json::from_str(&json)
                        .with_context(|| format!("parsing {}", path.display()))?,
                )
            }
            None => None,
        };

        Ok(TraceData {
            metadata,
            trace: parsed,
            expectations,
        })
    }

    fn resolve_trace_path(&self, trace: &str) -> Result<PathBuf> {
        let as_path = Path::new(trace);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{trace}.json"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(WidgetError::TraceNotFound {
                path: format!("{trace} (searched {})", self.root.display()),
            }
            .into())
        }
    }

    fn metadata_for_path(&self, path: &Path) -> Result<TraceMetadata> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid trace name for {}", path.display()))?
            .to_string();
        let expect_path = path.with_file_name(format!("{name}{EXPECT_SUFFIX}"));
        Ok(TraceMetadata {
            name,
            path: path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for TraceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_ROOT)
    }
}

/// Runs traces through a fresh controller each time.
pub struct TraceRunner {
    gesture: GestureConfig,
}

impl TraceRunner {
    pub fn new(gesture: GestureConfig) -> Self {
        Self { gesture }
    }

    pub fn run(&self, trace: &GestureTrace) -> Result<ReplayReport, WidgetError> {
        let bounds = trace.bounds()?;
        let mut controller =
            DragWidgetController::with_config(bounds, &self.gesture, RecordingHost::new())
                .with_initial_position(trace.initial_position);
        if let Some(tolerance) = trace.click_drag_tolerance {
            controller = controller.with_tolerance(tolerance);
        }

        let mut steps = Vec::with_capacity(trace.events.len());
        let mut taps = 0;
        for (index, event) in trace.events.iter().enumerate() {
            let outcome = controller.dispatch(*event);
            if outcome == GestureOutcome::Tap {
                taps += 1;
            }
            steps.push(ReplayStep {
                index,
                event: *event,
                outcome,
                host_calls: controller.host_mut().take_calls(),
            });
        }

        log::info!(
            "[Replay] {} events replayed, {} taps, final position {:?}",
            steps.len(),
            taps,
            controller.last_position()
        );

        Ok(ReplayReport {
            steps,
            final_state: controller.state(),
            final_position: controller.last_position(),
            taps,
        })
    }
}

impl Default for TraceRunner {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
