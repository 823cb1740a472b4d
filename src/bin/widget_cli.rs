use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use floating_widget::config::AppConfig;
use floating_widget::replay::{ExpectationDiff, ReplayReport, TraceCatalog, TraceRunner};
use floating_widget::telemetry::{self, GestureCounts};
use floating_widget::widget::Position;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "widget_cli",
    about = "Gesture trace harness for the floating widget drag controller"
)]
struct Cli {
    /// Override directory containing gesture traces (defaults to the crate's bundled traces/)
    #[arg(long)]
    traces_dir: Option<PathBuf>,
    /// JSON config file (defaults to assets/widget_config.json, then built-in values)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and optionally compare against expectations
    Replay {
        #[arg(long)]
        trace: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clamp a position against the configured display and widget size
    Clamp {
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
    },
    /// List available traces on disk
    DumpTraces,
    /// Print the effective configuration
    PrintConfig,
}

fn main() -> ExitCode {
    floating_widget::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_else(AppConfig::load);
    telemetry::init_hub(&config.telemetry);

    let catalog = cli
        .traces_dir
        .map(TraceCatalog::new)
        .unwrap_or_else(TraceCatalog::default);

    match cli.command {
        Commands::Replay {
            trace,
            expect,
            output,
        } => run_replay(&catalog, &config, &trace, expect, output),
        Commands::Clamp { x, y } => run_clamp(&config, x, y),
        Commands::DumpTraces => run_dump(&catalog),
        Commands::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_replay(
    catalog: &TraceCatalog,
    config: &AppConfig,
    trace: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let data = catalog.load(trace, override_expect)?;
    let runner = TraceRunner::new(config.gesture.clone());
    let report = runner
        .run(&data.trace)
        .with_context(|| format!("replaying trace {}", data.metadata.name))?;

    emit_report(&data.metadata.name, &report, output_path)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&report) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_clamp(config: &AppConfig, x: i32, y: i32) -> Result<ExitCode> {
    let bounds = config.bounds()?;
    let requested = Position::new(x, y);
    let clamped = bounds.clamp(requested);
    let payload = ClampPayload {
        requested,
        clamped,
        negative_limit: bounds.negative_limit(),
        positive_limit: bounds.positive_limit(),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &TraceCatalog) -> Result<ExitCode> {
    let traces = catalog.discover()?;
    if traces.is_empty() {
        println!("No traces found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in traces {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(trace: &str, report: &ReplayReport, output_path: Option<PathBuf>) -> Result<()> {
    let payload = ReplayReportPayload {
        trace,
        event_count: report.steps.len(),
        report,
        telemetry: telemetry::hub().counts(),
    };
    let json = serde_json::to_string_pretty(&payload)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct ReplayReportPayload<'a> {
    trace: &'a str,
    event_count: usize,
    #[serde(flatten)]
    report: &'a ReplayReport,
    telemetry: GestureCounts,
}

#[derive(Serialize)]
struct ClampPayload {
    requested: Position,
    clamped: Position,
    negative_limit: i32,
    positive_limit: i32,
}
