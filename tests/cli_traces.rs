use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_widget_cli"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn trace_file(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("traces")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn replay_trace_succeeds() {
    let output = cli()
        .args(["replay", "--trace", "clamp_left"])
        .output()
        .expect("failed to run widget_cli replay");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("replay report JSON payload");
    assert_eq!(json["trace"], "clamp_left");
    assert_eq!(json["event_count"], 3);
    assert_eq!(json["final_position"]["x"], -25);
    assert_eq!(json["final_position"]["y"], 500);
    assert_eq!(json["taps"], 0);
}

#[test]
fn replay_trace_detects_mismatch() {
    let output = cli()
        .args([
            "replay",
            "--trace",
            "tap",
            "--expect",
            &trace_file("tap_incorrect.expect.json"),
        ])
        .output()
        .expect("failed to run mismatch replay");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(
        stderr.contains("\"failures\""),
        "expected diff JSON in stderr, got {stderr}"
    );
}

#[test]
fn replay_missing_trace_fails() {
    let output = cli()
        .args(["replay", "--trace", "does_not_exist"])
        .output()
        .expect("failed to run replay");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn clamp_reports_limits() {
    let output = cli()
        .args(["clamp", "--x=-500", "--y=5000"])
        .output()
        .expect("failed to run clamp");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("clamp JSON payload");
    // Default config: 1080x1920 display, 160px widget
    assert_eq!(json["negative_limit"], 40);
    assert_eq!(json["positive_limit"], 120);
    assert_eq!(json["clamped"]["x"], -40);
    assert_eq!(json["clamped"]["y"], 1800);
}

#[test]
fn dump_traces_lists_assets() {
    let output = cli()
        .arg("dump-traces")
        .output()
        .expect("failed to run dump-traces");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(
        stdout.contains("clamp_left"),
        "expected trace listing, got {stdout}"
    );
    assert!(!stdout.contains("tap_incorrect"));
}

#[test]
fn bundled_traces_found_from_any_working_dir() {
    let output = Command::new(env!("CARGO_BIN_EXE_widget_cli"))
        .current_dir(std::env::temp_dir())
        .args(["replay", "--trace", "clamp_left"])
        .output()
        .expect("failed to run replay");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );
}

#[test]
fn print_config_is_json() {
    let output = cli()
        .arg("print-config")
        .output()
        .expect("failed to run print-config");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("config JSON");
    assert_eq!(json["gesture"]["click_drag_tolerance"], 10.0);
    // Picked up from assets/widget_config.json
    assert_eq!(json["telemetry"]["history_capacity"], 64);
}

#[test]
fn config_flag_overrides_asset() {
    let path = std::env::temp_dir().join(format!("widget_cli_config_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "gesture": { "click_drag_tolerance": 30.0 }, "widget": { "width": 200, "height": 200 } }"#,
    )
    .expect("write temp config");

    let output = cli()
        .arg("--config")
        .arg(&path)
        .arg("print-config")
        .output()
        .expect("failed to run print-config");
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("config JSON");
    assert_eq!(json["gesture"]["click_drag_tolerance"], 30.0);
    assert_eq!(json["widget"]["width"], 200);
    assert_eq!(json["display"]["height"], 1920);
    assert_eq!(json["telemetry"]["history_capacity"], 128);
}

#[test]
fn missing_asset_falls_back_to_defaults() {
    let output = Command::new(env!("CARGO_BIN_EXE_widget_cli"))
        .current_dir(std::env::temp_dir())
        .arg("print-config")
        .output()
        .expect("failed to run print-config");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("config JSON");
    assert_eq!(json["telemetry"]["history_capacity"], 128);
}
