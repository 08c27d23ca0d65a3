//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn scte224_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_scte224"))
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path.to_string_lossy().into_owned()
}

// ============================================================================
// Convert Command Tests
// ============================================================================

#[test]
fn test_cli_convert_downgrade_audience() {
    let output = Command::new(scte224_bin())
        .args(["convert", "--to", "2015", &fixture("those_guys_2018.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "convert should succeed");
    assert_eq!(
        stdout.trim_end(),
        include_str!("fixtures/those_guys_2015.xml").trim_end()
    );
}

#[test]
fn test_cli_convert_report_lists_losses() {
    let output = Command::new(scte224_bin())
        .args([
            "convert",
            "--to", "2018",
            "--report",
            &fixture("viewing_policy_2020_allocation.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "convert --report should succeed");
    assert!(stderr.contains("2020 -> 2018: 1 dropped"), "should count losses: {}", stderr);
    assert!(stderr.contains("Allocation dropped from"), "should name the feature");
    assert!(!stdout.contains("Allocation"), "allocation should be stripped");
    assert!(stdout.contains("http://www.scte.org/schemas/224"));
}

#[test]
fn test_cli_convert_report_lossless_upgrade() {
    let output = Command::new(scte224_bin())
        .args(["convert", "--to", "2020", "--report", &fixture("cali_2015.xml")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "upgrade should succeed");
    assert!(stderr.contains("2015 -> 2020: lossless"));
}

#[test]
fn test_cli_convert_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("media_2015.xml");

    let output = Command::new(scte224_bin())
        .args([
            "convert",
            "--to", "2015",
            "--compact",
            "--output", target.to_str().unwrap(),
            &fixture("cali_2018.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "convert --output should succeed");
    assert!(output.stdout.is_empty(), "nothing should go to stdout");

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with(r#"<Media xmlns="http://www.scte.org/schemas/224/2015""#));
    assert!(!written.contains('\n'), "compact output has no line breaks");
}

#[test]
fn test_cli_convert_forced_source_revision() {
    let output = Command::new(scte224_bin())
        .args([
            "convert",
            "--from", "2018",
            "--to", "2020",
            &fixture("cali_2015.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "wrong source revision should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_cli_convert_rejects_unknown_revision() {
    let output = Command::new(scte224_bin())
        .args(["convert", "--to", "2016", &fixture("cali_2015.xml")])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "unknown revision should fail");
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let output = Command::new(scte224_bin())
        .args(["inspect", &fixture("those_guys_2018.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("scte224 v"), "should show version");
    assert!(stdout.contains("schema:           2018"), "should show revision");
    assert!(stdout.contains("root:             Audience"), "should show root entity");
}

#[test]
fn test_cli_inspect_json_output() {
    let output = Command::new(scte224_bin())
        .args(["inspect", "--json", &fixture("media_2020.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect --json should succeed");

    let json: serde_json::Value = serde_json::from_str(&stdout)
        .expect("Output should be valid JSON");

    assert_eq!(json["schema"], "2020");
    assert!(json["root"]["Media"].is_object());
}

#[test]
fn test_cli_inspect_inline_document() {
    let output = Command::new(scte224_bin())
        .args([
            "inspect",
            r#"<Audience xmlns="http://www.scte.org/schemas/224/2015" id="inline"/>"#,
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inline document should be accepted");
    assert!(stdout.contains("schema:           2015"));
    assert!(stdout.contains("id:               inline"));
}

#[test]
fn test_cli_inspect_nonexistent_file() {
    let output = Command::new(scte224_bin())
        .args(["inspect", "/nonexistent/media.xml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "should fail for missing file");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "should report the error");
}

#[test]
fn test_cli_inspect_unknown_namespace() {
    let output = Command::new(scte224_bin())
        .args(["inspect", r#"<Media xmlns="urn:example"/>"#])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "unknown namespace should fail");
}

// ============================================================================
// Roundtrip Command Tests
// ============================================================================

#[test]
fn test_cli_roundtrip_fixtures() {
    for name in [
        "cali_2015.xml",
        "cali_2018.xml",
        "those_guys_2018.xml",
        "viewing_policy_2020_splice.xml",
        "media_2020.xml",
    ] {
        let output = Command::new(scte224_bin())
            .args(["roundtrip", &fixture(name)])
            .output()
            .expect("Failed to execute command");

        let stdout = String::from_utf8_lossy(&output.stdout);

        assert!(output.status.success(), "{} should round-trip: {}", name, stdout);
        assert!(stdout.contains("✓"), "{}", name);
    }
}

#[test]
fn test_cli_roundtrip_print() {
    let output = Command::new(scte224_bin())
        .args(["roundtrip", "--print", &fixture("those_guys_2015.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("<Audience"));
    assert!(stdout.contains("✓ 2015 Audience round-trips"));
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_cli_generate_schedule() {
    let output = Command::new(scte224_bin())
        .args([
            "generate",
            "--start", "2018-05-29T00:00:00Z",
            "--span", "PT2H",
            "--window", "PT30M",
            &fixture("media_template.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "generate should succeed");
    assert_eq!(stdout.matches("<MediaPoint ").count(), 8);
    assert!(stdout.contains(r#"expires="2018-05-29T02:00:00Z""#));
    assert!(stdout.contains("/start/0\""));
    assert!(stdout.contains("/end/3\""));
}

#[test]
fn test_cli_generate_2015_output() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("schedule.xml");

    let output = Command::new(scte224_bin())
        .args([
            "generate",
            "--start", "2018-05-29T00:00:00Z",
            "--span", "PT1H",
            "--to", "2015",
            "--output", target.to_str().unwrap(),
            &fixture("media_template.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "generate --to 2015 should succeed");

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("http://www.scte.org/schemas/224/2015"));
    assert_eq!(written.matches("<MediaPoint ").count(), 4);
}

#[test]
fn test_cli_generate_rejects_bad_window() {
    let output = Command::new(scte224_bin())
        .args([
            "generate",
            "--start", "2018-05-29T00:00:00Z",
            "--window", "thirty minutes",
            &fixture("media_template.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "malformed window should fail");
}

#[test]
fn test_cli_generate_rejects_oversized_schedule() {
    let output = Command::new(scte224_bin())
        .args([
            "generate",
            "--start", "2018-05-29T00:00:00Z",
            "--span", "P3650D",
            "--window", "PT1S",
            &fixture("media_template.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "oversized schedule should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "should report the error: {}", stderr);
    assert!(output.stdout.is_empty());
}

// ============================================================================
// Duration Command Tests
// ============================================================================

#[test]
fn test_cli_duration_decode() {
    let output = Command::new(scte224_bin())
        .args(["duration", "PT1M15S"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("seconds:   75"));
    assert!(stdout.contains("canonical: PT1M15S"));
}

#[test]
fn test_cli_duration_strict() {
    let lenient = Command::new(scte224_bin())
        .args(["duration", "1m15s"])
        .output()
        .expect("Failed to execute command");
    assert!(lenient.status.success(), "lenient decoding reads zero");
    assert!(String::from_utf8_lossy(&lenient.stdout).contains("seconds:   0"));

    let strict = Command::new(scte224_bin())
        .args(["duration", "--strict", "1m15s"])
        .output()
        .expect("Failed to execute command");
    assert!(!strict.status.success(), "strict decoding should fail");
}

// ============================================================================
// Version Tests
// ============================================================================

#[test]
fn test_cli_version() {
    let output = Command::new(scte224_bin())
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("scte224"));
}
