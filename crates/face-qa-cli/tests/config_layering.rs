//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)]
#![allow(deprecated)]

mod common;

use common::{compliant, json_lines, Workspace};
use face_qa_test_support::FaceAttributesBuilder;
use predicates::prelude::*;

fn smiling() -> face_qa_core::FaceAttributes {
    FaceAttributesBuilder::compliant().smile(true, 85.0).build()
}

#[test]
fn test_project_config_applies_format() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[compliant()]);
    ws.project_config(
        r"
[output]
format = 'json'
",
    );

    ws.cmd()
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_cli_overrides_project_config() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[compliant()]);
    ws.project_config(
        r"
[output]
format = 'json'
",
    );

    ws.cmd()
        .arg("--format")
        .arg("jsonl")
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_project_thresholds_change_verdict() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[smiling()]);

    ws.cmd().arg(&photo).assert().code(1);

    ws.project_config(
        r"
[thresholds]
conf_smile = 90
",
    );
    ws.cmd().arg(&photo).assert().code(0);
}

#[test]
fn test_cli_set_overrides_project_thresholds() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[smiling()]);
    ws.project_config(
        r"
[thresholds]
conf_smile = 90
",
    );

    ws.cmd()
        .arg("--set")
        .arg("conf_smile=80")
        .arg(photo)
        .assert()
        .code(1);
}

#[test]
fn test_xdg_config_applies() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[smiling()]);
    ws.xdg_config(
        r"
[thresholds]
conf_smile = 90
",
    );

    ws.cmd().arg(photo).assert().code(0);
}

#[test]
fn test_project_config_overrides_xdg() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[smiling()]);
    ws.xdg_config(
        r"
[thresholds]
conf_smile = 90

[output]
format = 'json'
",
    );
    ws.project_config(
        r"
[thresholds]
conf_smile = 80
",
    );

    // Threshold comes from the project file, format still from XDG
    ws.cmd()
        .arg(photo)
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_config_recursive() {
    let ws = Workspace::new();
    ws.photo("nested/a.png", &[compliant()]);
    ws.project_config(
        r"
[general]
recursive = true
",
    );

    let output = ws.cmd().arg(ws.path()).assert().code(0);
    assert_eq!(json_lines(&output.get_output().stdout).len(), 1);
}

#[test]
fn test_config_responses_dir() {
    let ws = Workspace::new();
    let photo = ws.photo_without_response("photos/a.png");
    ws.write(
        "responses/a.png.json",
        &face_qa_test_support::provider_response_json(&[compliant()]),
    );
    ws.project_config(
        r"
[provider]
responses_dir = 'responses'
",
    );

    ws.cmd().arg(photo).assert().code(0);
}

#[test]
fn test_invalid_config_warns_and_continues() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[compliant()]);
    ws.project_config(
        r"
[thresholds]
min_brightnes = 60
",
    );

    ws.cmd()
        .arg(photo)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("warning: thresholds.min_brightnes"));
}

#[test]
fn test_unparseable_config_is_ignored() {
    let ws = Workspace::new();
    let photo = ws.photo("a.png", &[compliant()]);
    ws.project_config("[output\nformat = 'json'");

    ws.cmd()
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"))
        .stderr(predicate::str::contains("Failed to parse config file"));
}

// === Thresholds Subcommand ===

#[test]
fn test_thresholds_shows_layered_values() {
    let ws = Workspace::new();
    ws.xdg_config(
        r"
[thresholds]
min_brightness = 65
",
    );
    ws.project_config(
        r"
[thresholds]
min_sharpness = 55
",
    );

    ws.cmd()
        .arg("thresholds")
        .arg("--set")
        .arg("pose_max_pitchrollyaw=15")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[thresholds]"))
        .stdout(predicate::str::contains("min_brightness = 65\n"))
        .stdout(predicate::str::contains("min_sharpness = 55\n"))
        .stdout(predicate::str::contains("pose_max_pitchrollyaw = 15\n"))
        .stdout(predicate::str::contains("is_face_conf = 99.0\n"));
}

#[test]
fn test_thresholds_defaults_ignore_config() {
    let ws = Workspace::new();
    ws.project_config(
        r"
[thresholds]
min_brightness = 65
",
    );

    ws.cmd()
        .arg("thresholds")
        .arg("--defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("min_brightness = 70\n"))
        .stdout(predicate::str::contains("min_image_size = 55296\n"));
}
