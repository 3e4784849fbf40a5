//! Runs the `metric-center` binary end to end

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn points_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn metric_center(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_metric-center"))
        .args(args)
        .env_remove("METRIC_CENTER_UNITS")
        .env_remove("METRIC_CENTER_LANES")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn prints_index_coordinates_and_radius() {
    let file = points_file("0 0\n1 0\n0 1\n");
    let output = metric_center(&[file.path().to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "0 (0.0000,0.0000)\n1.0000\n");
}

#[test]
fn json_format() {
    let file = points_file("2 2 5 6");
    let output = metric_center(&["--format", "json", "-u", "1", "-l", "4", file.path().to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), r#"{"index":0,"x":2.0,"y":2.0,"radius":5.0}"#);
}

#[test]
fn missing_argument_is_a_usage_error() {
    let output = metric_center(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert_eq!(stderr(&output).lines().count(), 1);
}

#[test]
fn unreadable_file_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let output = metric_center(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("nope.txt"));
}

#[test]
fn odd_token_count_fails_without_output() {
    let file = points_file("0.0 1.0 2.0");
    let output = metric_center(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("malformed input"));
}

#[test]
fn single_point_fails_without_output() {
    let file = points_file("3 4\n");
    let output = metric_center(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("at least 2 points"));
}

#[test]
fn oversized_grid_is_a_one_line_configuration_error() {
    let file = points_file("0 0\n1 0\n0 1\n");
    let output = metric_center(&["--units", "4000000000", file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert_eq!(stderr(&output).lines().count(), 1);
    assert!(stderr(&output).contains("4000000000 units"));
}

#[test]
fn invalid_utf8_is_malformed_input() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"0 0\n1 \xff\n").unwrap();
    let output = metric_center(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 2"), "stderr: {}", stderr(&output));
}
