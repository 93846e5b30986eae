//! Tests that drive the compiled `xcomp` binary and check stdout and the
//! exit status.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;
use xcomp::digest::digest_bytes;

fn xcomp(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xcomp"))
        .args(args)
        .output()
        .expect("failed to run xcomp")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout not utf-8")
}

#[test]
fn redundant_files_exit_zero() {
    let dir = tempdir().unwrap();
    let one = dir.path().join("one");
    let two = dir.path().join("two");
    fs::write(&one, "hello").unwrap();
    fs::write(&two, "hello").unwrap();

    let output = xcomp(&[&one, &two]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).ends_with("=input files are redundant\n"));
}

#[test]
fn different_files_exit_one() {
    let dir = tempdir().unwrap();
    let one = dir.path().join("one");
    let two = dir.path().join("two");
    fs::write(&one, "hello").unwrap();
    fs::write(&two, "world").unwrap();

    let output = xcomp(&[&one, &two]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("<{}", digest_bytes(b"hello"))));
    assert!(lines[1].starts_with(&format!(">{}", digest_bytes(b"world"))));
}

#[test]
fn missing_path_exits_one_with_diagnostic() {
    let dir = tempdir().unwrap();
    let absent = dir.path().join("absent");
    let output = xcomp(&[&absent, dir.path()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xcomp: the path"));
    assert!(stderr.contains("doesn't exist"));
}

#[test]
fn recursive_flag_and_cache_file_are_accepted() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::create_dir(left.path().join("sub")).unwrap();
    fs::write(left.path().join("sub").join("a"), "x").unwrap();
    fs::write(right.path().join("b"), "x").unwrap();

    let cache_dir = tempdir().unwrap();
    let cache = cache_dir.path().join("hashes.txt");
    fs::write(
        &cache,
        format!("{} '{}'\n", digest_bytes(b"x"), right.path().join("b").display()),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_xcomp"))
        .arg(left.path())
        .arg(right.path())
        .arg("--recursive")
        .arg("--cache_file")
        .arg(&cache)
        .arg("--verbose")
        .output()
        .expect("failed to run xcomp");

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("' cached\n"));
    assert!(text.ends_with("=input directories are redundant\n"));
}

#[test]
fn json_format_reports_outcome() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::write(left.path().join("a"), "x").unwrap();
    fs::write(right.path().join("b"), "y").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_xcomp"))
        .arg(left.path())
        .arg(right.path())
        .args(["--format", "json"])
        .output()
        .expect("failed to run xcomp");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid json");
    assert_eq!(value["mode"], "directories");
    assert_eq!(value["outcome"], "not_redundant");
    assert_eq!(value["findings"].as_array().map(Vec::len), Some(2));
}

#[test]
fn config_file_enables_recursion() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::create_dir(left.path().join("sub")).unwrap();
    fs::write(left.path().join("sub").join("a"), "only left").unwrap();

    let config_dir = tempdir().unwrap();
    let config = config_dir.path().join("xcomp.toml");
    fs::write(&config, "recursive = true\n").unwrap();

    let without = xcomp(&[left.path(), right.path()]);
    assert_eq!(without.status.code(), Some(0));

    let with = Command::new(env!("CARGO_BIN_EXE_xcomp"))
        .arg(left.path())
        .arg(right.path())
        .arg("--config")
        .arg(&config)
        .output()
        .expect("failed to run xcomp");
    assert_eq!(with.status.code(), Some(1));
    assert!(stdout(&with).starts_with('<'));
}

#[test]
fn setup_failures_keep_their_cause() {
    let dir = tempdir().unwrap();
    let log_file = dir.path().join("no-such-dir").join("xcomp.log");

    let output = Command::new(env!("CARGO_BIN_EXE_xcomp"))
        .arg(dir.path())
        .arg(dir.path())
        .arg("--log-file")
        .arg(&log_file)
        .output()
        .expect("failed to run xcomp");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create log file"));
    assert!(stderr.contains("(os error 2)"));
}

#[test]
fn cache_file_help_mentions_single_files() {
    let output = Command::new(env!("CARGO_BIN_EXE_xcomp"))
        .arg("--help")
        .output()
        .expect("failed to run xcomp");

    assert_eq!(output.status.code(), Some(0));
    let help = stdout(&output)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    assert!(help.contains("single files"));
}
