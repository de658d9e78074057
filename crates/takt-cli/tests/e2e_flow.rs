//! End-to-end tests driving the `takt` binary against a temporary log.
//!
//! Tests the full pipeline: check → cat → summaries.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn takt_binary() -> String {
    env!("CARGO_BIN_EXE_takt").to_string()
}

/// Runs takt with `HOME` inside `temp` and the log at `temp/takt.csv`.
fn takt(temp: &Path, args: &[&str]) -> Output {
    Command::new(takt_binary())
        .env("HOME", temp)
        .env("TAKT_FILE", log_path(temp))
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run takt")
}

fn log_path(temp: &Path) -> PathBuf {
    temp.join("takt.csv")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "takt should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_check_in_and_out_then_day_summary() {
    let temp = TempDir::new().unwrap();

    let first = stdout_of(&takt(
        temp.path(),
        &["check", "kickoff", "--at", "2024-01-02T08:00:00+00:00"],
    ));
    assert_eq!(first, "Check in at 2024-01-02T08:00:00+00:00\n");

    let second = stdout_of(&takt(
        temp.path(),
        &["c", "--at", "2024-01-02T12:30:00+00:00"],
    ));
    assert_eq!(second, "Check out at 2024-01-02T12:30:00+00:00\n");

    let content = std::fs::read_to_string(log_path(temp.path())).unwrap();
    assert_eq!(
        content,
        "timestamp,kind,notes\n\
         2024-01-02T12:30:00+00:00,out,\n\
         2024-01-02T08:00:00+00:00,in,kickoff\n"
    );

    let day = stdout_of(&takt(temp.path(), &["day"]));
    assert_eq!(
        day,
        "Date      Total\tDays\t   Avg\n\
         2024-01-02  4h30m\t   1\t 4h30m\n"
    );
}

#[test]
fn test_cat_lists_records() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        log_path(temp.path()),
        "timestamp,kind,notes\n\
         2024-01-02T12:00:00+00:00,out,\n\
         2024-01-02T08:00:00+00:00,in,start\n",
    )
    .unwrap();

    let output = stdout_of(&takt(temp.path(), &["display", "1"]));
    assert_eq!(
        output,
        "timestamp                 kind  notes\n\
         2024-01-02T12:00:00+00:00 out\n"
    );
}

#[test]
fn test_week_summary_over_existing_log() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        log_path(temp.path()),
        "timestamp,kind,notes\n\
         2024-01-09T17:00:00+00:00,out,\n\
         2024-01-09T09:00:00+00:00,in,planning\n\
         2024-01-02T12:30:00+00:00,out,\n\
         2024-01-02T08:00:00+00:00,in,kickoff\n\
         2024-01-01T10:00:00+00:00,out,\n\
         2024-01-01T09:00:00+00:00,in,\n",
    )
    .unwrap();

    let output = stdout_of(&takt(temp.path(), &["week"]));
    assert_eq!(
        output,
        "Date          Total\tDays\t   Avg\n\
         2024-W02      8h00m\t   1\t 8h00m\n\
         2024-W01      5h30m\t   2\t 2h45m\n"
    );

    let json = stdout_of(&takt(temp.path(), &["summary", "--by", "ytd", "--json"]));
    let json: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(json["period"], "year");
    assert_eq!(json["inferred_close"], false);
    assert_eq!(json["buckets"][0]["label"], "2024");
    assert_eq!(json["buckets"][0]["total"], "13h30m");
}

#[test]
fn test_unknown_period_is_rejected() {
    let temp = TempDir::new().unwrap();

    let output = takt(temp.path(), &["summary", "--by", "fortnight"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported period: fortnight"), "{stderr}");
}

#[test]
fn test_summary_of_empty_log_fails() {
    let temp = TempDir::new().unwrap();

    let output = takt(temp.path(), &["month"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no records to process"), "{stderr}");
}
