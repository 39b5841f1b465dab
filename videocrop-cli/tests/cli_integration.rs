use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn analyzer_cmd() -> Command {
    Command::cargo_bin("videocropanalyzer").expect("Failed to find videocropanalyzer binary")
}

#[test]
fn test_no_arguments_prints_usage() {
    analyzer_cmd()
        .assert()
        .success()
        .stdout("Usage: videocropanalyzer <video_file_path>\n");
}

#[test]
fn test_non_existent_input_reports_error_on_stdout() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.mkv");

    analyzer_cmd()
        .arg(&missing)
        .assert()
        .success()
        .stdout(contains("Error: Path error: Invalid input path"))
        .stdout(contains("{").not());

    Ok(())
}

#[test]
fn test_directory_input_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    analyzer_cmd()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("Error: Path error:").and(contains("is not a file")));

    Ok(())
}

#[test]
fn test_invalid_sample_count_is_an_argument_error() {
    analyzer_cmd()
        .args(["--samples", "0", "movie.mkv"])
        .assert()
        .failure()
        .stderr(contains("--samples"));
}

#[test]
fn test_unknown_failure_policy_is_rejected() {
    analyzer_cmd()
        .args(["--on-frame-error", "ignore", "movie.mkv"])
        .assert()
        .failure()
        .stderr(contains("possible values"));
}

#[test]
fn test_help_lists_options() {
    analyzer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--on-frame-error").and(contains("--samples")));
}
