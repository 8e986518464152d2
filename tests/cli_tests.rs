//! Integration tests for the neardup CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Test helper to get the CLI binary
fn neardup_cmd() -> Command {
    Command::cargo_bin("neardup").unwrap()
}

const IDENTICAL_PAIR: &str = "3\na b c\na b c\nx y z\n1\n0 0\n";

#[test]
fn cli_help_command() {
    let mut cmd = neardup_cmd();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SimHash"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("fingerprint"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn cli_version_command() {
    let mut cmd = neardup_cmd();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_reads_stdin() {
    let mut cmd = neardup_cmd();
    cmd.arg("run").write_stdin(IDENTICAL_PAIR);

    cmd.assert().success().stdout("1\n");
}

#[test]
fn run_reads_input_file() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("workload.txt");
    fs::write(&input, "2\nsame words\nsame words\n2\n0 0\n1 128\n").unwrap();

    let mut cmd = neardup_cmd();
    cmd.args(["run", "--input"]).arg(&input);

    cmd.assert().success().stdout("1\n1\n");
}

#[test]
fn run_exhaustive_matches_banded_on_identical_documents() {
    let mut cmd = neardup_cmd();
    cmd.args(["run", "--exhaustive"]).write_stdin(IDENTICAL_PAIR);

    cmd.assert().success().stdout("1\n");
}

#[test]
fn run_json_output() {
    let mut cmd = neardup_cmd();
    cmd.args(["run", "--format", "json"]).write_stdin(IDENTICAL_PAIR);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json[0]["doc_id"], 0);
    assert_eq!(json[0]["threshold"], 0);
    assert_eq!(json[0]["count"], 1);
}

#[test]
fn run_rejects_band_count_that_does_not_divide_width() {
    let mut cmd = neardup_cmd();
    cmd.args(["run", "--bands", "5"]).write_stdin(IDENTICAL_PAIR);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("divide"));
}

#[test]
fn run_accepts_any_divisor_band_count() {
    for bands in ["1", "2", "16", "128"] {
        let mut cmd = neardup_cmd();
        cmd.args(["run", "--bands", bands]).write_stdin(IDENTICAL_PAIR);
        cmd.assert().success().stdout("1\n");
    }
}

#[test]
fn run_rejects_out_of_range_document() {
    let mut cmd = neardup_cmd();
    cmd.arg("run").write_stdin("1\nonly\n1\n3 0\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn run_rejects_negative_document() {
    let mut cmd = neardup_cmd();
    cmd.arg("run").write_stdin("1\nonly\n1\n-1 0\n");

    cmd.assert().failure();
}

#[test]
fn run_rejects_malformed_workload() {
    let mut cmd = neardup_cmd();
    cmd.arg("run").write_stdin("three\n");

    cmd.assert().failure();
}

#[test]
fn run_nonexistent_input() {
    let mut cmd = neardup_cmd();
    cmd.args(["run", "--input", "/nonexistent/workload.txt"]);

    cmd.assert().failure();
}

#[test]
fn fingerprint_prints_hex_per_document() {
    let mut cmd = neardup_cmd();
    cmd.arg("fingerprint").write_stdin("2\n\na b\n");

    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "ffffffffffffffffffffffffffffffff");
    assert_eq!(lines[1].len(), 32);
}

#[test]
fn print_default_config_round_trips() {
    let mut cmd = neardup_cmd();
    cmd.arg("print-default-config");

    let output = cmd.assert().success().get_output().stdout.clone();
    let config: neardup_rs::NeardupConfig = serde_yaml::from_slice(&output).unwrap();
    assert_eq!(config, neardup_rs::NeardupConfig::default());
}

#[test]
fn validate_config_accepts_valid_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("neardup.yml");
    fs::write(&config_path, "lsh:\n  num_bands: 16\n").unwrap();

    let mut cmd = neardup_cmd();
    cmd.args(["validate-config", "--config"]).arg(&config_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("16 x 8 bits"));
}

#[test]
fn validate_config_rejects_invalid_band_count() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("neardup.yml");
    fs::write(&config_path, "lsh:\n  num_bands: 3\n").unwrap();

    let mut cmd = neardup_cmd();
    cmd.args(["validate-config", "--config"]).arg(&config_path);

    cmd.assert().failure();
}

#[test]
fn run_uses_config_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("neardup.yml");
    fs::write(
        &config_path,
        "fingerprint:\n  hasher: blake3\nlsh:\n  strategy: exhaustive\n",
    )
    .unwrap();

    let mut cmd = neardup_cmd();
    cmd.args(["run", "--config"])
        .arg(&config_path)
        .write_stdin(IDENTICAL_PAIR);

    cmd.assert().success().stdout("1\n");
}
