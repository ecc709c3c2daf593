use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("bakehouse");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("bakehouse"))
        .stdout(contains("--demo"))
        .stdout(contains("--api-url"));
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = cargo::cargo_bin_cmd!("bakehouse");
    cmd.args(["--config", "/nonexistent/bakehouse.toml"])
        .assert()
        .failure()
        .stderr(contains("failed to read"));
}
