use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn models_command_reports_an_unreachable_host() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("brief")
        .current_dir(tmp.path())
        .env("BRIEF_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .arg("models")
        .arg("--host")
        .arg("http://127.0.0.1:1")
        .assert()
        .failure()
        .stdout(predicate::str::contains("host=http://127.0.0.1:1"))
        .stderr(predicate::str::contains("unable to query models"));
}

#[test]
fn version_flag_prints_the_package_version() {
    assert_cmd::cargo::cargo_bin_cmd!("brief")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
