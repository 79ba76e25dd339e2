use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};

// Port 1 is never serving; connection attempts fail immediately, which keeps
// these tests offline and fast.
const UNREACHABLE_HOST: &str = "http://127.0.0.1:1";

fn brief_cmd(tmp: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("brief");
    cmd.current_dir(tmp.path())
        .env("BRIEF_CONFIG_PATH", tmp.path().join("no-config.toml"))
        .env("BRIEF_LOCK_PATH", tmp.path().join("brief.lock"));
    cmd
}

#[test]
fn dry_run_plans_summaries_without_writing_anything() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("docs");
    fs::create_dir_all(&root).expect("mkdir docs");
    fs::write(root.join("report.md"), "# Title\n\nSome body text.\n").expect("write report");

    brief_cmd(&tmp)
        .arg("run")
        .arg(&root)
        .arg("--dry-run")
        .arg("--host")
        .arg(UNREACHABLE_HOST)
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY  report.md"))
        .stdout(predicate::str::contains("report_summary.md"));

    assert!(!root.join("report_summary.md").exists());
}

#[test]
fn existing_summaries_are_skipped_without_oracle_traffic() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("docs");
    fs::create_dir_all(&root).expect("mkdir docs");
    fs::write(root.join("doc.md"), "content").expect("write doc");
    fs::write(root.join("doc_summary.md"), "already summarized\n").expect("write summary");

    brief_cmd(&tmp)
        .arg("run")
        .arg(&root)
        .arg("--host")
        .arg(UNREACHABLE_HOST)
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIP doc.md (summary exists)"));

    assert_eq!(
        fs::read_to_string(root.join("doc_summary.md")).expect("read summary"),
        "already summarized\n"
    );
}

#[test]
fn unreachable_oracle_fails_the_document_and_the_exit_status() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("docs");
    fs::create_dir_all(&root).expect("mkdir docs");
    fs::write(root.join("doc.md"), "some content to summarize").expect("write doc");

    brief_cmd(&tmp)
        .arg("run")
        .arg(&root)
        .arg("--host")
        .arg(UNREACHABLE_HOST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERR  doc.md"))
        .stderr(predicate::str::contains("document(s) failed"));

    assert!(!root.join("doc_summary.md").exists());
}

#[test]
fn excluded_paths_are_left_out_of_the_plan() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("docs");
    fs::create_dir_all(root.join("skipme")).expect("mkdir skipme");
    fs::write(root.join("keep.md"), "keep me").expect("write keep");
    fs::write(root.join("skipme/inner.md"), "skip me").expect("write inner");

    brief_cmd(&tmp)
        .arg("run")
        .arg(&root)
        .arg("--dry-run")
        .arg("--exclude")
        .arg("skipme")
        .arg("--host")
        .arg(UNREACHABLE_HOST)
        .assert()
        .success()
        .stdout(predicate::str::contains("keep.md"))
        .stdout(predicate::str::contains("inner.md").not());
}

#[test]
fn quiet_mode_suppresses_progress_lines() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().join("docs");
    fs::create_dir_all(&root).expect("mkdir docs");
    fs::write(root.join("report.md"), "body").expect("write report");

    brief_cmd(&tmp)
        .arg("run")
        .arg(&root)
        .arg("--dry-run")
        .arg("--quiet")
        .arg("--host")
        .arg(UNREACHABLE_HOST)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_root_is_a_usage_error() {
    let tmp = tempdir().expect("tempdir");

    brief_cmd(&tmp)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("root path must be specified"));
}
