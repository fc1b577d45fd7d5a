//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PROMPT: &str = "Write a short essay explaining the difference between a stack and a \
    queue. Include at least one example of each.";

const ESSAY: &str = "A stack is last in first out because elements are pushed and popped \
    at the same end. For example an undo history behaves like a stack. A queue is first in \
    first out, for example a line at a ticket office.";

fn gradewise() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("gradewise").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == ext))
        .collect()
}

#[test]
fn evaluate_without_peers() {
    let dir = TempDir::new().unwrap();
    let content = write(dir.path(), "essay.txt", ESSAY);
    let description = write(dir.path(), "prompt.txt", PROMPT);

    gradewise()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--content")
        .arg(&content)
        .arg("--description")
        .arg(&description)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plagiarism risk: 0% (0 peers)"))
        .stdout(predicate::str::contains("Score: "))
        .stdout(predicate::str::contains("Word count:"));
}

#[test]
fn evaluate_json_against_identical_peer() {
    let dir = TempDir::new().unwrap();
    let content = write(dir.path(), "essay.txt", ESSAY);
    let description = write(dir.path(), "prompt.txt", PROMPT);
    let peer = write(dir.path(), "peer.txt", ESSAY);

    let output = gradewise()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--content")
        .arg(&content)
        .arg("--description")
        .arg(&description)
        .arg("--peers")
        .arg(&peer)
        .arg("--max-score")
        .arg("20")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["plagiarism_risk"], "100%");
    assert!(json["score"].as_u64().unwrap() <= 20);
    assert!(json["feedback_detail"]
        .as_str()
        .unwrap()
        .ends_with("/20."));
}

#[test]
fn evaluate_reads_peer_directory() {
    let dir = TempDir::new().unwrap();
    let content = write(dir.path(), "essay.txt", ESSAY);
    let description = write(dir.path(), "prompt.txt", PROMPT);
    write(dir.path(), "peers/a.txt", "Graphs connect vertices with edges.");
    write(dir.path(), "peers/b.md", ESSAY);
    write(dir.path(), "peers/ignored.pdf", ESSAY);

    gradewise()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--content")
        .arg(&content)
        .arg("--description")
        .arg(&description)
        .arg("--peers")
        .arg(dir.path().join("peers"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Plagiarism risk: 100% (2 peers)"));
}

#[test]
fn evaluate_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let content = write(dir.path(), "essay.txt", ESSAY);
    let description = write(dir.path(), "prompt.txt", PROMPT);

    gradewise()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--content")
        .arg(&content)
        .arg("--description")
        .arg(&description)
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn evaluate_missing_content_file() {
    let dir = TempDir::new().unwrap();
    let description = write(dir.path(), "prompt.txt", PROMPT);

    gradewise()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--content")
        .arg("missing.txt")
        .arg("--description")
        .arg(&description)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradewise()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradewise.toml"))
        .stdout(predicate::str::contains("Created assignments/example.toml"));

    assert!(dir.path().join("gradewise.toml").exists());
    assert!(dir.path().join("assignments/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    gradewise().current_dir(dir.path()).arg("init").assert().success();

    gradewise()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_example_assignment_set() {
    let dir = TempDir::new().unwrap();
    gradewise().current_dir(dir.path()).arg("init").assert().success();

    gradewise()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--assignment-set")
        .arg("assignments/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Explain Data Structures (3 submissions)"))
        .stdout(predicate::str::contains("All assignment sets valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let set = write(
        dir.path(),
        "broken.toml",
        r#"
[assignment]
id = "stacks"
title = "Stacks"
max_score = 150

[[submissions]]
id = "s1"
student = "alice"
content = ""
"#,
    );

    gradewise()
        .arg("validate")
        .arg("--assignment-set")
        .arg(&set)
        .assert()
        .success()
        .stdout(predicate::str::contains("max_score 150 exceeds 100"))
        .stdout(predicate::str::contains("[s1] WARNING: content is empty"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    gradewise()
        .arg("validate")
        .arg("--assignment-set")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn run_writes_all_formats_and_flags_copy() {
    let dir = TempDir::new().unwrap();
    gradewise().current_dir(dir.path()).arg("init").assert().success();
    let output = dir.path().join("out");

    gradewise()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assignment-set")
        .arg("assignments/example.toml")
        .arg("--output")
        .arg(&output)
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stderr(predicate::str::contains("3/3 graded, 0 rejected"))
        .stderr(predicate::str::contains("carol-1"));

    let json_files = files_with_extension(&output, "json");
    assert_eq!(json_files.len(), 1);
    assert_eq!(files_with_extension(&output, "html").len(), 1);
    assert_eq!(files_with_extension(&output, "md").len(), 1);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_files[0]).unwrap()).unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["submission_id"], "alice-1");
    assert_eq!(results[0]["result"]["plagiarism_risk"], "0%");
    assert_eq!(results[0]["flagged"], false);
    assert_eq!(results[2]["submission_id"], "carol-1");
    assert_eq!(results[2]["closest_peer"], "alice-1");
    assert_eq!(results[2]["flagged"], true);
}

#[test]
fn run_records_rejected_submissions() {
    let dir = TempDir::new().unwrap();
    let set = write(
        dir.path(),
        "set.toml",
        &format!(
            r#"
[assignment]
id = "stacks"
title = "Stacks"
description = "{PROMPT}"

[[submissions]]
id = "s1"
student = "alice"
content = "{ESSAY}"

[[submissions]]
id = "s2"
content = "{ESSAY}"
"#
        ),
    );
    let output = dir.path().join("out");

    gradewise()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assignment-set")
        .arg(&set)
        .arg("--output")
        .arg(&output)
        .arg("--format")
        .arg("markdown")
        .arg("--peer-scope")
        .arg("all")
        .assert()
        .success()
        .stderr(predicate::str::contains("REJECTED: s2"));

    let md_files = files_with_extension(&output, "md");
    assert_eq!(md_files.len(), 1);
    let md = std::fs::read_to_string(&md_files[0]).unwrap();
    assert!(md.contains("1 graded, 1 rejected"));
    assert!(md.contains("- s2: submission s2 has no student"));
}

#[test]
fn run_rejects_bad_peer_scope() {
    let dir = TempDir::new().unwrap();
    gradewise().current_dir(dir.path()).arg("init").assert().success();

    gradewise()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assignment-set")
        .arg("assignments/example.toml")
        .arg("--peer-scope")
        .arg("everyone")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown peer scope"));
}
