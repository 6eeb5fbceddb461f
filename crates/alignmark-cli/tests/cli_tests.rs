//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn alignmark() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("alignmark").unwrap()
}

const ANSWER_SHEET: &str = "Name: $>:1|Alice|2<:$ Age: $>:2|30|3<:$\n";

fn make_workdir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("answer.txt"), ANSWER_SHEET).unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    dir
}

#[test]
fn validate_reports_task_count() {
    let dir = make_workdir();
    alignmark()
        .arg("validate")
        .arg("--answer")
        .arg(dir.path().join("answer.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tasks"))
        .stdout(predicate::str::contains("Answer sheet valid"));
}

#[test]
fn validate_warns_on_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answer.txt");
    std::fs::write(&path, "$>:1|a|1<:$ $>:1|b|1<:$").unwrap();
    alignmark()
        .arg("validate")
        .arg("--answer")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate task id"));
}

#[test]
fn validate_nonexistent_file() {
    alignmark()
        .arg("validate")
        .arg("--answer")
        .arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grade_end_to_end() {
    let dir = make_workdir();
    std::fs::write(
        dir.path().join("data").join("2023010101_alice.txt"),
        "Name: Alice Age: 30\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("data").join("2023010102_bob.txt"),
        "Name: Bob Age: 30\n",
    )
    .unwrap();

    alignmark()
        .arg("grade")
        .arg("--workdir")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stderr(predicate::str::contains("2 submission(s)"))
        .stderr(predicate::str::contains("Results saved to"));

    let result_dir = dir.path().join("result");
    let report_path = std::fs::read_dir(&result_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().is_some_and(|ext| ext == "json"))
        .expect("a JSON report was written");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
    let submissions = json["submissions"].as_array().unwrap();
    assert_eq!(submissions.len(), 2);
    // Sorted by student id: alice scored both tasks, bob only the second.
    assert_eq!(submissions[0]["total"], 5.0);
    assert_eq!(submissions[1]["total"], 3.0);

    assert!(result_dir.join("log").is_dir());
}

#[test]
fn grade_rejects_misnamed_files() {
    let dir = make_workdir();
    std::fs::write(dir.path().join("data").join("not-an-id.txt"), "x").unwrap();

    alignmark()
        .arg("grade")
        .arg("--workdir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("student id"));
}

#[test]
fn grade_counts_unreadable_formats_as_failures() {
    let dir = make_workdir();
    std::fs::write(
        dir.path().join("data").join("2023010101_alice.bin"),
        [0u8, 1, 2],
    )
    .unwrap();

    alignmark()
        .arg("grade")
        .arg("--workdir")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stderr(predicate::str::contains("1 extraction failure"));
}

#[test]
fn grade_requires_task_markers() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("answer.txt"), "no markers here").unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();

    alignmark()
        .arg("grade")
        .arg("--workdir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no task markers"));
}

#[test]
fn inspect_shows_carved_answers() {
    let dir = make_workdir();
    let submission = dir.path().join("sub.txt");
    std::fs::write(&submission, "Name: Carol Age: 25\n").unwrap();

    alignmark()
        .arg("inspect")
        .arg("--answer")
        .arg(dir.path().join("answer.txt"))
        .arg("--submission")
        .arg(&submission)
        .assert()
        .success()
        .stdout(predicate::str::contains("Alignment score"))
        .stdout(predicate::str::contains("Carol"))
        .stdout(predicate::str::contains("25"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    alignmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created alignmark.toml"))
        .stdout(predicate::str::contains("Created answer.txt"));

    assert!(dir.path().join("alignmark.toml").exists());
    assert!(dir.path().join("answer.txt").exists());
    assert!(dir.path().join("data/0000000000_sample.txt").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    alignmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    alignmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn initialized_workdir_grades_cleanly() {
    let dir = TempDir::new().unwrap();

    alignmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    alignmark()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--workdir")
        .arg(".")
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stderr(predicate::str::contains("HTML report"));
}
