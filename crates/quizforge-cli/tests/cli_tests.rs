//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizforge() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizforge").unwrap();
    cmd.env_remove("QUIZFORGE_STORE_DIR");
    cmd
}

/// Run `init` in a fresh directory and return it.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    quizforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("custom.toml");
    std::fs::write(
        &path,
        format!(
            "store_dir = {:?}\noutput_dir = {:?}\n",
            dir.join("store").display().to_string(),
            dir.join("exports").display().to_string()
        ),
    )
    .unwrap();
    path
}

#[test]
fn help_output() {
    quizforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz definition builder"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizforge.toml"))
        .stdout(predicate::str::contains("Created quiz.json"));

    assert!(dir.path().join("quizforge.toml").exists());
    assert!(dir.path().join("quiz.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_example_quiz() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["validate", "--input", "quiz.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workshop Safety (1 assessments, 2 questions)"))
        .stdout(predicate::str::contains("ready to export"));
}

#[test]
fn validate_reports_every_violation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"APP_ID": "", "VERSION": "1", "ASSESSMENTS": [{"title": "Workshop", "questions": []}]}"#,
    )
    .unwrap();

    quizforge()
        .args(["validate", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR: APP_ID is empty."))
        .stdout(predicate::str::contains("ERROR: Workshop: Assessment ID is empty."))
        .stdout(predicate::str::contains("ERROR: Workshop: has no questions."))
        .stderr(predicate::str::contains("3 validation issue(s)"));
}

#[test]
fn validate_nonexistent_file() {
    quizforge()
        .args(["validate", "--input", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("nonexistent.json"));
}

#[test]
fn validate_rejects_non_object_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    quizforge()
        .args(["validate", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz data object"));
}

#[test]
fn export_writes_named_file() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["export", "--input", "quiz.json", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("US24352_SAFETY_v1.json"));

    let written = std::fs::read_to_string(dir.path().join("out/US24352_SAFETY_v1.json")).unwrap();
    let original = std::fs::read_to_string(dir.path().join("quiz.json")).unwrap();
    assert_eq!(written, original);
}

#[test]
fn export_uses_configured_output_dir() {
    let dir = initialized();
    let config = write_config(dir.path());

    quizforge()
        .current_dir(dir.path())
        .args(["export", "--input", "quiz.json", "--config"])
        .arg(&config)
        .assert()
        .success();

    assert!(dir.path().join("exports/US24352_SAFETY_v1.json").exists());
}

#[test]
fn export_refuses_invalid_quiz() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "{}").unwrap();

    quizforge()
        .current_dir(dir.path())
        .args(["export", "--input"])
        .arg(&path)
        .args(["--output-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No assessments defined."));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn export_with_missing_config_fails() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["export", "--input", "quiz.json", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn grade_short_answer() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args([
            "grade",
            "--input",
            "quiz.json",
            "--assessment",
            "US24352_A1",
            "--question",
            "eye_protection",
            "--answer",
            "He suffered an eye injury.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 / 2"))
        .stdout(predicate::str::contains("Rule 1: advanced pattern matched (+2)."));
}

#[test]
fn grade_mc_answer_as_json() {
    let dir = initialized();

    let output = quizforge()
        .current_dir(dir.path())
        .args([
            "grade",
            "--input",
            "quiz.json",
            "--assessment",
            "US24352_A1",
            "--question",
            "before_maintenance",
            "--answer",
            "I would work quickly",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["earnedPoints"], 0);
    assert_eq!(value["possiblePoints"], 1);
}

#[test]
fn grade_unknown_question() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args([
            "grade",
            "--input",
            "quiz.json",
            "--assessment",
            "US24352_A1",
            "--question",
            "nope",
            "--answer",
            "x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 'nope' not found"));
}

#[test]
fn grade_empty_answer_fails() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args([
            "grade",
            "--input",
            "quiz.json",
            "--assessment",
            "US24352_A1",
            "--question",
            "eye_protection",
            "--answer",
            "   ",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot grade"));
}

#[test]
fn list_shows_questions() {
    let dir = initialized();

    quizforge()
        .current_dir(dir.path())
        .args(["list", "--input", "quiz.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("US24352_SAFETY v1"))
        .stdout(predicate::str::contains("before_maintenance"))
        .stdout(predicate::str::contains("eye_protection"))
        .stdout(predicate::str::contains("short"));
}

#[test]
fn draft_save_restore_clear() {
    let dir = initialized();
    let config = write_config(dir.path());

    quizforge()
        .current_dir(dir.path())
        .args(["draft", "save", "--input", "quiz.json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved draft"));

    assert!(dir.path().join("store/quizforge_draft.json").exists());

    quizforge()
        .current_dir(dir.path())
        .args(["draft", "restore", "--output", "restored.json", "--config"])
        .arg(&config)
        .assert()
        .success();

    let restored = std::fs::read_to_string(dir.path().join("restored.json")).unwrap();
    let original = std::fs::read_to_string(dir.path().join("quiz.json")).unwrap();
    assert_eq!(restored, original);

    quizforge()
        .current_dir(dir.path())
        .args(["draft", "clear", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft cleared."));

    assert!(!dir.path().join("store/quizforge_draft.json").exists());
}

#[test]
fn draft_restore_without_draft_prints_starter() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    quizforge()
        .current_dir(dir.path())
        .args(["draft", "restore", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"APP_ID\": \"QUIZ\""))
        .stdout(predicate::str::contains("\"APP_TITLE\": \"New Quiz\""));
}

#[test]
fn draft_restore_ignores_corrupt_draft() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    std::fs::create_dir_all(dir.path().join("store")).unwrap();
    std::fs::write(dir.path().join("store/quizforge_draft.json"), "{ nope").unwrap();

    quizforge()
        .current_dir(dir.path())
        .args(["draft", "restore", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"APP_ID\": \"QUIZ\""));
}

#[test]
fn draft_save_prunes_stale_view_state() {
    let dir = initialized();
    let config = write_config(dir.path());
    let store = dir.path().join("store");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(
        store.join("quizforge_collapse_states.json"),
        r#"{"A:US24352_A1":false,"A:gone":true,"Q:eye_protection":true}"#,
    )
    .unwrap();

    quizforge()
        .current_dir(dir.path())
        .args(["draft", "save", "--input", "quiz.json", "--config"])
        .arg(&config)
        .assert()
        .success();

    let states = std::fs::read_to_string(store.join("quizforge_collapse_states.json")).unwrap();
    assert_eq!(states, r#"{"A:US24352_A1":false,"Q:eye_protection":true}"#);
}

#[test]
fn validate_accepts_nulls_and_numeric_strings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loose.json");
    std::fs::write(
        &path,
        r#"{"APP_ID": "LOOSE", "VERSION": 3, "APP_TITLE": null,
            "ASSESSMENTS": [{"id": "a1", "credits": "4", "questions": [
                {"id": "q1", "type": "short", "hint": null, "maxPoints": "2",
                 "rubric": [{"check": "guard", "points": -1}]}]}]}"#,
    )
    .unwrap();

    quizforge()
        .args(["validate", "--input"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to export"));
}
