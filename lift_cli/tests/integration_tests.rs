//! Integration tests for the liftstat binary.
//!
//! These tests verify end-to-end behavior including:
//! - Session import and de-duplication
//! - Statistics and history views
//! - 1RM estimation
//! - Personal record management

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from the user's real config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftstat"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("HOME", temp_dir.path())
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

fn set(weight: f64, reps: u32) -> serde_json::Value {
    json!({ "weight": weight, "reps": reps })
}

fn session(id: &str, date: &str, exercises: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "date": date,
        "name": format!("Workout {}", date),
        "completed": true,
        "exercises": exercises,
    })
}

/// Write a workout store export and return its path
fn write_export(dir: &Path) -> PathBuf {
    let sessions = json!([
        session(
            "00000000-0000-4000-8000-000000000001",
            "2024-01-01",
            json!([
                { "name": "Bench Press", "muscleGroup": "chest", "sets": [set(70.0, 8), set(80.0, 5)] },
                { "name": "Running", "sets": [set(2.0, 720)] }
            ])
        ),
        session(
            "00000000-0000-4000-8000-000000000002",
            "2024-01-08",
            json!([
                { "name": "bench press", "sets": [set(85.0, 3)] },
                { "name": "Pull-up", "sets": [set(0.0, 10), set(0.0, 12)] },
                { "name": "Running", "sets": [set(2.0, 600)] }
            ])
        ),
        session(
            "00000000-0000-4000-8000-000000000003",
            "2024-01-15",
            json!([
                { "name": "Bench Press", "sets": [set(82.0, 4)] }
            ])
        ),
    ]);

    let path = dir.join("export.json");
    fs::write(&path, serde_json::to_string_pretty(&sessions).unwrap()).unwrap();
    path
}

fn import(temp_dir: &TempDir) {
    let export = write_export(temp_dir.path());
    cli(temp_dir)
        .arg("import")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 sessions"));
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout statistics and personal records"));
}

#[test]
fn test_stats_without_data() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged yet."));
}

#[test]
fn test_import_is_idempotent() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    let export = temp_dir.path().join("export.json");
    cli(&temp_dir)
        .arg("import")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 0 sessions"));

    let log = fs::read_to_string(temp_dir.path().join("data/sessions.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 3);
}

#[test]
fn test_stats_grouped_by_muscle() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    let output = cli(&temp_dir).arg("stats").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let chest = stdout.find("── Chest ──").expect("chest section");
    let calisthenics = stdout.find("── Calisthenics ──").expect("calisthenics section");
    let cardio = stdout.find("── Cardio ──").expect("cardio section");
    assert!(chest < calisthenics && calisthenics < cardio);

    assert!(stdout.contains("85.0 kg x 3 (2024-01-08)"));
    assert!(stdout.contains("12 reps (2024-01-08)"));
    assert!(stdout.contains("5:00 min/km (2024-01-08)"));
}

#[test]
fn test_stats_csv_export() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    let csv_path = temp_dir.path().join("stats.csv");
    cli(&temp_dir)
        .arg("stats")
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 exercises"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(contents.lines().count(), 4);
    assert!(contents.starts_with("exercise,"));
}

#[test]
fn test_history_flags_single_pr() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    let output = cli(&temp_dir)
        .arg("history")
        .arg("BENCH press")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_eq!(stdout.matches("★ PR").count(), 1);
    let pr_line = stdout.lines().find(|l| l.contains("★ PR")).unwrap();
    assert!(pr_line.contains("2024-01-08"));
    assert!(stdout.contains("Sessions: 3"));
    assert!(stdout.contains("Best:     85.0 kg"));
    assert!(stdout.contains("Progress: +2.5%"));
}

#[test]
fn test_history_order_toggle_keeps_progress() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    let newest = cli(&temp_dir)
        .args(["history", "Bench Press", "--newest-first"])
        .output()
        .unwrap();
    let oldest = cli(&temp_dir)
        .args(["history", "Bench Press", "--oldest-first"])
        .output()
        .unwrap();
    let newest = String::from_utf8(newest.stdout).unwrap();
    let oldest = String::from_utf8(oldest.stdout).unwrap();

    assert!(newest.find("2024-01-15").unwrap() < newest.find("2024-01-01").unwrap());
    assert!(oldest.find("2024-01-01").unwrap() < oldest.find("2024-01-15").unwrap());
    assert!(newest.contains("Progress: +2.5%"));
    assert!(oldest.contains("Progress: +2.5%"));
}

#[test]
fn test_history_cardio_best_pace() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    cli(&temp_dir)
        .args(["history", "running"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Best:     5:00 min/km"));
}

#[test]
fn test_history_unknown_exercise() {
    let temp_dir = setup_test_dir();
    import(&temp_dir);

    cli(&temp_dir)
        .args(["history", "Deadlift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history for 'Deadlift'."));
}

#[test]
fn test_history_rejects_unknown_category() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["history", "Bench Press", "--category", "yoga"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn test_orm_estimate() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["orm", "100", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated 1RM: 133.3 kg"));
}

#[test]
fn test_orm_rejects_bad_input() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["orm", "heavy", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));

    cli(&temp_dir)
        .args(["orm", "100", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reps must be at least 1"));
}

#[test]
fn test_pr_lifecycle() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["pr", "add", "Squat", "100", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New record for Squat: 110.0 kg"));

    // Same lift is not an improvement
    cli(&temp_dir)
        .args(["pr", "add", "squat", "100", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("record unchanged"));

    cli(&temp_dir)
        .args(["pr", "add", "Squat", "110", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record improved for Squat: 110.0 kg → 128.3 kg"));

    cli(&temp_dir)
        .args(["pr", "show", "SQUAT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat: 128.3 kg"));

    let records: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("data/records.json")).unwrap(),
    )
    .unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    let id = records[0]["id"].as_str().unwrap().to_string();

    cli(&temp_dir)
        .args(["pr", "update", &id, "100", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("record unchanged"));

    cli(&temp_dir)
        .args(["pr", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted record"));

    cli(&temp_dir)
        .args(["pr", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No personal records yet."));
}

#[test]
fn test_pr_update_rejects_bad_id() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["pr", "update", "not-an-id", "100", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a record id"));

    cli(&temp_dir)
        .args(["pr", "update", "00000000-0000-4000-8000-0000000000ff", "100", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_pr_show_reports_duplicates() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let records = json!([
        { "id": "00000000-0000-4000-8000-00000000000a", "owner": "local",
          "exerciseName": "Deadlift", "weight": 180.0, "date": "2024-01-01" },
        { "id": "00000000-0000-4000-8000-00000000000b", "owner": "local",
          "exerciseName": "deadlift", "weight": 185.0, "date": "2024-02-01" }
    ]);
    fs::write(data_dir.join("records.json"), records.to_string()).unwrap();

    cli(&temp_dir)
        .args(["pr", "show", "Deadlift"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected at most one"));
}

#[test]
fn test_imperial_display() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/liftstat");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[units]\nsystem = \"imperial\"\n").unwrap();

    cli(&temp_dir)
        .args(["orm", "225", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated 1RM: 262.5 lb"));
}
