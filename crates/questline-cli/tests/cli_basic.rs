//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory and
//! verifies the JSON it prints.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_questline"))
        .env("QUESTLINE_DATA_DIR", data_dir)
        .env_remove("QUESTLINE_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_quest_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let quest = run_json(dir.path(), &["quest", "add", "Write tests", "--boss"]);
    assert_eq!(quest["title"], "Write tests");
    assert_eq!(quest["is_boss_quest"], true);

    let list = run_json(dir.path(), &["quest", "list"]);
    let quests = list.as_array().unwrap();
    assert_eq!(quests.len(), 1);
    assert_eq!(quests[0]["id"], quest["id"]);
}

#[test]
fn test_quest_start_pause_complete() {
    let dir = tempfile::tempdir().unwrap();
    let quest = run_json(dir.path(), &["quest", "add", "Deep work"]);
    let id = quest["id"].as_str().unwrap();

    let started = run_json(dir.path(), &["quest", "start", id]);
    assert_eq!(started["outcome"], "started");
    let again = run_json(dir.path(), &["quest", "start", id]);
    assert_eq!(again["outcome"], "already_active");

    let status = run_json(dir.path(), &["quest", "status", id]);
    assert_eq!(status["running"], true);

    let paused = run_json(dir.path(), &["quest", "pause", id]);
    assert_eq!(paused["status"], "paused");

    let completed = run_json(dir.path(), &["quest", "complete", id, "--after", "600"]);
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["quest"]["is_completed"], true);
    assert_eq!(completed["alert"]["status"], "scheduled");

    let pending = run_json(dir.path(), &["notify", "list"]);
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let twice = run_json(dir.path(), &["quest", "complete", id]);
    assert_eq!(twice["status"], "already_completed");

    run_cli(dir.path(), &["quest", "delete", id]);
    let pending = run_json(dir.path(), &["notify", "list"]);
    assert!(pending.as_array().unwrap().is_empty());
}

#[test]
fn test_unknown_quest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["quest", "start", "no-such-quest"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Quest not found"), "stderr: {stderr}");
}

#[test]
fn test_todo_reminder_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_json(
        dir.path(),
        &["todo", "add", "Renew passport", "--priority", "critical", "--remind-in", "60"],
    );
    let id = report["todo"]["id"].as_str().unwrap();
    assert_eq!(report["todo"]["priority"], "critical");
    assert_eq!(report["reminder"]["status"], "scheduled");
    assert_eq!(
        report["reminder"]["id"],
        format!("todo-reminder-{id}").as_str()
    );

    let pending = run_json(dir.path(), &["notify", "list"]);
    assert_eq!(pending[0]["content"]["title"], "Critical Quest Alert");

    let edited = run_json(dir.path(), &["todo", "edit", id, "--clear-reminder"]);
    assert_eq!(edited["reminder"]["status"], "skipped");
    let pending = run_json(dir.path(), &["notify", "list"]);
    assert!(pending.as_array().unwrap().is_empty());

    let completed = run_json(dir.path(), &["todo", "complete", id]);
    assert_eq!(completed["todo"]["is_completed"], true);
    let open = run_json(dir.path(), &["todo", "list"]);
    assert!(open.as_array().unwrap().is_empty());
    let all = run_json(dir.path(), &["todo", "list", "--all"]);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[test]
fn test_disabled_notifications_report_denied() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "notifications.enabled", "false"]);
    assert_eq!(code, 0);

    let report = run_json(dir.path(), &["todo", "add", "Water plants", "--remind-in", "30"]);
    assert_eq!(report["reminder"]["status"], "denied");

    let authorized = run_json(dir.path(), &["notify", "authorize"]);
    assert_eq!(authorized["granted"], true);
    assert_eq!(authorized["pending"], 1);
}

#[test]
fn test_profile_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let profile = run_json(dir.path(), &["profile", "show"]);
    assert_eq!(profile["level"], 1);
    assert_eq!(profile["experience"], 0);
    assert_eq!(profile["experience_to_next_level"], 100);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "leveling.xp_per_minute"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "leveling.xp_per_minute", "4"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "leveling.xp_per_minute"]);
    assert_eq!(stdout.trim(), "4");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "leveling.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_out_of_range_reminder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["todo", "add", "Someday", "--remind-in", "9223372036854775807"],
    );
    assert_eq!(code, 1, "stderr: {stderr}");
    assert!(stderr.contains("reminder out of range"), "stderr: {stderr}");
    let todos = run_json(dir.path(), &["todo", "list", "--all"]);
    assert!(todos.as_array().unwrap().is_empty());
}

#[test]
fn test_out_of_range_alert_delay_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let quest = run_json(dir.path(), &["quest", "add", "Far future"]);
    let id = quest["id"].as_str().unwrap();

    let completed = run_json(
        dir.path(),
        &["quest", "complete", id, "--after", "10000000000000000"],
    );
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["alert"]["status"], "failed");
    let pending = run_json(dir.path(), &["notify", "list"]);
    assert!(pending.as_array().unwrap().is_empty());
}
