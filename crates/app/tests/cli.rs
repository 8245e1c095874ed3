//! Integration tests for the tracker CLI

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const NOW: &str = "2025-07-16T12:00:00Z";

/// Tracker command pinned to a temp data dir and a fixed clock.
fn tracker(data: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tracker"));
    cmd.env_remove("RUST_LOG")
        .env_remove("TRACKER_START_DATE")
        .env("TRACKER_DATA_DIR", data.path())
        .env("TRACKER_NOW", NOW);
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_help() {
    Command::new(cargo::cargo_bin!("tracker"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("48-week learning program"));
}

#[test]
fn test_status_on_second_program_day() {
    let data = TempDir::new().unwrap();
    let status = json_stdout(tracker(&data).arg("status"));

    assert_eq!(status["expected_hours"], 8.0);
    assert_eq!(status["actual_hours"], 0.0);
    assert_eq!(status["current_week"], 1);
    assert_eq!(status["urgency"], "critical");
}

#[test]
fn test_log_then_export() {
    let data = TempDir::new().unwrap();

    let ended = json_stdout(tracker(&data).args([
        "log",
        "2",
        "--notes",
        "closures",
        "--topic",
        "Fn traits",
        "--topic",
        "move",
        "--difficulty",
        "4",
    ]));
    assert_eq!(ended["session"]["manual_entry"], true);
    assert_eq!(ended["session"]["duration_hours"], 2.0);

    assert!(data.path().join("sessions.json").exists());
    assert!(data.path().join("progress.json").exists());

    let export = json_stdout(tracker(&data).arg("export"));
    assert_eq!(export["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(export["progress"]["total_hours"], 2.0);
    assert_eq!(export["progress"]["current_streak"], 1);
    assert_eq!(
        export["progress"]["daily_logs"]["2025-07-16"]["topics"],
        serde_json::json!(["Fn traits", "move"])
    );
}

#[test]
fn test_log_rejects_absurd_duration() {
    let data = TempDir::new().unwrap();

    tracker(&data)
        .args(["log", "30"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("between 0 and 24 hours"));
    assert!(!data.path().join("sessions.json").exists());
}

#[test]
fn test_log_on_past_date() {
    let data = TempDir::new().unwrap();
    tracker(&data)
        .args(["log", "1.5", "--date", "2025-07-15"])
        .assert()
        .success();

    let weekly = json_stdout(tracker(&data).arg("weekly"));
    assert_eq!(weekly[0]["hours"], 1.5);
    assert_eq!(weekly[0]["start_date"], "2025-07-15");
}

#[test]
fn test_toggle_topic_twice() {
    let data = TempDir::new().unwrap();

    let first = json_stdout(tracker(&data).args(["toggle-topic", "1", "2"]));
    assert_eq!(first["action"], "checked");
    let second = json_stdout(tracker(&data).args(["toggle-topic", "1", "2"]));
    assert_eq!(second["action"], "unchecked");

    let stage = json_stdout(tracker(&data).args(["stage", "1"]));
    assert_eq!(stage["completed_topics"], serde_json::json!([]));
    assert_eq!(stage["progress"]["lifecycle"], "active");
}

#[test]
fn test_unknown_stage_fails() {
    let data = TempDir::new().unwrap();
    tracker(&data)
        .args(["stage", "9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stage 9 not found"));
}

#[test]
fn test_timer_session() {
    let data = TempDir::new().unwrap();

    tracker(&data)
        .args(["timer", "--notes", "async"])
        .write_stdin("pause\nresume\nstatus\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"paused\""))
        .stdout(predicate::str::contains("\"completed\""));

    let export = json_stdout(tracker(&data).arg("export"));
    assert_eq!(export["sessions"][0]["notes"], "async");
    assert_eq!(export["progress"]["total_sessions"], 1);
}

#[test]
fn test_goals_update_keeps_other_value() {
    let data = TempDir::new().unwrap();

    let defaults = json_stdout(tracker(&data).arg("goals"));
    assert_eq!(defaults["daily_hours"], 2.0);

    let updated = json_stdout(tracker(&data).args(["goals", "--daily", "3"]));
    assert_eq!(updated["daily_hours"], 3.0);
    assert_eq!(updated["weekly_hours"], 12.0);
}

#[test]
fn test_reset_requires_confirmation() {
    let data = TempDir::new().unwrap();
    tracker(&data).args(["log", "1"]).assert().success();

    tracker(&data)
        .arg("reset")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    tracker(&data).args(["reset", "--yes"]).assert().success();
    let export = json_stdout(tracker(&data).arg("export"));
    assert_eq!(export["sessions"], serde_json::json!([]));
    assert_eq!(export["progress"]["total_hours"], 0.0);
}

#[test]
fn test_dashboard_and_insights() {
    let data = TempDir::new().unwrap();
    tracker(&data).args(["log", "3"]).assert().success();

    let dashboard = json_stdout(tracker(&data).arg("dashboard"));
    assert_eq!(dashboard["recent_sessions"].as_array().unwrap().len(), 1);
    assert_eq!(dashboard["stage_progress"]["1"]["actual_hours"], 3.0);
    assert_eq!(dashboard["active_sessions"], serde_json::json!([]));

    let insights = json_stdout(tracker(&data).arg("insights"));
    assert_eq!(insights["insights"][0]["title"], "This Week's Progress");

    let stats = json_stdout(tracker(&data).arg("stats"));
    assert_eq!(stats["total_days_learned"], 1);
    assert_eq!(stats["most_productive_hour"], 12);
}
