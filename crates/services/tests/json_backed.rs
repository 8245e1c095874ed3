use chrono::Duration;
use services::{Clock, TrackerServices};
use tempfile::TempDir;
use tracker_core::ProgramPlan;
use tracker_core::model::{SessionDetailsDraft, StageId, ToggleAction};
use tracker_core::time::fixed_now;

#[tokio::test]
async fn state_survives_a_restart() {
    let temp_dir = TempDir::new().unwrap();
    let mut clock = Clock::fixed(fixed_now());

    {
        let services =
            TrackerServices::json_dir(temp_dir.path(), clock, ProgramPlan::standard()).unwrap();
        let draft = SessionDetailsDraft {
            notes: "iterators".into(),
            ..SessionDetailsDraft::default()
        };
        services
            .sessions()
            .add_manual(2.0, draft, Some(fixed_now() - Duration::days(1)))
            .await
            .unwrap();
        services
            .stages()
            .toggle_topic(StageId::new(1), 2)
            .await
            .unwrap();
        services.goals().set_goals(3.0, 21.0).await.unwrap();
        // Open sessions are process memory only.
        let _lost = services.sessions().start();
    }

    clock.advance(Duration::hours(1));
    let services =
        TrackerServices::json_dir(temp_dir.path(), clock, ProgramPlan::standard()).unwrap();

    let export = services.data().export().await;
    assert_eq!(export.sessions.len(), 1);
    assert_eq!(export.sessions[0].notes, "iterators");
    assert_eq!(export.progress.total_hours(), 2.0);
    // Studied yesterday, nothing yet today.
    assert_eq!(export.progress.current_streak(), 0);
    assert_eq!(export.goals.weekly_hours(), 21.0);
    assert!(services.sessions().active_ids().is_empty());

    let outcome = services
        .stages()
        .toggle_topic(StageId::new(1), 2)
        .await
        .unwrap();
    assert_eq!(outcome.action, ToggleAction::Unchecked);
}

#[tokio::test]
async fn corrupt_documents_are_replaced_on_next_save() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("sessions.json"), "[{ truncated").unwrap();
    std::fs::write(temp_dir.path().join("progress.json"), "").unwrap();

    let services = TrackerServices::json_dir(
        temp_dir.path(),
        Clock::fixed(fixed_now()),
        ProgramPlan::standard(),
    )
    .unwrap();

    assert_eq!(services.progress().progress().await.total_sessions(), 0);
    services
        .sessions()
        .add_manual(1.0, SessionDetailsDraft::default(), None)
        .await
        .unwrap();

    let raw = std::fs::read_to_string(temp_dir.path().join("sessions.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(services.progress().progress().await.total_sessions(), 1);
}

#[tokio::test]
async fn invalid_plan_is_rejected_at_startup() {
    let temp_dir = TempDir::new().unwrap();
    let plan: ProgramPlan = {
        let mut value = serde_json::to_value(ProgramPlan::standard()).unwrap();
        value["total_weeks"] = serde_json::json!(50);
        serde_json::from_value(value).unwrap()
    };

    assert!(TrackerServices::json_dir(temp_dir.path(), Clock::fixed(fixed_now()), plan).is_err());
}
