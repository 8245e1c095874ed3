//! Human-readable commentary on the current progress.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracker_core::model::{ProgressState, StageId};

use crate::progress::{ProgressStatus, ScheduleStatus, StageProgress};

/// Logged dates summed for the recent activity insight.
const RECENT_LOGGED_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Achievement,
    Progress,
    Habit,
    Trend,
    Motivation,
    Improvement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: &'static str,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, title: &'static str, message: String) -> Self {
        Self {
            kind,
            title,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningInsights {
    pub headline: String,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Insight>,
    pub generated_at: DateTime<Utc>,
}

impl LearningInsights {
    #[must_use]
    pub fn generate(
        progress: &ProgressState,
        status: &ProgressStatus,
        stages: &BTreeMap<StageId, StageProgress>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            headline: headline(status),
            insights: insights(progress, stages),
            recommendations: recommendations(progress),
            generated_at: now,
        }
    }
}

/// One-line summary of where the schedule stands.
#[must_use]
pub fn headline(status: &ProgressStatus) -> String {
    let detail = match status.status {
        ScheduleStatus::SignificantlyAhead => format!(
            "{:.1} hours logged against {:.1} expected. Well ahead of the plan.",
            status.actual_hours, status.expected_hours
        ),
        ScheduleStatus::OnTrack => format!(
            "{:.1} of {:.1} expected hours. Keep the daily rhythm going.",
            status.actual_hours, status.expected_hours
        ),
        ScheduleStatus::SlightlyBehind
        | ScheduleStatus::BehindSchedule
        | ScheduleStatus::CriticallyBehind => format!(
            "{:.1} hours short of schedule. {:.1} hours a day closes the gap by the end of week {}.",
            (status.expected_hours - status.actual_hours).max(0.0),
            status.hours_per_day_needed,
            status.current_week + status.remaining_weeks
        ),
    };
    format!(
        "Week {}, stage {}: {}. {detail}",
        status.current_week, status.current_stage, status.label
    )
}

fn insights(progress: &ProgressState, stages: &BTreeMap<StageId, StageProgress>) -> Vec<Insight> {
    let mut out = Vec::new();

    let streak = progress.current_streak();
    if streak >= 7 {
        out.push(Insight::new(
            InsightKind::Achievement,
            "Streak Master",
            format!("You've kept a {streak}-day learning streak. The habit is sticking."),
        ));
    } else if streak >= 3 {
        out.push(Insight::new(
            InsightKind::Progress,
            "Building Momentum",
            format!("{streak} days in a row. Keep going to reach the next milestone."),
        ));
    }

    let total_hours = progress.total_hours();
    if total_hours >= 50.0 {
        out.push(Insight::new(
            InsightKind::Achievement,
            "Dedicated Learner",
            format!("{total_hours:.1} hours invested so far."),
        ));
    }

    let total_sessions = progress.total_sessions();
    if total_sessions >= 20 {
        out.push(Insight::new(
            InsightKind::Habit,
            "Session Champion",
            format!("{total_sessions} sessions completed. The routine is established."),
        ));
    }

    let completed_stages = stages.values().filter(|s| s.percentage >= 100.0).count();
    if completed_stages > 0 {
        out.push(Insight::new(
            InsightKind::Achievement,
            "Stage Conqueror",
            format!("{completed_stages} stage(s) have reached their target hours."),
        ));
    }

    let recent_hours: f64 = progress
        .daily_logs()
        .values()
        .rev()
        .take(RECENT_LOGGED_DAYS)
        .map(|log| log.hours)
        .sum();
    if recent_hours > 0.0 {
        out.push(Insight::new(
            InsightKind::Trend,
            "This Week's Progress",
            format!("{recent_hours:.1} hours over your last {RECENT_LOGGED_DAYS} logged days."),
        ));
    }

    out
}

fn recommendations(progress: &ProgressState) -> Vec<Insight> {
    let mut out = Vec::new();

    if progress.current_streak() == 0 {
        out.push(Insight::new(
            InsightKind::Motivation,
            "Start Your Streak",
            "Log a session today. Even fifteen minutes starts a streak.".to_owned(),
        ));
    }

    if progress.total_hours() > 0.0 && progress.total_sessions() > 0 {
        let avg = progress.total_hours() / f64::from(progress.total_sessions());
        if avg < 0.5 {
            out.push(Insight::new(
                InsightKind::Improvement,
                "Extend Your Sessions",
                format!("Your average session is {avg:.1}h. Aim for an hour or more."),
            ));
        }
    }

    out
}
