use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracker_core::model::{DailyLog, SessionRecord, StageId};
use tracker_core::{ProgramPlan, Stage, WeekRange};

/// Where a stage sits relative to the current program week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageLifecycle {
    Completed,
    Active,
    Upcoming,
}

impl StageLifecycle {
    #[must_use]
    pub fn for_week(weeks: WeekRange, current_week: u32) -> Self {
        if current_week > weeks.end {
            Self::Completed
        } else if weeks.contains(current_week) {
            Self::Active
        } else {
            Self::Upcoming
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageProgress {
    pub name: String,
    pub week_range: WeekRange,
    pub target_hours: f64,
    pub actual_hours: f64,
    pub session_count: u32,
    pub percentage: f64,
    pub lifecycle: StageLifecycle,
}

impl StageProgress {
    fn new(stage: &Stage, actual_hours: f64, session_count: u32, current_week: u32) -> Self {
        let percentage = if stage.target_hours() > 0.0 {
            (actual_hours / stage.target_hours() * 100.0).min(100.0)
        } else {
            0.0
        };
        Self {
            name: stage.name().to_owned(),
            week_range: stage.weeks(),
            target_hours: stage.target_hours(),
            actual_hours,
            session_count,
            percentage,
            lifecycle: StageLifecycle::for_week(stage.weeks(), current_week),
        }
    }
}

/// Per-stage hours, attributing each completed session to the stage whose week range
/// contains the program week of its start date. Sessions outside the program count
/// toward no stage.
#[must_use]
pub fn stage_progress(
    plan: &ProgramPlan,
    sessions: &[SessionRecord],
    current_week: u32,
) -> BTreeMap<StageId, StageProgress> {
    let mut totals: HashMap<StageId, (f64, u32)> = HashMap::new();
    for session in sessions {
        let Some(week) = plan.program_week(session.start_time.date_naive()) else {
            continue;
        };
        let Some(stage) = plan.stages().iter().find(|s| s.weeks().contains(week)) else {
            continue;
        };
        let entry = totals.entry(stage.id()).or_default();
        entry.0 += session.duration_hours;
        entry.1 += 1;
    }

    plan.stages()
        .iter()
        .map(|stage| {
            let (hours, count) = totals.get(&stage.id()).copied().unwrap_or_default();
            (
                stage.id(),
                StageProgress::new(stage, hours, count, current_week),
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    pub week: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: f64,
    pub sessions: u32,
    pub target_hours: f64,
    pub percentage: f64,
}

/// One entry per elapsed program week, `1..=current_week`, summed from the daily logs.
#[must_use]
pub fn weekly_stats(
    plan: &ProgramPlan,
    daily_logs: &BTreeMap<NaiveDate, DailyLog>,
    current_week: u32,
) -> Vec<WeekStats> {
    let target = plan.weekly_target();
    (1..=current_week)
        .map(|week| {
            let (start_date, end_date) = plan.week_bounds(week);
            let (hours, sessions) = daily_logs
                .range(start_date..=end_date)
                .fold((0.0, 0), |(hours, sessions), (_, log)| {
                    (hours + log.hours, sessions + log.sessions)
                });
            let percentage = if target > 0.0 {
                hours / target * 100.0
            } else {
                0.0
            };
            WeekStats {
                week,
                start_date,
                end_date,
                hours,
                sessions,
                target_hours: target,
                percentage,
            }
        })
        .collect()
}
