use std::fmt;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracker_core::ProgramPlan;
use tracker_core::curriculum::is_weekend;
use tracker_core::model::StageId;

/// How far actual hours are from the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    SignificantlyAhead,
    OnTrack,
    SlightlyBehind,
    BehindSchedule,
    CriticallyBehind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl ScheduleStatus {
    /// Classify an `actual / expected` ratio.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.2 {
            Self::SignificantlyAhead
        } else if ratio >= 0.95 {
            Self::OnTrack
        } else if ratio >= 0.8 {
            Self::SlightlyBehind
        } else if ratio >= 0.6 {
            Self::BehindSchedule
        } else {
            Self::CriticallyBehind
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SignificantlyAhead => "Significantly Ahead",
            Self::OnTrack => "On Track",
            Self::SlightlyBehind => "Slightly Behind",
            Self::BehindSchedule => "Behind Schedule",
            Self::CriticallyBehind => "Critically Behind",
        }
    }

    #[must_use]
    pub fn urgency(self) -> Urgency {
        match self {
            Self::SignificantlyAhead | Self::OnTrack => Urgency::Low,
            Self::SlightlyBehind => Urgency::Medium,
            Self::BehindSchedule => Urgency::High,
            Self::CriticallyBehind => Urgency::Critical,
        }
    }
}

/// Snapshot of actual progress against the program schedule on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStatus {
    pub status: ScheduleStatus,
    pub label: &'static str,
    pub urgency: Urgency,
    pub current_week: u32,
    pub current_stage: StageId,
    pub expected_hours: f64,
    pub actual_hours: f64,
    pub ratio: f64,
    pub daily_target: f64,
    pub is_weekend: bool,
    pub remaining_weeks: u32,
    pub remaining_hours: f64,
    pub hours_per_day_needed: f64,
}

impl ProgressStatus {
    /// Compute the status for `today` given the hours logged so far.
    #[must_use]
    pub fn compute(plan: &ProgramPlan, actual_hours: f64, today: NaiveDate) -> Self {
        let current_week = plan.week_for_date(today);
        let expected_hours = expected_hours_to_date(plan, today);
        let ratio = if expected_hours > 0.0 {
            actual_hours / expected_hours
        } else {
            0.0
        };
        let status = ScheduleStatus::from_ratio(ratio);

        let remaining_weeks = plan.total_weeks().saturating_sub(current_week);
        let remaining_hours = (plan.total_hours() - actual_hours).max(0.0);
        let remaining_days = f64::from(remaining_weeks.saturating_mul(7).max(1));

        Self {
            status,
            label: status.label(),
            urgency: status.urgency(),
            current_week,
            current_stage: plan.stage_for_week(current_week),
            expected_hours,
            actual_hours,
            ratio,
            daily_target: plan.daily_target(today),
            is_weekend: is_weekend(today),
            remaining_weeks,
            remaining_hours,
            hours_per_day_needed: remaining_hours / remaining_days,
        }
    }
}

/// Sum of daily targets from the program start through `today` inclusive, capped at the
/// program total. Zero when `today` precedes the start.
#[must_use]
pub fn expected_hours_to_date(plan: &ProgramPlan, today: NaiveDate) -> f64 {
    let cap = plan.total_hours();
    let mut expected = 0.0;
    let mut day = plan.start_date();
    while day <= today && expected < cap {
        expected += plan.daily_target(day);
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    expected.min(cap)
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_weekdays_from_start_expect_eight_hours() {
        let plan = ProgramPlan::standard();
        assert_eq!(expected_hours_to_date(&plan, date(2025, 7, 16)), 8.0);
    }

    #[test]
    fn first_full_week_matches_weekly_target() {
        let plan = ProgramPlan::standard();
        // Tue..Mon covers five weekdays and one weekend.
        assert_eq!(expected_hours_to_date(&plan, date(2025, 7, 21)), 36.0);
    }

    #[test]
    fn before_start_expects_nothing() {
        let plan = ProgramPlan::standard();
        assert_eq!(expected_hours_to_date(&plan, date(2025, 7, 14)), 0.0);
        let status = ProgressStatus::compute(&plan, 3.0, date(2025, 7, 1));
        assert_eq!(status.ratio, 0.0);
        assert_eq!(status.status, ScheduleStatus::CriticallyBehind);
    }

    #[test]
    fn expected_hours_are_capped_at_program_total() {
        let plan = ProgramPlan::standard();
        assert_eq!(expected_hours_to_date(&plan, date(2027, 1, 1)), 1600.0);
    }

    #[test]
    fn thresholds_pick_status_and_urgency() {
        let cases = [
            (1.2, ScheduleStatus::SignificantlyAhead, Urgency::Low),
            (0.95, ScheduleStatus::OnTrack, Urgency::Low),
            (0.94, ScheduleStatus::SlightlyBehind, Urgency::Medium),
            (0.8, ScheduleStatus::SlightlyBehind, Urgency::Medium),
            (0.6, ScheduleStatus::BehindSchedule, Urgency::High),
            (0.59, ScheduleStatus::CriticallyBehind, Urgency::Critical),
        ];
        for (ratio, status, urgency) in cases {
            let got = ScheduleStatus::from_ratio(ratio);
            assert_eq!(got, status, "ratio {ratio}");
            assert_eq!(got.urgency(), urgency, "ratio {ratio}");
        }
    }

    #[test]
    fn status_on_second_day_of_program() {
        let plan = ProgramPlan::standard();
        let status = ProgressStatus::compute(&plan, 8.0, date(2025, 7, 16));

        assert_eq!(status.current_week, 1);
        assert_eq!(status.current_stage, StageId::new(1));
        assert_eq!(status.status, ScheduleStatus::OnTrack);
        assert_eq!(status.daily_target, 4.0);
        assert!(!status.is_weekend);
        assert_eq!(status.remaining_weeks, 47);
        assert_eq!(status.remaining_hours, 1592.0);
        assert!((status.hours_per_day_needed - 1592.0 / 329.0).abs() < 1e-9);
    }

    #[test]
    fn final_week_divides_by_one_day() {
        let plan = ProgramPlan::standard();
        let status = ProgressStatus::compute(&plan, 1590.0, date(2026, 6, 20));

        assert_eq!(status.current_week, 48);
        assert_eq!(status.remaining_weeks, 0);
        assert_eq!(status.hours_per_day_needed, 10.0);
        assert!(status.is_weekend);
        assert_eq!(status.daily_target, 8.0);
    }

    #[test]
    fn status_serializes_snake_case() {
        let plan = ProgramPlan::standard();
        let status = ProgressStatus::compute(&plan, 0.0, date(2025, 7, 16));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "critically_behind");
        assert_eq!(json["urgency"], "critical");
        assert_eq!(json["label"], "Critically Behind");
    }
}
