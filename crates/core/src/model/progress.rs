use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Achievement, AchievementId, Metrics, SessionRecord, StageId, earned_milestones};

/// Per-day bucket of study activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub hours: f64,
    pub sessions: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Checked,
    Unchecked,
}

/// Result of flipping a topic or project checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub completed: Vec<usize>,
}

/// Singleton aggregate of everything learned so far.
///
/// Only `record_session`, the toggles, and the streak/achievement recomputations
/// mutate it, so totals always agree with the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    total_hours: f64,
    total_sessions: u32,
    current_streak: u32,
    longest_streak: u32,
    #[serde(default)]
    last_session_date: Option<NaiveDate>,
    #[serde(default)]
    achievements: Vec<AchievementId>,
    #[serde(default)]
    daily_logs: BTreeMap<NaiveDate, DailyLog>,
    #[serde(default)]
    completed_topics: BTreeMap<StageId, BTreeSet<usize>>,
    #[serde(default)]
    completed_projects: BTreeMap<StageId, BTreeSet<usize>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProgressState {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_hours: 0.0,
            total_sessions: 0,
            current_streak: 0,
            longest_streak: 0,
            last_session_date: None,
            achievements: Vec::new(),
            daily_logs: BTreeMap::new(),
            completed_topics: BTreeMap::new(),
            completed_projects: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    #[must_use]
    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    #[must_use]
    pub fn last_session_date(&self) -> Option<NaiveDate> {
        self.last_session_date
    }

    /// Earned milestone ids, in the order they were earned.
    #[must_use]
    pub fn achievements(&self) -> &[AchievementId] {
        &self.achievements
    }

    #[must_use]
    pub fn daily_logs(&self) -> &BTreeMap<NaiveDate, DailyLog> {
        &self.daily_logs
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn completed_topics(&self, stage: StageId) -> Vec<usize> {
        indices(&self.completed_topics, stage)
    }

    #[must_use]
    pub fn completed_projects(&self, stage: StageId) -> Vec<usize> {
        indices(&self.completed_projects, stage)
    }

    #[must_use]
    pub fn metrics(&self) -> Metrics {
        Metrics {
            total_hours: self.total_hours,
            current_streak: self.current_streak,
            total_sessions: self.total_sessions,
        }
    }

    /// Fold a completed session into the totals and the `log_date` bucket, then refresh
    /// the streak and achievements. Returns achievements earned by this session.
    pub fn record_session(
        &mut self,
        record: &SessionRecord,
        log_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Vec<Achievement> {
        self.total_hours += record.duration_hours;
        self.total_sessions = self.total_sessions.saturating_add(1);
        self.updated_at = now;
        self.last_session_date = self.last_session_date.max(Some(log_date));

        let log = self.daily_logs.entry(log_date).or_default();
        log.hours += record.duration_hours;
        log.sessions = log.sessions.saturating_add(1);
        log.topics.extend(record.topics.iter().cloned());
        if !record.notes.is_empty() {
            log.notes.push(record.notes.clone());
        }

        self.recompute_streak(now.date_naive());
        self.check_achievements(now)
    }

    /// Recount consecutive study days ending today. A day without hours today
    /// means the current streak is zero.
    ///
    /// Depends only on `daily_logs` and `today`; `longest_streak` only ever grows.
    pub fn recompute_streak(&mut self, today: NaiveDate) {
        let studied = |date: NaiveDate| self.daily_logs.get(&date).is_some_and(|log| log.hours > 0.0);

        let mut cursor = today;
        let mut streak = 0_u32;
        while studied(cursor) {
            streak = streak.saturating_add(1);
            cursor -= Duration::days(1);
        }

        self.current_streak = streak;
        self.longest_streak = self.longest_streak.max(streak);
    }

    /// Award every milestone the current metrics meet that is not already held.
    ///
    /// Earned ids are never removed, even if a metric later drops below the threshold.
    pub fn check_achievements(&mut self, now: DateTime<Utc>) -> Vec<Achievement> {
        let fresh: Vec<AchievementId> = earned_milestones(self.metrics())
            .filter(|id| !self.achievements.contains(id))
            .collect();
        self.achievements.extend(fresh.iter().copied());
        fresh
            .into_iter()
            .map(|id| Achievement::earned(id, now))
            .collect()
    }

    /// Flip completion of a topic index. Bounds are checked by the caller against the plan.
    pub fn toggle_topic(&mut self, stage: StageId, index: usize, now: DateTime<Utc>) -> ToggleOutcome {
        self.updated_at = now;
        toggle(&mut self.completed_topics, stage, index)
    }

    /// Flip completion of a project index. Bounds are checked by the caller against the plan.
    pub fn toggle_project(
        &mut self,
        stage: StageId,
        index: usize,
        now: DateTime<Utc>,
    ) -> ToggleOutcome {
        self.updated_at = now;
        toggle(&mut self.completed_projects, stage, index)
    }
}

fn indices(map: &BTreeMap<StageId, BTreeSet<usize>>, stage: StageId) -> Vec<usize> {
    map.get(&stage)
        .map(|set| set.iter().copied().collect())
        .unwrap_or_default()
}

fn toggle(
    map: &mut BTreeMap<StageId, BTreeSet<usize>>,
    stage: StageId,
    index: usize,
) -> ToggleOutcome {
    let set = map.entry(stage).or_default();
    let action = if set.remove(&index) {
        ToggleAction::Unchecked
    } else {
        set.insert(index);
        ToggleAction::Checked
    };
    let completed = set.iter().copied().collect();
    if set.is_empty() {
        map.remove(&stage);
    }
    ToggleOutcome { action, completed }
}
