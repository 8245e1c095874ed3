use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use storage::repository::Storage;
use tracker_core::ProgramPlan;
use tracker_core::model::{ProgressState, SessionId, SessionRecord, StageId};

use super::productivity::ProductivityStats;
use super::stages::{StageProgress, WeekStats, stage_progress, weekly_stats};
use super::status::{ProgressStatus, expected_hours_to_date};
use crate::Clock;
use crate::documents::Documents;
use crate::sessions::SessionRegistry;

/// Sessions shown on the dashboard, newest first.
pub const RECENT_SESSIONS: usize = 10;

/// Everything the dashboard renders, computed from one read of each document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub status: ProgressStatus,
    pub progress: ProgressState,
    pub stage_progress: BTreeMap<StageId, StageProgress>,
    pub recent_sessions: Vec<SessionRecord>,
    pub weekly_stats: Vec<WeekStats>,
    pub active_sessions: Vec<SessionId>,
    pub total_achievements: usize,
}

/// Read-only views over the persisted progress and session history.
#[derive(Clone)]
pub struct ProgressAggregator {
    clock: Clock,
    plan: Arc<ProgramPlan>,
    registry: SessionRegistry,
    documents: Documents,
}

impl ProgressAggregator {
    #[must_use]
    pub fn new(
        clock: Clock,
        plan: Arc<ProgramPlan>,
        registry: SessionRegistry,
        storage: &Storage,
    ) -> Self {
        Self {
            clock,
            plan,
            registry,
            documents: Documents::new(storage),
        }
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn plan(&self) -> &ProgramPlan {
        &self.plan
    }

    #[must_use]
    pub fn current_week(&self) -> u32 {
        self.plan.week_for_date(self.clock.today())
    }

    #[must_use]
    pub fn expected_hours_to_date(&self, today: NaiveDate) -> f64 {
        expected_hours_to_date(&self.plan, today)
    }

    pub async fn progress(&self) -> ProgressState {
        self.documents.progress(self.clock.now()).await
    }

    pub async fn progress_status(&self) -> ProgressStatus {
        let progress = self.progress().await;
        ProgressStatus::compute(&self.plan, progress.total_hours(), self.clock.today())
    }

    pub async fn stage_progress(&self) -> BTreeMap<StageId, StageProgress> {
        let sessions = self.documents.sessions().await;
        stage_progress(&self.plan, &sessions, self.current_week())
    }

    pub async fn weekly_stats(&self) -> Vec<WeekStats> {
        let progress = self.progress().await;
        weekly_stats(&self.plan, progress.daily_logs(), self.current_week())
    }

    pub async fn productivity_stats(&self) -> ProductivityStats {
        let progress = self.progress().await;
        let sessions = self.documents.sessions().await;
        ProductivityStats::compute(&progress, &sessions)
    }

    pub async fn dashboard(&self) -> Dashboard {
        let today = self.clock.today();
        let current_week = self.plan.week_for_date(today);
        let progress = self.progress().await;
        let sessions = self.documents.sessions().await;

        let mut recent_sessions = sessions.clone();
        recent_sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        recent_sessions.truncate(RECENT_SESSIONS);

        Dashboard {
            status: ProgressStatus::compute(&self.plan, progress.total_hours(), today),
            stage_progress: stage_progress(&self.plan, &sessions, current_week),
            recent_sessions,
            weekly_stats: weekly_stats(&self.plan, progress.daily_logs(), current_week),
            active_sessions: self.registry.ids(),
            total_achievements: progress.achievements().len(),
            progress,
        }
    }
}

impl std::fmt::Debug for ProgressAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressAggregator")
            .field("clock", &self.clock)
            .field("start_date", &self.plan.start_date())
            .finish_non_exhaustive()
    }
}
