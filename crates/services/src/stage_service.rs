use std::sync::Arc;

use serde::Serialize;
use storage::repository::Storage;
use tracing::debug;
use tracker_core::model::{StageId, ToggleOutcome};
use tracker_core::{ProgramPlan, Stage};

use crate::Clock;
use crate::documents::Documents;
use crate::error::StageError;
use crate::progress::{StageProgress, stage_progress};

/// A stage with its computed progress and checked topics/projects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDetails {
    pub stage: Stage,
    pub progress: StageProgress,
    pub completed_topics: Vec<usize>,
    pub completed_projects: Vec<usize>,
}

/// Stage lookups and topic/project completion toggles.
#[derive(Clone)]
pub struct StageService {
    clock: Clock,
    plan: Arc<ProgramPlan>,
    documents: Documents,
}

impl StageService {
    #[must_use]
    pub fn new(clock: Clock, plan: Arc<ProgramPlan>, storage: &Storage) -> Self {
        Self {
            clock,
            plan,
            documents: Documents::new(storage),
        }
    }

    /// # Errors
    ///
    /// Returns `StageError::UnknownStage` if the plan has no such stage.
    pub async fn details(&self, stage_id: StageId) -> Result<StageDetails, StageError> {
        let stage = self.stage(stage_id)?.clone();
        let sessions = self.documents.sessions().await;
        let progress = self.documents.progress(self.clock.now()).await;

        let current_week = self.plan.week_for_date(self.clock.today());
        let mut all = stage_progress(&self.plan, &sessions, current_week);
        let stage_progress = all
            .remove(&stage_id)
            .ok_or(StageError::UnknownStage(stage_id))?;

        Ok(StageDetails {
            stage,
            progress: stage_progress,
            completed_topics: progress.completed_topics(stage_id),
            completed_projects: progress.completed_projects(stage_id),
        })
    }

    /// Flip a topic's completion and persist the progress document.
    ///
    /// # Errors
    ///
    /// Returns `StageError::UnknownStage` or `StageError::TopicOutOfRange`.
    pub async fn toggle_topic(
        &self,
        stage_id: StageId,
        index: usize,
    ) -> Result<ToggleOutcome, StageError> {
        let len = self.stage(stage_id)?.topics().len();
        if index >= len {
            return Err(StageError::TopicOutOfRange {
                stage: stage_id,
                index,
                len,
            });
        }

        let now = self.clock.now();
        let mut progress = self.documents.progress(now).await;
        let outcome = progress.toggle_topic(stage_id, index, now);
        self.documents.save_progress(&progress).await;
        debug!(stage = %stage_id, index, action = ?outcome.action, "topic toggled");
        Ok(outcome)
    }

    /// Flip a project's completion and persist the progress document.
    ///
    /// # Errors
    ///
    /// Returns `StageError::UnknownStage` or `StageError::ProjectOutOfRange`.
    pub async fn toggle_project(
        &self,
        stage_id: StageId,
        index: usize,
    ) -> Result<ToggleOutcome, StageError> {
        let len = self.stage(stage_id)?.projects().len();
        if index >= len {
            return Err(StageError::ProjectOutOfRange {
                stage: stage_id,
                index,
                len,
            });
        }

        let now = self.clock.now();
        let mut progress = self.documents.progress(now).await;
        let outcome = progress.toggle_project(stage_id, index, now);
        self.documents.save_progress(&progress).await;
        debug!(stage = %stage_id, index, action = ?outcome.action, "project toggled");
        Ok(outcome)
    }

    fn stage(&self, stage_id: StageId) -> Result<&Stage, StageError> {
        self.plan
            .stage(stage_id)
            .ok_or(StageError::UnknownStage(stage_id))
    }
}
