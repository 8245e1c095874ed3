use std::path::Path;
use std::sync::Arc;

use storage::repository::Storage;
use tracing::debug;
use tracker_core::{CurriculumError, ProgramPlan};

use crate::Clock;
use crate::data_service::DataService;
use crate::goals_service::GoalsService;
use crate::insights::LearningInsights;
use crate::progress::ProgressAggregator;
use crate::sessions::{SessionLifecycleService, SessionRegistry};
use crate::stage_service::StageService;

/// Assembles every tracker service over one storage backend, clock, and plan.
///
/// All services share the same `SessionRegistry`, so sessions started through
/// `sessions()` show up on the dashboard and are dropped by `data().reset()`.
#[derive(Clone)]
pub struct TrackerServices {
    clock: Clock,
    plan: Arc<ProgramPlan>,
    sessions: Arc<SessionLifecycleService>,
    progress: Arc<ProgressAggregator>,
    stages: Arc<StageService>,
    goals: Arc<GoalsService>,
    data: Arc<DataService>,
}

impl TrackerServices {
    /// # Errors
    ///
    /// Returns `CurriculumError` if the plan's stages do not cover the program.
    pub fn new(storage: &Storage, clock: Clock, plan: ProgramPlan) -> Result<Self, CurriculumError> {
        plan.validate()?;
        let plan = Arc::new(plan);
        let registry = SessionRegistry::new();

        Ok(Self {
            clock,
            sessions: Arc::new(SessionLifecycleService::new(
                clock,
                registry.clone(),
                storage,
            )),
            progress: Arc::new(ProgressAggregator::new(
                clock,
                Arc::clone(&plan),
                registry.clone(),
                storage,
            )),
            stages: Arc::new(StageService::new(clock, Arc::clone(&plan), storage)),
            goals: Arc::new(GoalsService::new(storage)),
            data: Arc::new(DataService::new(clock, registry, storage)),
            plan,
        })
    }

    /// Build services backed by JSON documents in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the plan is invalid.
    pub fn json_dir(
        dir: impl AsRef<Path>,
        clock: Clock,
        plan: ProgramPlan,
    ) -> Result<Self, CurriculumError> {
        debug!(dir = %dir.as_ref().display(), "opening JSON storage");
        Self::new(&Storage::json_dir(dir), clock, plan)
    }

    /// Build services backed by in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the plan is invalid.
    pub fn in_memory(clock: Clock, plan: ProgramPlan) -> Result<Self, CurriculumError> {
        Self::new(&Storage::in_memory(), clock, plan)
    }

    #[must_use]
    pub fn plan(&self) -> &ProgramPlan {
        &self.plan
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionLifecycleService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressAggregator> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn stages(&self) -> Arc<StageService> {
        Arc::clone(&self.stages)
    }

    #[must_use]
    pub fn goals(&self) -> Arc<GoalsService> {
        Arc::clone(&self.goals)
    }

    #[must_use]
    pub fn data(&self) -> Arc<DataService> {
        Arc::clone(&self.data)
    }

    /// Commentary built from the current status, progress, and stage totals.
    pub async fn insights(&self) -> LearningInsights {
        let status = self.progress.progress_status().await;
        let progress = self.progress.progress().await;
        let stages = self.progress.stage_progress().await;
        LearningInsights::generate(&progress, &status, &stages, self.clock.now())
    }
}
