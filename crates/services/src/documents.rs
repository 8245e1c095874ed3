use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::repository::{
    DocumentKind, GoalsRepository, ProgressRepository, SessionHistoryRepository, Storage,
};
use tracing::{error, warn};
use tracker_core::model::{Goals, ProgressState, SessionRecord};

/// Whole-document access with the tracker's recovery policy applied.
///
/// Loads never fail: a missing, corrupt, or unreadable document becomes its default
/// (with a warning). Saves never fail either: errors are logged and dropped, and the
/// next successful save rewrites the document in full.
#[derive(Clone)]
pub(crate) struct Documents {
    progress: Arc<dyn ProgressRepository>,
    sessions: Arc<dyn SessionHistoryRepository>,
    goals: Arc<dyn GoalsRepository>,
}

impl Documents {
    pub(crate) fn new(storage: &Storage) -> Self {
        Self {
            progress: Arc::clone(&storage.progress),
            sessions: Arc::clone(&storage.sessions),
            goals: Arc::clone(&storage.goals),
        }
    }

    pub(crate) async fn progress(&self, now: DateTime<Utc>) -> ProgressState {
        match self.progress.load_progress().await {
            Ok(Some(progress)) => progress,
            Ok(None) => ProgressState::new(now),
            Err(err) => {
                warn!(document = %DocumentKind::Progress, error = %err, "load failed, using defaults");
                ProgressState::new(now)
            }
        }
    }

    pub(crate) async fn sessions(&self) -> Vec<SessionRecord> {
        match self.sessions.load_sessions().await {
            Ok(sessions) => sessions.unwrap_or_default(),
            Err(err) => {
                warn!(document = %DocumentKind::Sessions, error = %err, "load failed, using defaults");
                Vec::new()
            }
        }
    }

    pub(crate) async fn goals(&self) -> Goals {
        match self.goals.load_goals().await {
            Ok(goals) => goals.unwrap_or_default(),
            Err(err) => {
                warn!(document = %DocumentKind::Goals, error = %err, "load failed, using defaults");
                Goals::default()
            }
        }
    }

    pub(crate) async fn save_progress(&self, progress: &ProgressState) {
        if let Err(err) = self.progress.save_progress(progress).await {
            error!(document = %DocumentKind::Progress, error = %err, "save failed");
        }
    }

    pub(crate) async fn save_sessions(&self, sessions: &[SessionRecord]) {
        if let Err(err) = self.sessions.save_sessions(sessions).await {
            error!(document = %DocumentKind::Sessions, error = %err, "save failed");
        }
    }

    pub(crate) async fn save_goals(&self, goals: &Goals) {
        if let Err(err) = self.goals.save_goals(goals).await {
            error!(document = %DocumentKind::Goals, error = %err, "save failed");
        }
    }
}
