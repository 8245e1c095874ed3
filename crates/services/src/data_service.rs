use chrono::{DateTime, Utc};
use serde::Serialize;
use storage::repository::Storage;
use tracing::{info, warn};
use tracker_core::model::{Goals, ProgressState, SessionRecord};

use crate::Clock;
use crate::documents::Documents;
use crate::sessions::SessionRegistry;

/// All persisted documents in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerExport {
    pub progress: ProgressState,
    pub sessions: Vec<SessionRecord>,
    pub goals: Goals,
    pub exported_at: DateTime<Utc>,
}

/// Bulk export and reset of everything the tracker stores.
#[derive(Clone)]
pub struct DataService {
    clock: Clock,
    registry: SessionRegistry,
    documents: Documents,
}

impl DataService {
    #[must_use]
    pub fn new(clock: Clock, registry: SessionRegistry, storage: &Storage) -> Self {
        Self {
            clock,
            registry,
            documents: Documents::new(storage),
        }
    }

    pub async fn export(&self) -> TrackerExport {
        let now = self.clock.now();
        TrackerExport {
            progress: self.documents.progress(now).await,
            sessions: self.documents.sessions().await,
            goals: self.documents.goals().await,
            exported_at: now,
        }
    }

    /// Rewrite every document to its default and drop open sessions.
    pub async fn reset(&self) {
        let dropped = self.registry.len();
        self.registry.clear();
        if dropped > 0 {
            warn!(dropped, "active sessions discarded by reset");
        }

        self.documents
            .save_progress(&ProgressState::new(self.clock.now()))
            .await;
        self.documents.save_sessions(&[]).await;
        self.documents.save_goals(&Goals::default()).await;
        info!("all tracker data reset");
    }
}
