use storage::repository::Storage;
use tracing::info;
use tracker_core::model::Goals;

use crate::documents::Documents;
use crate::error::GoalsServiceError;

/// Reads and updates the daily/weekly goal document.
#[derive(Clone)]
pub struct GoalsService {
    documents: Documents,
}

impl GoalsService {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        Self {
            documents: Documents::new(storage),
        }
    }

    /// Current goals, or the defaults when none were saved.
    pub async fn load(&self) -> Goals {
        self.documents.goals().await
    }

    /// Validate and persist new goals.
    ///
    /// # Errors
    ///
    /// Returns `GoalsServiceError::Goals` if either value is negative or not finite.
    pub async fn set_goals(
        &self,
        daily_hours: f64,
        weekly_hours: f64,
    ) -> Result<Goals, GoalsServiceError> {
        let goals = Goals::new(daily_hours, weekly_hours)?;
        self.documents.save_goals(&goals).await;
        info!(daily_hours, weekly_hours, "goals updated");
        Ok(goals)
    }
}
