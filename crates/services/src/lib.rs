#![forbid(unsafe_code)]

pub mod app_services;
pub mod data_service;
mod documents;
pub mod error;
pub mod goals_service;
pub mod insights;
pub mod progress;
pub mod sessions;
pub mod stage_service;

pub use tracker_core::Clock;

pub use app_services::TrackerServices;
pub use data_service::{DataService, TrackerExport};
pub use error::{GoalsServiceError, SessionError, StageError};
pub use goals_service::GoalsService;
pub use insights::{Insight, InsightKind, LearningInsights};
pub use progress::{
    Dashboard, ProductivityStats, ProgressAggregator, ProgressStatus, ScheduleStatus,
    StageLifecycle, StageProgress, Urgency, VelocityTrend, WeekStats,
};
pub use sessions::{EndedSession, SessionLifecycleService, SessionRegistry, SessionStatusView};
pub use stage_service::{StageDetails, StageService};
