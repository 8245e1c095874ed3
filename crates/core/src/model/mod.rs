mod achievement;
mod goals;
mod ids;
mod progress;
mod session;

pub use achievement::{
    Achievement, AchievementId, AchievementKind, HOUR_MILESTONES, Metrics, SESSION_MILESTONES,
    STREAK_MILESTONES, earned_milestones,
};
pub use goals::{Goals, GoalsError};
pub use ids::{SessionId, SessionIdError, StageId};
pub use progress::{DailyLog, ProgressState, ToggleAction, ToggleOutcome};
pub use session::{
    ActiveSession, DetailsError, Difficulty, RecordError, SessionAction, SessionDetails,
    SessionDetailsDraft, SessionRecord, SessionState, SessionStateError, MAX_MANUAL_HOURS,
};
