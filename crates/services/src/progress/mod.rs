//! Schedule comparison and statistics derived from the persisted documents.

mod aggregator;
mod productivity;
mod stages;
mod status;

pub use aggregator::{Dashboard, ProgressAggregator, RECENT_SESSIONS};
pub use productivity::{BestDay, ProductivityStats, VelocityTrend, consistency_score};
pub use stages::{StageLifecycle, StageProgress, WeekStats, stage_progress, weekly_stats};
pub use status::{ProgressStatus, ScheduleStatus, Urgency, expected_hours_to_date};
