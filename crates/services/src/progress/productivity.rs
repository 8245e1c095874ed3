use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use tracker_core::model::{ProgressState, SessionRecord};

/// Logged days per velocity chunk.
const CHUNK_DAYS: usize = 7;
/// Relative change between chunk averages that counts as a trend.
const TREND_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl VelocityTrend {
    /// Compare the average of the last two chunks to the average of the earlier ones.
    #[must_use]
    pub fn from_chunks(chunks: &[f64]) -> Self {
        if chunks.len() < 2 {
            return Self::Stable;
        }
        let (older, recent) = chunks.split_at(chunks.len() - 2);
        let recent_avg = mean(recent);
        let older_avg = if older.is_empty() {
            recent_avg
        } else {
            mean(older)
        };

        if recent_avg > older_avg * (1.0 + TREND_MARGIN) {
            Self::Increasing
        } else if recent_avg < older_avg * (1.0 - TREND_MARGIN) {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityStats {
    pub total_days_learned: usize,
    pub best_day: Option<BestDay>,
    /// Hours per run of seven logged dates, oldest first.
    pub chunk_hours: Vec<f64>,
    pub velocity_trend: VelocityTrend,
    /// UTC hour at which most sessions started; on a tie the hour seen first in history wins.
    pub most_productive_hour: Option<u32>,
    pub avg_session_length: f64,
    pub consistency_score: f64,
}

impl ProductivityStats {
    #[must_use]
    pub fn compute(progress: &ProgressState, sessions: &[SessionRecord]) -> Self {
        let logs = progress.daily_logs();

        let best_day = logs
            .iter()
            .filter(|(_, log)| log.hours > 0.0)
            .fold(None::<BestDay>, |best, (date, log)| match best {
                Some(best) if best.hours >= log.hours => Some(best),
                _ => Some(BestDay {
                    date: *date,
                    hours: log.hours,
                }),
            });

        let hours: Vec<f64> = logs.values().map(|log| log.hours).collect();
        let chunk_hours: Vec<f64> = hours
            .chunks(CHUNK_DAYS)
            .map(|chunk| chunk.iter().sum())
            .collect();

        let most_productive_hour = most_common_start_hour(sessions);

        let avg_session_length = if progress.total_sessions() > 0 {
            progress.total_hours() / f64::from(progress.total_sessions())
        } else {
            0.0
        };

        Self {
            total_days_learned: logs.len(),
            best_day,
            velocity_trend: VelocityTrend::from_chunks(&chunk_hours),
            chunk_hours,
            most_productive_hour,
            avg_session_length,
            consistency_score: consistency_score(progress.current_streak()),
        }
    }
}

/// `min(100, streak / 7 * 100)`.
#[must_use]
pub fn consistency_score(current_streak: u32) -> f64 {
    (f64::from(current_streak) / 7.0 * 100.0).min(100.0)
}

/// Start hour shared by the most sessions, in history order so ties go to the first seen.
fn most_common_start_hour(sessions: &[SessionRecord]) -> Option<u32> {
    let mut counts: Vec<(u32, u32)> = Vec::new();
    for session in sessions {
        let hour = session.start_time.hour();
        match counts.iter_mut().find(|(seen, _)| *seen == hour) {
            Some((_, count)) => *count += 1,
            None => counts.push((hour, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None::<(u32, u32)>, |best, (hour, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((hour, count)),
        })
        .map(|(hour, _)| hour)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tracker_core::model::{SessionDetailsDraft, SessionId};
    use tracker_core::time::fixed_now;

    #[test]
    fn trend_needs_two_chunks() {
        assert_eq!(VelocityTrend::from_chunks(&[]), VelocityTrend::Stable);
        assert_eq!(VelocityTrend::from_chunks(&[10.0]), VelocityTrend::Stable);
        assert_eq!(VelocityTrend::from_chunks(&[1.0, 50.0]), VelocityTrend::Stable);
    }

    #[test]
    fn trend_compares_recent_pair_to_history() {
        assert_eq!(
            VelocityTrend::from_chunks(&[10.0, 12.0, 12.0]),
            VelocityTrend::Increasing
        );
        assert_eq!(
            VelocityTrend::from_chunks(&[10.0, 8.0, 8.0]),
            VelocityTrend::Decreasing
        );
        assert_eq!(
            VelocityTrend::from_chunks(&[10.0, 10.5, 10.5]),
            VelocityTrend::Stable
        );
    }

    #[test]
    fn mean_of_chunks() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 6.0]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn productive_hour_tie_goes_to_first_seen() {
        let now = fixed_now();
        let details = SessionDetailsDraft::default().validate().unwrap();
        let at = |days_ago: i64, hour: u32| {
            let day = (now - Duration::days(days_ago)).date_naive();
            let start = Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap());
            SessionRecord::manual(SessionId::generate(), start, 1.0, details.clone()).unwrap()
        };
        let sessions = vec![at(3, 20), at(2, 7), at(1, 7), at(0, 20)];

        assert_eq!(most_common_start_hour(&sessions), Some(20));
        assert_eq!(most_common_start_hour(&sessions[1..]), Some(7));
        assert_eq!(most_common_start_hour(&[]), None);
    }

    #[test]
    fn consistency_caps_at_one_hundred() {
        assert_eq!(consistency_score(0), 0.0);
        assert!((consistency_score(3) - 300.0 / 7.0).abs() < 1e-9);
        assert_eq!(consistency_score(7), 100.0);
        assert_eq!(consistency_score(30), 100.0);
    }

    #[test]
    fn empty_progress_has_no_best_day_or_hour() {
        let stats = ProductivityStats::compute(&ProgressState::new(fixed_now()), &[]);
        assert_eq!(stats.total_days_learned, 0);
        assert!(stats.best_day.is_none());
        assert!(stats.most_productive_hour.is_none());
        assert_eq!(stats.avg_session_length, 0.0);
        assert!(stats.chunk_hours.is_empty());
    }

    #[test]
    fn stats_from_recorded_sessions() {
        let now = fixed_now();
        let mut progress = ProgressState::new(now);
        let mut sessions = Vec::new();
        let plan = [(0, 9, 1.0), (1, 9, 3.0), (2, 14, 2.0)];
        for (days_ago, hour, hours) in plan {
            let day = (now - Duration::days(days_ago)).date_naive();
            let start = Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap());
            let details = SessionDetailsDraft::default().validate().unwrap();
            let record = SessionRecord::manual(SessionId::generate(), start, hours, details).unwrap();
            progress.record_session(&record, day, now);
            sessions.push(record);
        }

        let stats = ProductivityStats::compute(&progress, &sessions);
        assert_eq!(stats.total_days_learned, 3);
        let best = stats.best_day.unwrap();
        assert_eq!(best.date, (now - Duration::days(1)).date_naive());
        assert_eq!(best.hours, 3.0);
        assert_eq!(stats.chunk_hours, vec![6.0]);
        assert_eq!(stats.velocity_trend, VelocityTrend::Stable);
        assert_eq!(stats.most_productive_hour, Some(9));
        assert!((stats.avg_session_length - 2.0).abs() < 1e-9);
        assert!((stats.consistency_score - 300.0 / 7.0).abs() < 1e-9);
    }
}
