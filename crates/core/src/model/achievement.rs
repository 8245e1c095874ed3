use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HOUR_MILESTONES: [u32; 7] = [10, 25, 50, 100, 200, 500, 1000];
pub const STREAK_MILESTONES: [u32; 6] = [3, 7, 14, 30, 60, 100];
pub const SESSION_MILESTONES: [u32; 6] = [5, 25, 50, 100, 250, 500];

/// Metric an achievement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementKind {
    Hours,
    Streak,
    Sessions,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 3] = [Self::Hours, Self::Streak, Self::Sessions];

    #[must_use]
    pub fn milestones(self) -> &'static [u32] {
        match self {
            Self::Hours => &HOUR_MILESTONES,
            Self::Streak => &STREAK_MILESTONES,
            Self::Sessions => &SESSION_MILESTONES,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Streak => "streak",
            Self::Sessions => "sessions",
        }
    }
}

/// Identity of a milestone, serialized as `<kind>_<threshold>` (e.g. `hours_10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AchievementId {
    kind: AchievementKind,
    threshold: u32,
}

impl AchievementId {
    /// Returns `None` when `threshold` is not one of the kind's milestones.
    #[must_use]
    pub fn new(kind: AchievementKind, threshold: u32) -> Option<Self> {
        kind.milestones()
            .contains(&threshold)
            .then_some(Self { kind, threshold })
    }

    #[must_use]
    pub fn kind(&self) -> AchievementKind {
        self.kind
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub fn title(&self) -> String {
        match self.kind {
            AchievementKind::Hours => format!("{} Hours Completed", self.threshold),
            AchievementKind::Streak => format!("{}-Day Streak", self.threshold),
            AchievementKind::Sessions => format!("{} Sessions Completed", self.threshold),
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self.kind {
            AchievementKind::Hours => {
                format!("You have completed {} hours of learning!", self.threshold)
            }
            AchievementKind::Streak => format!(
                "You have maintained a {}-day learning streak!",
                self.threshold
            ),
            AchievementKind::Sessions => format!(
                "You have completed {} learning sessions!",
                self.threshold
            ),
        }
    }

    /// Every milestone across all kinds, in table order.
    pub fn all() -> impl Iterator<Item = AchievementId> {
        AchievementKind::ALL.into_iter().flat_map(|kind| {
            kind.milestones()
                .iter()
                .map(move |&threshold| AchievementId { kind, threshold })
        })
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.prefix(), self.threshold)
    }
}

impl FromStr for AchievementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, threshold) = s
            .rsplit_once('_')
            .ok_or_else(|| format!("malformed achievement id: {s}"))?;
        let kind = AchievementKind::ALL
            .into_iter()
            .find(|kind| kind.prefix() == prefix)
            .ok_or_else(|| format!("unknown achievement kind: {prefix}"))?;
        let threshold: u32 = threshold
            .parse()
            .map_err(|_| format!("malformed achievement threshold: {s}"))?;
        Self::new(kind, threshold).ok_or_else(|| format!("unknown milestone: {s}"))
    }
}

impl TryFrom<String> for AchievementId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AchievementId> for String {
    fn from(value: AchievementId) -> Self {
        value.to_string()
    }
}

/// A milestone at the moment it was earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub earned_at: DateTime<Utc>,
}

impl Achievement {
    #[must_use]
    pub fn earned(id: AchievementId, earned_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: id.title(),
            description: id.description(),
            earned_at,
        }
    }
}

/// Snapshot of the counters milestones are compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub total_hours: f64,
    pub current_streak: u32,
    pub total_sessions: u32,
}

impl Metrics {
    fn reached(&self, id: AchievementId) -> bool {
        match id.kind {
            AchievementKind::Hours => self.total_hours >= f64::from(id.threshold),
            AchievementKind::Streak => self.current_streak >= id.threshold,
            AchievementKind::Sessions => self.total_sessions >= id.threshold,
        }
    }
}

/// Milestones whose threshold `metrics` meets, regardless of whether they were earned before.
pub fn earned_milestones(metrics: Metrics) -> impl Iterator<Item = AchievementId> {
    AchievementId::all().filter(move |id| metrics.reached(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_their_string_form() {
        let id = AchievementId::new(AchievementKind::Streak, 14).unwrap();
        assert_eq!(id.to_string(), "streak_14");
        assert_eq!("streak_14".parse::<AchievementId>().unwrap(), id);
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"streak_14\"".to_owned()
        );
    }

    #[test]
    fn unknown_thresholds_are_not_achievements() {
        assert!(AchievementId::new(AchievementKind::Hours, 11).is_none());
        assert!("hours_11".parse::<AchievementId>().is_err());
        assert!("minutes_10".parse::<AchievementId>().is_err());
    }

    #[test]
    fn milestones_reached_by_metrics() {
        let metrics = Metrics {
            total_hours: 26.0,
            current_streak: 7,
            total_sessions: 4,
        };
        let ids: Vec<String> = earned_milestones(metrics).map(|id| id.to_string()).collect();
        assert_eq!(ids, ["hours_10", "hours_25", "streak_3", "streak_7"]);
    }

    #[test]
    fn titles_follow_the_kind() {
        let id = AchievementId::new(AchievementKind::Sessions, 25).unwrap();
        assert_eq!(id.title(), "25 Sessions Completed");
        let id = AchievementId::new(AchievementKind::Streak, 3).unwrap();
        assert_eq!(id.title(), "3-Day Streak");
    }
}
