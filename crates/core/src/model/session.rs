use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::SessionId;
use crate::time::{hours_between, span_from_hours};

/// Upper bound accepted for a manually entered session.
pub const MAX_MANUAL_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Paused,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Pause,
    Resume,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Pause => f.write_str("pause"),
            SessionAction::Resume => f.write_str("resume"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("cannot {action} a session that is {state}")]
    InvalidTransition {
        state: SessionState,
        action: SessionAction,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DetailsError {
    #[error("difficulty must be between 1 and 5, got {0}")]
    DifficultyOutOfRange(u8),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("session duration must be between 0 and 24 hours, got {0}")]
    InvalidDuration(f64),
}

/// Self-reported difficulty of a session, 1 (easy) through 5 (hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// # Errors
    ///
    /// Returns `DetailsError::DifficultyOutOfRange` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, DetailsError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DetailsError::DifficultyOutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DetailsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

/// Unvalidated notes and ratings collected when a session is closed.
#[derive(Debug, Clone)]
pub struct SessionDetailsDraft {
    pub notes: String,
    pub topics: Vec<String>,
    pub mood: String,
    pub difficulty: u8,
}

impl Default for SessionDetailsDraft {
    fn default() -> Self {
        Self {
            notes: String::new(),
            topics: Vec::new(),
            mood: String::new(),
            difficulty: 3,
        }
    }
}

impl SessionDetailsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize text fields and validate the difficulty rating.
    ///
    /// # Errors
    ///
    /// Returns `DetailsError` if the difficulty is outside `1..=5`.
    pub fn validate(self) -> Result<SessionDetails, DetailsError> {
        let difficulty = Difficulty::new(self.difficulty)?;
        let topics = self
            .topics
            .into_iter()
            .map(|topic| topic.trim().to_owned())
            .filter(|topic| !topic.is_empty())
            .collect();

        Ok(SessionDetails {
            notes: self.notes.trim().to_owned(),
            topics,
            mood: self.mood.trim().to_owned(),
            difficulty,
        })
    }
}

/// Validated session notes and ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDetails {
    notes: String,
    topics: Vec<String>,
    mood: String,
    difficulty: Difficulty,
}

impl SessionDetails {
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn mood(&self) -> &str {
        &self.mood
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// A session that is still running or paused.
///
/// Every transition takes the timestamp explicitly so the services layer clock
/// stays the single time source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    id: SessionId,
    started_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    paused: TimeDelta,
}

impl ActiveSession {
    #[must_use]
    pub fn start(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            started_at,
            paused_at: None,
            paused: TimeDelta::zero(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn paused_at(&self) -> Option<DateTime<Utc>> {
        self.paused_at
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.paused_at.is_some() {
            SessionState::Paused
        } else {
            SessionState::Active
        }
    }

    /// Pause time accumulated by completed pause/resume cycles.
    #[must_use]
    pub fn paused_hours(&self) -> f64 {
        hours_between(self.paused)
    }

    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidTransition` if the session is already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), SessionStateError> {
        if self.paused_at.is_some() {
            return Err(SessionStateError::InvalidTransition {
                state: SessionState::Paused,
                action: SessionAction::Pause,
            });
        }
        self.paused_at = Some(now);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidTransition` if the session is not paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), SessionStateError> {
        let Some(paused_at) = self.paused_at.take() else {
            return Err(SessionStateError::InvalidTransition {
                state: SessionState::Active,
                action: SessionAction::Resume,
            });
        };
        self.paused += (now - paused_at).max(TimeDelta::zero());
        Ok(())
    }

    /// Active study time so far. While paused, the clock stops at the pause start.
    #[must_use]
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        let reference = self.paused_at.unwrap_or(now);
        hours_between(self.active_span(reference))
    }

    /// Close the session, folding any open pause into the paused total.
    #[must_use]
    pub fn finish(mut self, now: DateTime<Utc>, details: SessionDetails) -> SessionRecord {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused += (now - paused_at).max(TimeDelta::zero());
        }
        let end_time = now.max(self.started_at);
        let duration = self.active_span(end_time);

        SessionRecord {
            id: self.id,
            start_time: self.started_at,
            end_time,
            duration_hours: hours_between(duration),
            paused_hours: hours_between(self.paused),
            notes: details.notes,
            topics: details.topics,
            mood: details.mood,
            difficulty: details.difficulty,
            status: SessionState::Completed,
            manual_entry: false,
        }
    }

    fn active_span(&self, until: DateTime<Utc>) -> TimeDelta {
        ((until - self.started_at) - self.paused).max(TimeDelta::zero())
    }
}

/// A completed session as stored in the session history document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    #[serde(default)]
    pub paused_hours: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub status: SessionState,
    #[serde(default)]
    pub manual_entry: bool,
}

impl SessionRecord {
    /// Build a completed record for time that was not tracked live.
    ///
    /// The record spans `started_at .. started_at + duration_hours`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidDuration` if the duration is not finite or falls
    /// outside `0..=MAX_MANUAL_HOURS`.
    pub fn manual(
        id: SessionId,
        started_at: DateTime<Utc>,
        duration_hours: f64,
        details: SessionDetails,
    ) -> Result<Self, RecordError> {
        if !duration_hours.is_finite() || !(0.0..=MAX_MANUAL_HOURS).contains(&duration_hours) {
            return Err(RecordError::InvalidDuration(duration_hours));
        }

        Ok(Self {
            id,
            start_time: started_at,
            end_time: started_at + span_from_hours(duration_hours),
            duration_hours,
            paused_hours: 0.0,
            notes: details.notes,
            topics: details.topics,
            mood: details.mood,
            difficulty: details.difficulty,
            status: SessionState::Completed,
            manual_entry: true,
        })
    }
}
