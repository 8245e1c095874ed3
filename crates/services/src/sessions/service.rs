use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use storage::repository::Storage;
use tracing::{debug, info};
use tracker_core::model::{
    Achievement, ActiveSession, SessionDetailsDraft, SessionId, SessionRecord, SessionState,
};

use super::registry::SessionRegistry;
use crate::Clock;
use crate::documents::Documents;
use crate::error::SessionError;

/// Read-only snapshot of an open session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub state: SessionState,
    pub elapsed_hours: f64,
    pub start_time: DateTime<Utc>,
    pub paused_hours: f64,
}

/// A session that has just been folded into the history and progress totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndedSession {
    pub session: SessionRecord,
    pub new_achievements: Vec<Achievement>,
}

/// Drives sessions through `active -> {paused <-> active} -> completed`.
///
/// Open sessions live in the injected `SessionRegistry`; completing one appends it to the
/// session history and rewrites the progress document.
#[derive(Clone)]
pub struct SessionLifecycleService {
    clock: Clock,
    registry: SessionRegistry,
    documents: Documents,
}

impl SessionLifecycleService {
    #[must_use]
    pub fn new(clock: Clock, registry: SessionRegistry, storage: &Storage) -> Self {
        Self {
            clock,
            registry,
            documents: Documents::new(storage),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Mutable access to the time source, e.g. to advance a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Open a new active session.
    #[must_use]
    pub fn start(&self) -> SessionId {
        let session = ActiveSession::start(SessionId::generate(), self.clock.now());
        let id = session.id();
        self.registry.insert(session);
        debug!(session = %id, "session started");
        id
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for unknown ids and
    /// `SessionError::InvalidState` if the session is already paused.
    pub fn pause(&self, id: SessionId) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.registry
            .update(id, |session| session.pause(now))
            .ok_or(SessionError::NotFound(id))??;
        debug!(session = %id, "session paused");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for unknown ids and
    /// `SessionError::InvalidState` if the session is not paused.
    pub fn resume(&self, id: SessionId) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.registry
            .update(id, |session| session.resume(now))
            .ok_or(SessionError::NotFound(id))??;
        debug!(session = %id, "session resumed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for unknown ids.
    pub fn status(&self, id: SessionId) -> Result<SessionStatusView, SessionError> {
        let session = self.registry.get(id).ok_or(SessionError::NotFound(id))?;
        Ok(SessionStatusView {
            session_id: id,
            state: session.state(),
            elapsed_hours: session.elapsed_hours(self.clock.now()),
            start_time: session.started_at(),
            paused_hours: session.paused_hours(),
        })
    }

    /// Ids of all open sessions, oldest first.
    #[must_use]
    pub fn active_ids(&self) -> Vec<SessionId> {
        self.registry.ids()
    }

    /// Complete an active or paused session and fold it into the persisted totals.
    ///
    /// The daily log bucket is the completion date.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for unknown ids and
    /// `SessionError::InvalidDetails` if the details fail validation (the session stays open).
    pub async fn end(
        &self,
        id: SessionId,
        details: SessionDetailsDraft,
    ) -> Result<EndedSession, SessionError> {
        if self.registry.get(id).is_none() {
            return Err(SessionError::NotFound(id));
        }
        let details = details.validate()?;
        let session = self.registry.remove(id).ok_or(SessionError::NotFound(id))?;

        let now = self.clock.now();
        let record = session.finish(now, details);
        let log_date = record.end_time.date_naive();
        Ok(self.commit(record, log_date).await)
    }

    /// Record time that was not tracked live, dated `date` (default: now).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` if the duration is negative, not finite,
    /// or longer than a day, and `SessionError::InvalidDetails` for bad details.
    pub async fn add_manual(
        &self,
        duration_hours: f64,
        details: SessionDetailsDraft,
        date: Option<DateTime<Utc>>,
    ) -> Result<EndedSession, SessionError> {
        let details = details.validate()?;
        let started_at = date.unwrap_or_else(|| self.clock.now());
        let record =
            SessionRecord::manual(SessionId::generate(), started_at, duration_hours, details)?;
        Ok(self.commit(record, started_at.date_naive()).await)
    }

    async fn commit(&self, record: SessionRecord, log_date: NaiveDate) -> EndedSession {
        let now = self.clock.now();

        let mut sessions = self.documents.sessions().await;
        sessions.push(record.clone());
        self.documents.save_sessions(&sessions).await;

        let mut progress = self.documents.progress(now).await;
        let new_achievements = progress.record_session(&record, log_date, now);
        self.documents.save_progress(&progress).await;

        info!(
            session = %record.id,
            hours = record.duration_hours,
            manual = record.manual_entry,
            total_hours = progress.total_hours(),
            streak = progress.current_streak(),
            "session recorded"
        );
        for achievement in &new_achievements {
            info!(achievement = %achievement.id, "achievement earned");
        }

        EndedSession {
            session: record,
            new_achievements,
        }
    }
}

impl std::fmt::Debug for SessionLifecycleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycleService")
            .field("clock", &self.clock)
            .field("active_sessions", &self.registry.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
