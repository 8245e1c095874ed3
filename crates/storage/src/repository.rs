use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracker_core::model::{Goals, ProgressState, SessionRecord};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The three documents the tracker persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Progress,
    Sessions,
    Goals,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [Self::Progress, Self::Sessions, Self::Goals];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Progress => "progress.json",
            Self::Sessions => "sessions.json",
            Self::Goals => "goals.json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Progress => "progress",
            Self::Sessions => "sessions",
            Self::Goals => "goals",
        };
        f.write_str(name)
    }
}

/// Repository contract for the progress aggregate.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the progress document.
    ///
    /// Returns `Ok(None)` when nothing usable has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_progress(&self) -> Result<Option<ProgressState>, StorageError>;

    /// Replace the progress document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn save_progress(&self, progress: &ProgressState) -> Result<(), StorageError>;
}

/// Repository contract for the append-only session history.
#[async_trait]
pub trait SessionHistoryRepository: Send + Sync {
    /// Load all completed sessions in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_sessions(&self) -> Result<Option<Vec<SessionRecord>>, StorageError>;

    /// Replace the session history with `sessions`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<(), StorageError>;
}

#[async_trait]
pub trait GoalsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_goals(&self) -> Result<Option<Goals>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn save_goals(&self, goals: &Goals) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<Option<ProgressState>>>,
    sessions: Arc<Mutex<Option<Vec<SessionRecord>>>>,
    goals: Arc<Mutex<Option<Goals>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn read_slot<T: Clone>(slot: &Mutex<Option<T>>) -> Result<Option<T>, StorageError> {
    let guard = slot
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))?;
    Ok(guard.clone())
}

fn write_slot<T>(slot: &Mutex<Option<T>>, value: T) -> Result<(), StorageError> {
    let mut guard = slot
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))?;
    *guard = Some(value);
    Ok(())
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<ProgressState>, StorageError> {
        read_slot(&self.progress)
    }

    async fn save_progress(&self, progress: &ProgressState) -> Result<(), StorageError> {
        write_slot(&self.progress, progress.clone())
    }
}

#[async_trait]
impl SessionHistoryRepository for InMemoryRepository {
    async fn load_sessions(&self) -> Result<Option<Vec<SessionRecord>>, StorageError> {
        read_slot(&self.sessions)
    }

    async fn save_sessions(&self, sessions: &[SessionRecord]) -> Result<(), StorageError> {
        write_slot(&self.sessions, sessions.to_vec())
    }
}

#[async_trait]
impl GoalsRepository for InMemoryRepository {
    async fn load_goals(&self) -> Result<Option<Goals>, StorageError> {
        read_slot(&self.goals)
    }

    async fn save_goals(&self, goals: &Goals) -> Result<(), StorageError> {
        write_slot(&self.goals, *goals)
    }
}

/// Aggregates the document repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub sessions: Arc<dyn SessionHistoryRepository>,
    pub goals: Arc<dyn GoalsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(InMemoryRepository::new())
    }

    /// Use one backend value for all three documents.
    pub fn from_backend<R>(repo: R) -> Self
    where
        R: ProgressRepository + SessionHistoryRepository + GoalsRepository + Clone + 'static,
    {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionHistoryRepository> = Arc::new(repo.clone());
        let goals: Arc<dyn GoalsRepository> = Arc::new(repo);
        Self {
            progress,
            sessions,
            goals,
        }
    }
}
