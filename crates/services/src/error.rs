//! Shared error types for the services crate.

use thiserror::Error;

use tracker_core::model::{
    DetailsError, GoalsError, RecordError, SessionId, SessionStateError, StageId,
};

/// Errors emitted by the session lifecycle.
///
/// Storage failures never show up here: loads fall back to defaults and saves are
/// logged, so only caller mistakes reach the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error(transparent)]
    InvalidState(#[from] SessionStateError),
    #[error(transparent)]
    InvalidDetails(#[from] DetailsError),
    #[error(transparent)]
    InvalidDuration(#[from] RecordError),
}

/// Errors emitted by `StageService`.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum StageError {
    #[error("stage {0} not found")]
    UnknownStage(StageId),
    #[error("stage {stage} has {len} topics, index {index} is out of range")]
    TopicOutOfRange {
        stage: StageId,
        index: usize,
        len: usize,
    },
    #[error("stage {stage} has {len} projects, index {index} is out of range")]
    ProjectOutOfRange {
        stage: StageId,
        index: usize,
        len: usize,
    },
}

/// Errors emitted by `GoalsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GoalsServiceError {
    #[error(transparent)]
    Goals(#[from] GoalsError),
}
