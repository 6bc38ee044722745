//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::model::{LessonId, LessonKey};
use learn_core::QuizError;

/// Errors emitted by `QuizRunner`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizRunnerError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("quiz view was closed")]
    Closed,
    #[error("quiz runner needs a tokio runtime to schedule the next question")]
    NoRuntime,
}

impl QuizRunnerError {
    /// True when the machine refused the call in its current state.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, QuizRunnerError::Quiz(err) if err.is_invalid_transition())
    }
}

/// Errors emitted by `LearningSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("unknown lesson id {0}")]
    UnknownLesson(LessonId),
    #[error("unknown lesson key {0}")]
    UnknownLessonKey(LessonKey),
    #[error("no quiz has been started yet")]
    NothingToRetry,
    #[error("quiz result covers {got} questions but lesson {lesson_id} has {expected}")]
    ResultMismatch {
        lesson_id: LessonId,
        expected: usize,
        got: usize,
    },
    #[error(transparent)]
    Quiz(#[from] QuizRunnerError),
}

impl From<QuizError> for SessionError {
    fn from(err: QuizError) -> Self {
        SessionError::Quiz(QuizRunnerError::Quiz(err))
    }
}

/// Errors emitted while reading `LearnConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {raw:?}")]
    InvalidDelay { var: &'static str, raw: String },
    #[error("{var} must be a number in (0, 1], got {raw:?}")]
    InvalidThreshold { var: &'static str, raw: String },
}
