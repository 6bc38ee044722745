#![forbid(unsafe_code)]

pub mod browser;
pub mod config;
pub mod error;
pub mod quiz;
pub mod sessions;

pub use learn_core::Clock;

pub use browser::{DifficultyStat, LessonBrowserView, LessonFilter, LessonListItem};
pub use config::LearnConfig;
pub use error::{ConfigError, QuizRunnerError, SessionError};
pub use quiz::{PerformanceTier, QuizProgress, QuizResultsView, QuizRunner};
pub use sessions::{CompletionOutcome, DashboardView, LearningSession, QuizAttempt};
