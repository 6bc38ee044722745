mod service;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use service::{CompletionOutcome, LearningSession, QuizAttempt};
pub use view::DashboardView;
