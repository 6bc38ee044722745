mod progress;
mod results;
mod runner;

pub use crate::error::QuizRunnerError;
pub use progress::QuizProgress;
pub use results::{PerformanceTier, QuizResultsView};
pub use runner::{CompletionCallback, QuizRunner};
