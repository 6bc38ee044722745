#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod progress;
pub mod quiz;
pub mod sample;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use error::Error;
pub use progress::{ProgressSummary, compute_progress, percentage, recommend_lesson};
pub use quiz::{QuizAction, QuizError, QuizPhase, QuizState, QuizStateMachine, Rejection};
pub use time::Clock;
