use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{LessonError, UserError};
use crate::quiz::QuizError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
