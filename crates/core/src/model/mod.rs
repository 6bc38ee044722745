mod ids;
mod lesson;
mod quiz;
mod user;

pub use ids::{LessonId, LessonKey, ParseIdError, QuestionId, UserId};
pub use lesson::{ContentType, Difficulty, Lesson, LessonError, Question};
pub use quiz::{QuizAnswer, QuizResult};
pub use user::{Proficiency, SkillProficiency, User, UserError};
