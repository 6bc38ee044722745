//! Bundled demo dataset: one learner and four lessons.

use crate::Error;
use crate::catalog::{Catalog, CatalogError};
use crate::model::{
    ContentType, Difficulty, Lesson, LessonError, LessonId, Question, QuestionId,
    SkillProficiency, User, UserError, UserId,
};

fn question(id: u64, text: &str, options: [&str; 4], answer: &str) -> Result<Question, LessonError> {
    Question::new(
        QuestionId::new(id),
        text,
        options.iter().map(|option| (*option).to_string()).collect(),
        answer,
    )
}

/// The demo learner, "Alex Johnson".
///
/// # Errors
///
/// Returns `UserError` only if the bundled data is edited into an invalid state.
pub fn sample_user() -> Result<User, UserError> {
    let skills = SkillProficiency::from_pairs([
        ("python", 0.7),
        ("data_structures", 0.3),
        ("algorithms", 0.5),
        ("web_development", 0.2),
    ])?;
    User::new(UserId::new(1), "Alex Johnson", 3, skills, "visual")
}

/// The four demo lessons, keyed `lesson1` to `lesson4`.
///
/// # Errors
///
/// Returns `CatalogError` only if the bundled data is edited into an invalid state.
pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    let python = Lesson::new(
        LessonId::new(1),
        "Introduction to Python",
        Difficulty::Beginner,
        ContentType::Video,
        vec![
            question(
                1,
                "What is Python?",
                ["A programming language", "A reptile", "A fruit", "A web browser"],
                "A programming language",
            )?,
            question(
                2,
                "Which of the following is a Python keyword?",
                ["variable", "def", "method", "function"],
                "def",
            )?,
        ],
    )?;

    let lists = Lesson::new(
        LessonId::new(2),
        "Data Structures: Lists",
        Difficulty::Intermediate,
        ContentType::Text,
        vec![
            question(
                3,
                "What is a list in Python?",
                [
                    "A sequence of elements",
                    "A collection of key-value pairs",
                    "A single element",
                    "A data type for numbers",
                ],
                "A sequence of elements",
            )?,
            question(
                4,
                "How do you create an empty list in Python?",
                ["list()", "[]", "Both A and B", "None of the above"],
                "Both A and B",
            )?,
        ],
    )?;

    let sorting = Lesson::new(
        LessonId::new(3),
        "Algorithms: Sorting",
        Difficulty::Advanced,
        ContentType::Interactive,
        vec![
            question(
                5,
                "Which sorting algorithm has the best average time complexity?",
                ["Bubble Sort", "Quick Sort", "Selection Sort", "Insertion Sort"],
                "Quick Sort",
            )?,
            question(
                6,
                "What is the time complexity of Bubble Sort?",
                ["O(n)", "O(n log n)", "O(n²)", "O(1)"],
                "O(n²)",
            )?,
        ],
    )?;

    let web = Lesson::new(
        LessonId::new(4),
        "Web Development Basics",
        Difficulty::Beginner,
        ContentType::Text,
        vec![question(
            7,
            "What does HTML stand for?",
            [
                "HyperText Markup Language",
                "High Technology Modern Language",
                "Home Tool Markup Language",
                "Hyperlink and Text Markup Language",
            ],
            "HyperText Markup Language",
        )?],
    )?;

    Catalog::from_lessons([python, lists, sorting, web])
}

/// The demo learner together with the demo catalog.
///
/// # Errors
///
/// Returns `Error` only if the bundled data is edited into an invalid state.
pub fn sample_data() -> Result<(User, Catalog), Error> {
    Ok((sample_user()?, sample_catalog()?))
}
