use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{LessonId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson topic cannot be empty")]
    EmptyTopic,

    #[error("difficulty must be between 1 and 3, got {0}")]
    InvalidDifficulty(u8),

    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("question {0} has no options")]
    NoOptions(QuestionId),

    #[error("answer of question {0} is not one of its options")]
    AnswerNotInOptions(QuestionId),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Three-step lesson difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Converts the 1-3 level used by lesson data.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::InvalidDifficulty` outside 1-3.
    pub fn from_level(level: u8) -> Result<Self, LessonError> {
        match level {
            1 => Ok(Self::Beginner),
            2 => Ok(Self::Intermediate),
            3 => Ok(Self::Advanced),
            other => Err(LessonError::InvalidDifficulty(other)),
        }
    }

    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = LessonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_level(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.level()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── CONTENT TYPE ──────────────────────────────────────────────────────────────
//

/// How the lesson material is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Text,
    Interactive,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Text => "text",
            ContentType::Interactive => "interactive",
        }
    }
}

impl FromStr for ContentType {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "text" => Ok(Self::Text),
            "interactive" => Ok(Self::Interactive),
            _ => Err(LessonError::UnknownContentType(s.to_string())),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    answer: String,
}

impl Question {
    /// Creates a question, checking that `answer` is one of `options`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoOptions` for an empty option list and
    /// `LessonError::AnswerNotInOptions` when no option equals `answer` exactly.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, LessonError> {
        let answer = answer.into();
        if options.is_empty() {
            return Err(LessonError::NoOptions(id));
        }
        if !options.iter().any(|option| *option == answer) {
            return Err(LessonError::AnswerNotInOptions(id));
        }
        Ok(Self {
            id,
            text: text.into(),
            options,
            answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Exact, case-sensitive comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.answer == candidate
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Immutable catalog entry: a topic plus its ordered quiz questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lesson {
    id: LessonId,
    topic: String,
    difficulty: Difficulty,
    content_type: ContentType,
    questions: Vec<Question>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTopic` if the topic is blank.
    pub fn new(
        id: LessonId,
        topic: impl Into<String>,
        difficulty: Difficulty,
        content_type: ContentType,
        questions: Vec<Question>,
    ) -> Result<Self, LessonError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(LessonError::EmptyTopic);
        }
        Ok(Self {
            id,
            topic,
            difficulty,
            content_type,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Case-insensitive substring test against the topic.
    #[must_use]
    pub fn topic_contains(&self, needle: &str) -> bool {
        self.topic.to_lowercase().contains(&needle.to_lowercase())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
