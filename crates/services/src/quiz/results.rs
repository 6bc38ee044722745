use serde::Serialize;

use learn_core::model::{QuizAnswer, QuizResult};

/// Score bands shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Great,
    Good,
    AlmostThere,
    KeepPracticing,
}

impl PerformanceTier {
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Self::Excellent,
            80..=89 => Self::Great,
            70..=79 => Self::Good,
            60..=69 => Self::AlmostThere,
            _ => Self::KeepPracticing,
        }
    }

    /// Like [`PerformanceTier::from_percentage`], but a failed quiz never
    /// lands on `Good`, whose message announces a pass.
    #[must_use]
    pub fn for_outcome(percentage: u8, passed: bool) -> Self {
        match Self::from_percentage(percentage) {
            Self::Good if !passed => Self::AlmostThere,
            tier => tier,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent work! You've mastered this topic.",
            Self::Great => "Great job! You have a solid understanding.",
            Self::Good => "Good work! You've passed this lesson.",
            Self::AlmostThere => "Almost there! Consider reviewing the material.",
            Self::KeepPracticing => "Keep practicing! Review the lesson and try again.",
        }
    }
}

/// Presentation-agnostic summary of a finished quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResultsView {
    pub lesson_title: String,
    pub correct: usize,
    pub total: usize,
    pub percentage: u8,
    pub passed: bool,
    pub tier: PerformanceTier,
    pub answers: Vec<QuizAnswer>,
}

impl QuizResultsView {
    /// `passed` compares the unrounded ratio against `pass_threshold`, the
    /// same rule that decides whether the lesson is marked completed.
    #[must_use]
    pub fn new(lesson_title: impl Into<String>, result: &QuizResult, pass_threshold: f64) -> Self {
        let percentage = result.score_percentage();
        let passed = result.passes(pass_threshold);
        Self {
            lesson_title: lesson_title.into(),
            correct: result.correct(),
            total: result.total(),
            percentage,
            passed,
            tier: PerformanceTier::for_outcome(percentage, passed),
            answers: result.answers().to_vec(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.tier.message()
    }
}
