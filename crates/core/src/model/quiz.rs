use serde::Serialize;

use crate::model::ids::QuestionId;
use crate::progress::percentage;

/// One submitted answer, graded once at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizAnswer {
    pub question_id: QuestionId,
    pub answer: String,
    pub correct: bool,
}

impl QuizAnswer {
    #[must_use]
    pub fn new(question_id: QuestionId, answer: impl Into<String>, correct: bool) -> Self {
        Self {
            question_id,
            answer: answer.into(),
            correct,
        }
    }
}

/// Aggregate outcome of a finished quiz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    correct: usize,
    total: usize,
    answers: Vec<QuizAnswer>,
}

impl QuizResult {
    /// Builds the summary from the ordered answer log of a run over `total` questions.
    #[must_use]
    pub fn from_answers(total: usize, answers: Vec<QuizAnswer>) -> Self {
        let correct = answers.iter().filter(|answer| answer.correct).count();
        Self {
            correct,
            total,
            answers,
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    /// Fraction answered correctly; `0.0` for an empty run.
    #[must_use]
    pub fn score_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.correct as f64 / self.total as f64;
        ratio
    }

    /// Rounded score in percent.
    #[must_use]
    pub fn score_percentage(&self) -> u8 {
        percentage(self.correct, self.total)
    }

    /// Whether the score ratio reaches `threshold` (e.g. `0.7`).
    #[must_use]
    pub fn passes(&self, threshold: f64) -> bool {
        self.total > 0 && self.score_ratio() >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: u64, correct: bool) -> QuizAnswer {
        QuizAnswer::new(QuestionId::new(id), "x", correct)
    }

    #[test]
    fn counts_correct_answers() {
        let result = QuizResult::from_answers(3, vec![answer(1, true), answer(2, false), answer(3, true)]);
        assert_eq!(result.correct(), 2);
        assert_eq!(result.total(), 3);
        assert_eq!(result.score_percentage(), 67);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let answers: Vec<QuizAnswer> = (1..=10).map(|id| answer(id, id <= 7)).collect();
        let result = QuizResult::from_answers(10, answers);
        assert!(result.passes(0.7));
        assert!(!result.passes(0.71));
    }

    #[test]
    fn empty_run_never_passes() {
        let result = QuizResult::from_answers(0, Vec::new());
        assert_eq!(result.score_percentage(), 0);
        assert!(!result.passes(0.0));
    }
}
