//! Quiz flow over an ordered question set.
//!
//! The machine is purely synchronous. The pause between showing a graded
//! answer and moving on is owned by whoever drives [`QuizStateMachine::advance`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::{Question, QuizAnswer, QuizResult};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Calls the machine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    SelectAnswer,
    Submit,
    Advance,
}

impl fmt::Display for QuizAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizAction::SelectAnswer => "select answer",
            QuizAction::Submit => "submit",
            QuizAction::Advance => "advance",
        })
    }
}

/// Discriminant of [`QuizState`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingAnswer,
    ShowingResult,
    Completed,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizPhase::AwaitingAnswer => "awaiting answer",
            QuizPhase::ShowingResult => "showing result",
            QuizPhase::Completed => "completed",
        })
    }
}

/// Why a call was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The call is not accepted in the current phase.
    WrongPhase,
    /// `submit` with no (or an empty) pending answer.
    NoAnswerSelected,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::WrongPhase => "not allowed in this phase",
            Rejection::NoAnswerSelected => "no answer selected",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    EmptyQuestionSet,

    #[error("cannot {action} while {phase}: {reason}")]
    InvalidTransition {
        action: QuizAction,
        phase: QuizPhase,
        reason: Rejection,
    },
}

impl QuizError {
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, QuizError::InvalidTransition { .. })
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    AwaitingAnswer { index: usize },
    ShowingResult { index: usize, correct: bool },
    Completed { result: QuizResult },
}

impl QuizState {
    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        match self {
            QuizState::AwaitingAnswer { .. } => QuizPhase::AwaitingAnswer,
            QuizState::ShowingResult { .. } => QuizPhase::ShowingResult,
            QuizState::Completed { .. } => QuizPhase::Completed,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, QuizState::Completed { .. })
    }
}

//
// ─── MACHINE ───────────────────────────────────────────────────────────────────
//

/// Steps a learner through questions one at a time.
///
/// Rejected calls return an error and leave the machine untouched.
/// `Completed` is terminal.
#[derive(Debug, Clone)]
pub struct QuizStateMachine {
    questions: Vec<Question>,
    state: QuizState,
    pending: Option<String>,
    answers: Vec<QuizAnswer>,
}

impl QuizStateMachine {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuestionSet` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        Ok(Self {
            questions,
            state: QuizState::AwaitingAnswer { index: 0 },
            pending: None,
            answers: Vec::new(),
        })
    }

    #[must_use]
    pub fn current_state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Question being answered or shown; `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::AwaitingAnswer { index } | QuizState::ShowingResult { index, .. } => {
                self.questions.get(index)
            }
            QuizState::Completed { .. } => None,
        }
    }

    #[must_use]
    pub fn pending_answer(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            QuizState::Completed { result } => Some(result),
            _ => None,
        }
    }

    fn reject(&self, action: QuizAction, reason: Rejection) -> QuizError {
        QuizError::InvalidTransition {
            action,
            phase: self.state.phase(),
            reason,
        }
    }

    /// Sets the pending answer for the current question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless awaiting an answer.
    pub fn select_answer(&mut self, candidate: impl Into<String>) -> Result<(), QuizError> {
        if !matches!(self.state, QuizState::AwaitingAnswer { .. }) {
            return Err(self.reject(QuizAction::SelectAnswer, Rejection::WrongPhase));
        }
        self.pending = Some(candidate.into());
        Ok(())
    }

    /// Grades the pending answer and shows the result.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `AwaitingAnswer`, or when
    /// nothing (or an empty string) is pending.
    pub fn submit(&mut self) -> Result<&QuizAnswer, QuizError> {
        let QuizState::AwaitingAnswer { index } = self.state else {
            return Err(self.reject(QuizAction::Submit, Rejection::WrongPhase));
        };
        let candidate = match self.pending.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => return Err(self.reject(QuizAction::Submit, Rejection::NoAnswerSelected)),
        };
        let Some(question) = self.questions.get(index) else {
            return Err(self.reject(QuizAction::Submit, Rejection::WrongPhase));
        };

        let correct = question.is_correct(candidate);
        self.answers
            .push(QuizAnswer::new(question.id(), candidate, correct));
        self.state = QuizState::ShowingResult { index, correct };

        let last = self.answers.len() - 1;
        Ok(&self.answers[last])
    }

    /// Leaves `ShowingResult`: to the next question, or to `Completed` after the last.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless showing a result.
    pub fn advance(&mut self) -> Result<&QuizState, QuizError> {
        let QuizState::ShowingResult { index, .. } = self.state else {
            return Err(self.reject(QuizAction::Advance, Rejection::WrongPhase));
        };

        self.pending = None;
        let next = index + 1;
        self.state = if next >= self.questions.len() {
            QuizState::Completed {
                result: QuizResult::from_answers(self.questions.len(), self.answers.clone()),
            }
        } else {
            QuizState::AwaitingAnswer { index: next }
        };
        Ok(&self.state)
    }
}
