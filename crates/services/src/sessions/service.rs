use chrono::{DateTime, Utc};

use learn_core::model::{Lesson, LessonId, LessonKey, QuizResult, User};
use learn_core::{Catalog, Clock, ProgressSummary, compute_progress, recommend_lesson};

use super::view::DashboardView;
use crate::browser::{LessonBrowserView, LessonFilter, LessonListItem, browse};
use crate::config::LearnConfig;
use crate::error::SessionError;
use crate::quiz::{QuizResultsView, QuizRunner};

//
// ─── QUIZ ATTEMPT ──────────────────────────────────────────────────────────────
//

/// A quiz result the host has recorded against a lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    pub lesson_id: LessonId,
    pub lesson_key: LessonKey,
    pub result: QuizResult,
    pub passed: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub recorded_at: DateTime<Utc>,
}

/// What recording a quiz result did to the learner.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub results: QuizResultsView,
    /// True only the first time a lesson is passed.
    pub newly_completed: bool,
    pub knowledge_level: u32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Host-owned state for one learner working through a catalog.
///
/// The session is the only writer of the user record: a passed quiz marks the
/// lesson completed and raises the knowledge level, once per lesson.
#[derive(Debug, Clone)]
pub struct LearningSession {
    user: User,
    catalog: Catalog,
    clock: Clock,
    config: LearnConfig,
    attempts: Vec<QuizAttempt>,
    active_quiz: Option<(LessonId, DateTime<Utc>)>,
}

impl LearningSession {
    #[must_use]
    pub fn new(user: User, catalog: Catalog) -> Self {
        Self {
            user,
            catalog,
            clock: Clock::default(),
            config: LearnConfig::default(),
            attempts: Vec::new(),
            active_quiz: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: LearnConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &LearnConfig {
        &self.config
    }

    #[must_use]
    pub fn attempts(&self) -> &[QuizAttempt] {
        &self.attempts
    }

    #[must_use]
    pub fn last_attempt(&self) -> Option<&QuizAttempt> {
        self.attempts.last()
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSummary {
        compute_progress(&self.user, &self.catalog)
    }

    #[must_use]
    pub fn recommended_lesson(&self) -> Option<&Lesson> {
        recommend_lesson(&self.user, &self.catalog)
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardView {
        let recommended = self.recommended_lesson().and_then(|lesson| {
            self.catalog
                .key_of(lesson.id())
                .map(|key| LessonListItem::new(key, lesson, &self.user))
        });

        DashboardView {
            user_name: self.user.name().to_string(),
            learning_style: self.user.learning_style().to_string(),
            progress: self.progress(),
            skills_tracked: self.user.skills().len(),
            recommended,
        }
    }

    #[must_use]
    pub fn browse(&self, filter: &LessonFilter) -> LessonBrowserView {
        browse(&self.catalog, &self.user, filter)
    }

    /// # Errors
    ///
    /// Returns `SessionError::UnknownLesson` if the id is not in the catalog.
    pub fn lesson(&self, lesson_id: LessonId) -> Result<&Lesson, SessionError> {
        self.catalog
            .lesson(lesson_id)
            .ok_or(SessionError::UnknownLesson(lesson_id))
    }

    /// Looks a lesson up by its completion key.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLessonKey` if no lesson is registered under `key`.
    pub fn lesson_by_key(&self, key: &LessonKey) -> Result<&Lesson, SessionError> {
        self.catalog
            .get(key)
            .ok_or_else(|| SessionError::UnknownLessonKey(key.clone()))
    }

    /// Starts a quiz over the lesson's questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLesson` for an unknown id and
    /// `SessionError::Quiz` if the lesson has no questions.
    pub fn start_quiz(&mut self, lesson_id: LessonId) -> Result<QuizRunner, SessionError> {
        let lesson = self.lesson(lesson_id)?;
        let runner = QuizRunner::for_lesson(lesson, self.config.advance_delay)?;
        tracing::info!(%lesson_id, topic = lesson.topic(), "quiz started");
        self.active_quiz = Some((lesson_id, self.clock.now()));
        Ok(runner)
    }

    /// Restarts the quiz of the most recently started lesson.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToRetry` if no quiz was started yet.
    pub fn retry_quiz(&mut self) -> Result<QuizRunner, SessionError> {
        let lesson_id = self
            .active_quiz
            .map(|(id, _)| id)
            .or_else(|| self.last_attempt().map(|attempt| attempt.lesson_id))
            .ok_or(SessionError::NothingToRetry)?;
        self.start_quiz(lesson_id)
    }

    /// Records a finished quiz and applies the pass rule.
    ///
    /// A ratio of at least `pass_threshold` marks the lesson completed and
    /// raises the knowledge level; repeating a passed lesson changes neither.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownLesson` for an unknown id and
    /// `SessionError::ResultMismatch` if the result does not cover the
    /// lesson's question count.
    pub fn record_quiz_result(
        &mut self,
        lesson_id: LessonId,
        result: QuizResult,
    ) -> Result<CompletionOutcome, SessionError> {
        let lesson = self.lesson(lesson_id)?;
        if result.total() != lesson.question_count() {
            return Err(SessionError::ResultMismatch {
                lesson_id,
                expected: lesson.question_count(),
                got: result.total(),
            });
        }
        let lesson_key = self
            .catalog
            .key_of(lesson_id)
            .cloned()
            .ok_or(SessionError::UnknownLesson(lesson_id))?;

        let results = QuizResultsView::new(lesson.topic(), &result, self.config.pass_threshold);
        let passed = results.passed;
        let newly_completed = passed && self.user.complete_lesson(lesson_key.clone());

        if newly_completed {
            tracing::info!(
                %lesson_id,
                level = self.user.knowledge_level(),
                "lesson completed"
            );
        } else if passed {
            tracing::debug!(%lesson_id, "lesson already completed");
        }

        let started_at = match self.active_quiz {
            Some((active, at)) if active == lesson_id => Some(at),
            _ => None,
        };
        self.attempts.push(QuizAttempt {
            lesson_id,
            lesson_key,
            result,
            passed,
            started_at,
            recorded_at: self.clock.now(),
        });

        Ok(CompletionOutcome {
            results,
            newly_completed,
            knowledge_level: self.user.knowledge_level(),
        })
    }
}
