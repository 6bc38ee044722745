use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use learn_core::model::{Lesson, LessonId, Question, QuizAnswer, QuizResult};
use learn_core::{QuizState, QuizStateMachine};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use super::progress::QuizProgress;
use crate::error::QuizRunnerError;

/// Receives the final result of a quiz run.
pub type CompletionCallback = Box<dyn FnOnce(QuizResult) + Send + 'static>;

struct RunnerState {
    machine: QuizStateMachine,
    timer: Option<JoinHandle<()>>,
    on_complete: Option<CompletionCallback>,
    closed: bool,
}

struct Shared {
    lesson_id: LessonId,
    state: Mutex<RunnerState>,
    states: watch::Sender<QuizState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, RunnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Body of the scheduled auto-advance.
    fn fire_advance(&self) {
        let (callback, result) = {
            let mut inner = self.lock();
            inner.timer = None;
            if inner.closed {
                return;
            }

            let next = match inner.machine.advance() {
                Ok(state) => state.clone(),
                Err(err) => {
                    tracing::warn!(lesson_id = %self.lesson_id, %err, "auto-advance rejected");
                    return;
                }
            };
            self.states.send_replace(next.clone());

            match next {
                QuizState::Completed { result } => (inner.on_complete.take(), result),
                other => {
                    tracing::debug!(lesson_id = %self.lesson_id, state = ?other, "advanced to next question");
                    return;
                }
            }
        };

        tracing::info!(
            lesson_id = %self.lesson_id,
            correct = result.correct(),
            total = result.total(),
            "quiz completed"
        );
        if let Some(callback) = callback {
            callback(result);
        }
    }
}

/// Drives a [`QuizStateMachine`] for one quiz view.
///
/// After each submission the graded answer is shown for `advance_delay`,
/// then a scheduled task moves to the next question or completes the quiz.
/// That task belongs to the runner: [`QuizRunner::cancel`] or dropping the
/// runner aborts it, and a cancelled runner never changes state again.
///
/// Submitting schedules work on the ambient tokio runtime.
pub struct QuizRunner {
    shared: Arc<Shared>,
    advance_delay: Duration,
}

impl fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRunner")
            .field("lesson_id", &self.shared.lesson_id)
            .field("state", &*self.shared.states.borrow())
            .field("advance_delay", &self.advance_delay)
            .finish()
    }
}

impl QuizRunner {
    /// # Errors
    ///
    /// Returns `QuizRunnerError::Quiz` with `EmptyQuestionSet` for an empty question list.
    pub fn new(
        lesson_id: LessonId,
        questions: Vec<Question>,
        advance_delay: Duration,
    ) -> Result<Self, QuizRunnerError> {
        let machine = QuizStateMachine::new(questions)?;
        let (states, _) = watch::channel(machine.current_state().clone());
        Ok(Self {
            shared: Arc::new(Shared {
                lesson_id,
                state: Mutex::new(RunnerState {
                    machine,
                    timer: None,
                    on_complete: None,
                    closed: false,
                }),
                states,
            }),
            advance_delay,
        })
    }

    /// # Errors
    ///
    /// Returns `QuizRunnerError::Quiz` with `EmptyQuestionSet` if the lesson has no questions.
    pub fn for_lesson(lesson: &Lesson, advance_delay: Duration) -> Result<Self, QuizRunnerError> {
        Self::new(lesson.id(), lesson.questions().to_vec(), advance_delay)
    }

    /// Registers the callback run once when the quiz completes.
    #[must_use]
    pub fn on_complete(self, callback: impl FnOnce(QuizResult) + Send + 'static) -> Self {
        self.shared.lock().on_complete = Some(Box::new(callback));
        self
    }

    /// Like [`QuizRunner::on_complete`], delivering the result through a channel.
    #[must_use]
    pub fn with_completion_channel(self) -> (Self, oneshot::Receiver<QuizResult>) {
        let (tx, rx) = oneshot::channel();
        let runner = self.on_complete(move |result| {
            // The host may have stopped listening; the result is then dropped.
            let _ = tx.send(result);
        });
        (runner, rx)
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.shared.lesson_id
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    #[must_use]
    pub fn current_state(&self) -> QuizState {
        self.shared.lock().machine.current_state().clone()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.shared.lock().machine.current_question().cloned()
    }

    #[must_use]
    pub fn pending_answer(&self) -> Option<String> {
        self.shared.lock().machine.pending_answer().map(str::to_owned)
    }

    #[must_use]
    pub fn answers(&self) -> Vec<QuizAnswer> {
        self.shared.lock().machine.answers().to_vec()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let inner = self.shared.lock();
        QuizProgress::new(
            inner.machine.current_state(),
            inner.machine.total_questions(),
            inner.machine.answers().len(),
        )
    }

    /// Watches state changes, including the ones made by the auto-advance.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizState> {
        self.shared.states.subscribe()
    }

    #[must_use]
    pub fn is_advance_pending(&self) -> bool {
        self.shared.lock().timer.is_some()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// # Errors
    ///
    /// Returns `QuizRunnerError::Closed` after cancellation, or the machine's
    /// `InvalidTransition` outside `AwaitingAnswer`.
    pub fn select_answer(&self, candidate: impl Into<String>) -> Result<(), QuizRunnerError> {
        let mut inner = self.shared.lock();
        if inner.closed {
            return Err(QuizRunnerError::Closed);
        }
        inner.machine.select_answer(candidate)?;
        Ok(())
    }

    /// Grades the pending answer and schedules the auto-advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizRunnerError::Closed` after cancellation,
    /// `QuizRunnerError::NoRuntime` outside a tokio runtime, or the machine's
    /// `InvalidTransition` (no pending answer, or a result is still showing).
    pub fn submit(&self) -> Result<QuizAnswer, QuizRunnerError> {
        let mut inner = self.shared.lock();
        if inner.closed {
            return Err(QuizRunnerError::Closed);
        }
        let runtime = Handle::try_current().map_err(|_| QuizRunnerError::NoRuntime)?;

        let answer = inner.machine.submit()?.clone();
        self.shared
            .states
            .send_replace(inner.machine.current_state().clone());
        tracing::debug!(
            lesson_id = %self.shared.lesson_id,
            question_id = %answer.question_id,
            correct = answer.correct,
            "answer submitted"
        );

        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let delay = self.advance_delay;
        inner.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.fire_advance();
            }
        }));
        Ok(answer)
    }

    /// Tears the quiz down: aborts a pending auto-advance and rejects further calls.
    ///
    /// Idempotent.
    pub fn cancel(&self) {
        let mut inner = self.shared.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.on_complete = None;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
            tracing::debug!(lesson_id = %self.shared.lesson_id, "pending auto-advance cancelled");
        }
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
