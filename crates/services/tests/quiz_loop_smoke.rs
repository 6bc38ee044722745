use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use learn_core::model::{ContentType, Difficulty, Lesson, LessonId, Question, QuestionId};
use learn_core::{QuizState, sample::sample_catalog};
use services::{QuizRunner, QuizRunnerError};

const DELAY: Duration = Duration::from_millis(1500);

fn two_question_lesson() -> Lesson {
    let q = |id: u64, answer: &str| {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            vec![answer.to_string(), "other".to_string()],
            answer,
        )
        .unwrap()
    };
    Lesson::new(
        LessonId::new(10),
        "Two step quiz",
        Difficulty::Beginner,
        ContentType::Text,
        vec![q(1, "alpha"), q(2, "beta")],
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn quiz_runs_to_completion_with_auto_advance() {
    let lesson = two_question_lesson();
    let (runner, done) = QuizRunner::for_lesson(&lesson, DELAY)
        .unwrap()
        .with_completion_channel();
    let mut states = runner.subscribe();

    runner.select_answer("alpha").unwrap();
    runner.submit().unwrap();
    assert_eq!(
        *states.borrow_and_update(),
        QuizState::ShowingResult { index: 0, correct: true }
    );
    assert!(runner.is_advance_pending());

    // Still showing the result just before the delay elapses.
    tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
    assert_eq!(runner.current_state().phase(), learn_core::QuizPhase::ShowingResult);

    states.changed().await.unwrap();
    assert_eq!(*states.borrow_and_update(), QuizState::AwaitingAnswer { index: 1 });
    assert_eq!(runner.pending_answer(), None);
    assert!(!runner.is_advance_pending());

    runner.select_answer("beta").unwrap();
    runner.submit().unwrap();

    let result = done.await.unwrap();
    assert_eq!((result.correct(), result.total()), (2, 2));
    assert!(runner.current_state().is_completed());
    assert!(runner.progress().is_complete);
}

#[tokio::test(start_paused = true)]
async fn input_is_refused_while_result_is_showing() {
    let lesson = two_question_lesson();
    let runner = QuizRunner::for_lesson(&lesson, DELAY).unwrap();

    runner.select_answer("other").unwrap();
    runner.submit().unwrap();

    let err = runner.select_answer("alpha").unwrap_err();
    assert!(err.is_invalid_transition());
    assert!(runner.submit().unwrap_err().is_invalid_transition());
    assert_eq!(runner.answers().len(), 1);
    assert_eq!(
        runner.current_state(),
        QuizState::ShowingResult { index: 0, correct: false }
    );
}

#[tokio::test(start_paused = true)]
async fn submit_without_selection_is_rejected() {
    let lesson = two_question_lesson();
    let runner = QuizRunner::for_lesson(&lesson, DELAY).unwrap();

    let err = runner.submit().unwrap_err();
    assert!(err.is_invalid_transition());
    assert_eq!(runner.current_state(), QuizState::AwaitingAnswer { index: 0 });
    assert!(!runner.is_advance_pending());
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_pending_advance() {
    let lesson = two_question_lesson();
    let (runner, done) = QuizRunner::for_lesson(&lesson, DELAY)
        .unwrap()
        .with_completion_channel();
    let states = runner.subscribe();

    runner.select_answer("alpha").unwrap();
    runner.submit().unwrap();
    runner.cancel();

    tokio::time::sleep(DELAY * 4).await;
    assert_eq!(
        *states.borrow(),
        QuizState::ShowingResult { index: 0, correct: true }
    );
    assert!(runner.is_closed());
    assert!(matches!(runner.select_answer("beta"), Err(QuizRunnerError::Closed)));
    assert!(done.await.is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_runner_disposes_the_timer() {
    let lesson = two_question_lesson();
    let (runner, done) = QuizRunner::for_lesson(&lesson, DELAY)
        .unwrap()
        .with_completion_channel();
    let states = runner.subscribe();

    runner.select_answer("alpha").unwrap();
    runner.submit().unwrap();
    drop(runner);

    tokio::time::sleep(DELAY * 2).await;
    assert_eq!(
        *states.borrow(),
        QuizState::ShowingResult { index: 0, correct: true }
    );
    assert!(done.await.is_err());
}

#[tokio::test(start_paused = true)]
async fn completion_callback_fires_exactly_once() {
    let catalog = sample_catalog().unwrap();
    let lesson = catalog.lesson(LessonId::new(4)).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let runner = QuizRunner::for_lesson(lesson, DELAY)
        .unwrap()
        .on_complete(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    runner.select_answer("HyperText Markup Language").unwrap();
    runner.submit().unwrap();
    tokio::time::sleep(DELAY * 3).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(runner.select_answer("anything").unwrap_err().is_invalid_transition());
    assert!(runner.submit().unwrap_err().is_invalid_transition());
    tokio::time::sleep(DELAY * 3).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn submit_outside_runtime_keeps_state() {
    let lesson = two_question_lesson();
    let runner = QuizRunner::for_lesson(&lesson, DELAY).unwrap();

    runner.select_answer("alpha").unwrap();
    assert!(matches!(runner.submit(), Err(QuizRunnerError::NoRuntime)));
    assert_eq!(runner.current_state(), QuizState::AwaitingAnswer { index: 0 });
    assert!(runner.answers().is_empty());
}

#[test]
fn empty_lesson_cannot_start() {
    let lesson = Lesson::new(
        LessonId::new(11),
        "Nothing here",
        Difficulty::Beginner,
        ContentType::Text,
        Vec::new(),
    )
    .unwrap();
    let err = QuizRunner::for_lesson(&lesson, DELAY).unwrap_err();
    assert_eq!(
        err,
        QuizRunnerError::Quiz(learn_core::QuizError::EmptyQuestionSet)
    );
}
