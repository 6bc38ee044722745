use std::fmt;
use std::io::{BufRead, Write as _};

use learn_core::model::{Difficulty, LessonId, Question};
use learn_core::sample::sample_data;
use learn_core::QuizState;
use services::config::{ADVANCE_DELAY_ENV, PASS_THRESHOLD_ENV, parse_delay_ms};
use services::{
    CompletionOutcome, DashboardView, LearnConfig, LearningSession, LessonBrowserView,
    LessonFilter, QuizRunner,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLessonId { raw: String },
    InvalidDifficulty { raw: String },
    InvalidDelay { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid --lesson value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (expected 1, 2 or 3)")
            }
            ArgsError::InvalidDelay { raw } => write!(f, "invalid --delay-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- dashboard");
    eprintln!("  cargo run -p app -- lessons [--search <text>] [--difficulty <1-3>]");
    eprintln!("  cargo run -p app -- quiz    [--lesson <id>] [--answers <A,B,...>] [--delay-ms <ms>]");
    eprintln!();
    eprintln!("Defaults for quiz:");
    eprintln!("  --lesson   the recommended lesson");
    eprintln!("  --answers  read interactively from stdin");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {ADVANCE_DELAY_ENV}, {PASS_THRESHOLD_ENV}, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Lessons,
    Quiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "lessons" => Some(Self::Lessons),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct QuizArgs {
    lesson: Option<LessonId>,
    answers: Option<Vec<String>>,
    delay: Option<std::time::Duration>,
}

fn parse_lessons(args: &mut impl Iterator<Item = String>) -> Result<LessonFilter, ArgsError> {
    let mut filter = LessonFilter::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--search" => filter.search = require_value(args, "--search")?,
            "--difficulty" => {
                let value = require_value(args, "--difficulty")?;
                let difficulty = value
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(|level| Difficulty::from_level(level).ok())
                    .ok_or(ArgsError::InvalidDifficulty { raw: value })?;
                filter.difficulty = Some(difficulty);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(filter)
}

fn parse_quiz(args: &mut impl Iterator<Item = String>) -> Result<QuizArgs, ArgsError> {
    let mut parsed = QuizArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lesson" => {
                let value = require_value(args, "--lesson")?;
                let id = value
                    .parse::<LessonId>()
                    .map_err(|_| ArgsError::InvalidLessonId { raw: value.clone() })?;
                parsed.lesson = Some(id);
            }
            "--answers" => {
                let value = require_value(args, "--answers")?;
                parsed.answers = Some(value.split(',').map(|s| s.trim().to_string()).collect());
            }
            "--delay-ms" => {
                let value = require_value(args, "--delay-ms")?;
                let delay = parse_delay_ms("--delay-ms", &value)
                    .map_err(|_| ArgsError::InvalidDelay { raw: value })?;
                parsed.delay = Some(delay);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(parsed)
}

fn print_dashboard(view: &DashboardView) {
    println!("Welcome back, {} ({} learner)", view.user_name, view.learning_style);
    println!(
        "Level {} | {}/{} lessons completed ({}%)",
        view.progress.level,
        view.progress.lessons_completed,
        view.progress.total_lessons,
        view.progress.completion_percentage
    );
    println!();
    println!("Skills ({} tracked):", view.skills_tracked);
    for (name, proficiency) in view.progress.skills.iter() {
        println!("  {name:<18} {:>3.0}%", proficiency.value() * 100.0);
    }
    println!();
    match &view.recommended {
        Some(item) => println!(
            "Recommended: [{}] {} ({}, {}, {} questions){}",
            item.lesson_id,
            item.topic,
            item.difficulty,
            item.content_type,
            item.question_count,
            if item.completed { " - completed" } else { "" }
        ),
        None => println!("No lessons available."),
    }
}

fn print_completed(session: &LearningSession) {
    let completed = session.user().completed_lessons();
    if completed.is_empty() {
        return;
    }
    println!("Completed lessons:");
    for key in completed {
        match session.lesson_by_key(key) {
            Ok(lesson) => println!("  {key}: {}", lesson.topic()),
            Err(err) => tracing::warn!(%err, "completed lesson missing from catalog"),
        }
    }
}

fn print_lessons(view: &LessonBrowserView) {
    let stats: Vec<String> = view
        .difficulty_stats
        .iter()
        .map(|stat| format!("{} {}", stat.count, stat.difficulty))
        .collect();
    println!(
        "{} lessons ({}) | {} completed ({}%)",
        view.total_lessons,
        stats.join(", "),
        view.completed_lessons,
        view.completion_percentage
    );
    println!();
    if view.is_empty() {
        println!("No lessons match the filter.");
        return;
    }
    for item in &view.items {
        println!(
            "  {} [{}] {:<28} {:<12} {:<11} {} questions",
            if item.completed { "x" } else { " " },
            item.lesson_id,
            item.topic,
            item.difficulty.label(),
            item.content_type.as_str(),
            item.question_count
        );
    }
}

fn print_outcome(outcome: &CompletionOutcome) {
    let results = &outcome.results;
    println!();
    println!("Quiz complete: {}", results.lesson_title);
    println!(
        "Score: {}/{} ({}%) {}",
        results.correct,
        results.total,
        results.percentage,
        if results.passed { "PASSED" } else { "NOT PASSED" }
    );
    println!("{}", results.message());
    if outcome.newly_completed {
        println!("Lesson completed! Knowledge level is now {}.", outcome.knowledge_level);
    }
}

/// Maps a letter (`A`, `b`, ...) to the matching option; anything else is taken verbatim.
fn resolve_choice(question: &Question, raw: &str) -> String {
    let raw = raw.trim();
    let mut chars = raw.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() {
            let index = usize::from(letter.to_ascii_uppercase() as u8 - b'A');
            if let Some(option) = question.options().get(index) {
                return option.clone();
            }
        }
    }
    raw.to_string()
}

/// Reads one trimmed line; a closed input is an error rather than an empty answer.
fn read_trimmed_line(reader: &mut impl BufRead) -> std::io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed before the quiz finished",
        ));
    }
    Ok(line.trim().to_string())
}

async fn read_line(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let line =
        tokio::task::spawn_blocking(|| read_trimmed_line(&mut std::io::stdin().lock())).await??;
    Ok(line)
}

/// Drives one quiz to completion and returns the host-side outcome.
async fn play_quiz(
    session: &mut LearningSession,
    runner: QuizRunner,
    scripted: &mut Option<std::vec::IntoIter<String>>,
) -> Result<CompletionOutcome, Box<dyn std::error::Error>> {
    let lesson_id = runner.lesson_id();
    let (runner, done) = runner.with_completion_channel();
    let mut states = runner.subscribe();

    println!("Quiz: {}", session.lesson(lesson_id)?.topic());

    loop {
        let state = states.borrow_and_update().clone();
        match state {
            QuizState::AwaitingAnswer { .. } => {
                let Some(question) = runner.current_question() else {
                    break;
                };
                let progress = runner.progress();
                println!();
                println!(
                    "Question {}/{}: {}",
                    progress.current_number.unwrap_or(progress.answered + 1),
                    progress.total,
                    question.text()
                );
                for (index, option) in question.options().iter().enumerate() {
                    let letter = char::from(b'A' + (index % 26) as u8);
                    println!("  {letter}) {option}");
                }

                let raw = match scripted {
                    Some(answers) => answers.next().ok_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            "--answers ran out before the quiz finished",
                        )
                    })?,
                    None => read_line("> ").await?,
                };

                runner.select_answer(resolve_choice(&question, &raw))?;
                match runner.submit() {
                    Ok(answer) if answer.correct => println!("Correct!"),
                    Ok(_) => println!("Incorrect. The answer was: {}", question.answer()),
                    Err(err) if err.is_invalid_transition() => {
                        println!("Pick one of the options first.");
                        if scripted.is_some() {
                            return Err(err.into());
                        }
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            QuizState::ShowingResult { .. } => states.changed().await?,
            QuizState::Completed { .. } => break,
        }
    }

    let result = done.await?;
    Ok(session.record_quiz_result(lesson_id, result)?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: show the dashboard when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Dashboard,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() {
        argv.remove(0);
    }

    let mut config = LearnConfig::from_env()?;
    let mut iter = argv.into_iter();
    let report = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    let (user, catalog) = sample_data()?;
    let mut session = LearningSession::new(user, catalog);

    match cmd {
        Command::Dashboard => {
            if let Some(arg) = iter.next() {
                return Err(report(ArgsError::UnknownArg(arg)).into());
            }
            print_dashboard(&session.dashboard());
            print_completed(&session);
            Ok(())
        }
        Command::Lessons => {
            let filter = parse_lessons(&mut iter).map_err(report)?;
            print_lessons(&session.browse(&filter));
            Ok(())
        }
        Command::Quiz => {
            let args = parse_quiz(&mut iter).map_err(report)?;
            if let Some(delay) = args.delay {
                config = config.with_advance_delay(delay);
            }
            session = session.with_config(config);
            tracing::debug!(?config, "quiz configuration");

            let lesson_id = match args.lesson {
                Some(id) => id,
                None => session
                    .recommended_lesson()
                    .map(|lesson| lesson.id())
                    .ok_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::NotFound, "catalog is empty")
                    })?,
            };
            let interactive = args.answers.is_none();
            let mut scripted = args.answers.map(Vec::into_iter);

            let mut runner = session.start_quiz(lesson_id)?;
            loop {
                let outcome = play_quiz(&mut session, runner, &mut scripted).await?;
                print_outcome(&outcome);

                if outcome.results.passed || !interactive {
                    break;
                }
                let again = read_line("Retry? [y/N] ").await?;
                if !again.eq_ignore_ascii_case("y") {
                    break;
                }
                runner = session.retry_quiz()?;
            }

            println!();
            print_dashboard(&session.dashboard());
            print_completed(&session);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("  B \n");
        assert_eq!(read_trimmed_line(&mut input).unwrap(), "B");

        let err = read_trimmed_line(&mut input).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn blank_line_is_not_eof() {
        let mut input = Cursor::new("\n");
        assert_eq!(read_trimmed_line(&mut input).unwrap(), "");
    }

    #[test]
    fn letters_pick_options() {
        let question = Question::new(
            learn_core::model::QuestionId::new(1),
            "Pick",
            vec!["first".to_string(), "second".to_string()],
            "second",
        )
        .unwrap();
        assert_eq!(resolve_choice(&question, "b"), "second");
        assert_eq!(resolve_choice(&question, "z"), "z");
        assert_eq!(resolve_choice(&question, " first "), "first");
    }
}
