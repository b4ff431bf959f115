use std::fs;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use cloze::app::{App, AppScreen, DynAnswerLog};
use cloze::config::Config;
use cloze::engine::scoring::FeedbackError;
use cloze::quiz::QuizData;
use cloze::session::quiz::{AdvanceTrigger, Phase, QuizSession};
use cloze::source::{FetchError, resolve_source};
use cloze::store::KeyValueStore;
use cloze::store::answer_log::AnswerLog;
use cloze::store::json_store::JsonStore;
use tempfile::TempDir;

const QUIZ_JSON: &str = r#"{
  "status": "SUCCESS",
  "data": {
    "questions": [
      {
        "questionId": 1,
        "question": "The _____________ fox jumps over the _____________ dog.",
        "options": ["lazy", "quick", "brown", "sleepy"],
        "correctAnswer": ["quick", "lazy"]
      },
      {
        "questionId": "q2",
        "question": "Water boils at _____________ degrees.",
        "options": ["90", "100", "110"],
        "correctAnswer": ["100"]
      },
      {
        "questionId": 3,
        "question": "_____________ and _____________ are primary colours.",
        "options": ["red", "green", "blue", "pink"],
        "correctAnswer": ["red", "blue"]
      }
    ]
  }
}"#;

fn quiz() -> QuizData {
    QuizData::from_json(QUIZ_JSON).unwrap()
}

fn json_log(dir: &TempDir) -> DynAnswerLog {
    let store: Box<dyn KeyValueStore> =
        Box::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    AnswerLog::new(store)
}

fn select_all(session: &mut QuizSession, words: &[&str]) {
    for w in words {
        session.select(w);
    }
}

#[test]
fn test_full_session_mixes_manual_and_timed_advances() {
    let t0 = Instant::now();
    let mut session = QuizSession::new(30);
    session.load(Ok(quiz()), t0);
    assert_eq!(session.max_score(), 5);

    select_all(&mut session, &["quick", "lazy"]);
    let first = session.next(t0 + Duration::from_secs(3)).unwrap();
    assert_eq!(first.points, 2);
    assert_eq!(first.trigger, AdvanceTrigger::Manual);

    // nothing selected on question two: the countdown finalizes it
    let t1 = t0 + Duration::from_secs(3);
    assert!(session.poll(t1 + Duration::from_secs(29)).is_none());
    let second = session.poll(t1 + Duration::from_secs(30)).unwrap();
    assert_eq!(second.trigger, AdvanceTrigger::Timeout);
    assert_eq!(second.points, 0);
    assert!(second.answer.is_empty());

    let t2 = t1 + Duration::from_secs(30);
    select_all(&mut session, &["blue", "red"]);
    let last = session.next(t2).unwrap();
    assert!(last.completed);
    assert_eq!(last.points, 0);

    assert_eq!(*session.phase(), Phase::Completed);
    assert_eq!(session.score(), 2);
    assert!(session.timer().is_none());
}

#[test]
fn test_timeout_after_completion_does_nothing() {
    let t0 = Instant::now();
    let mut session = QuizSession::new(5);
    session.load(Ok(quiz()), t0);
    for i in 1..=3 {
        session.poll(t0 + Duration::from_secs(5 * i));
    }
    assert_eq!(*session.phase(), Phase::Completed);
    assert!(session.poll(t0 + Duration::from_secs(60)).is_none());
    assert_eq!(session.score(), 0);
}

#[test]
fn test_answers_survive_on_disk_for_feedback() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(Config::default(), Some(json_log(&dir)), tx);
    let t0 = Instant::now();
    app.on_quiz_loaded(Ok(quiz()), t0);

    // lazy, quick: wrong order, zero live points but correct in feedback
    app.toggle_option(0);
    app.toggle_option(1);
    app.next_question(t0);
    app.toggle_option(1);
    app.next_question(t0);
    app.on_tick(t0 + Duration::from_secs(30));
    assert_eq!(*app.session.phase(), Phase::Completed);
    assert_eq!(app.session.score(), 1);

    // a fresh process sees the same files
    let (tx, _rx) = mpsc::channel();
    let mut reopened = App::new(Config::default(), Some(json_log(&dir)), tx);
    reopened.open_feedback();
    assert_eq!(reopened.screen, AppScreen::Feedback);
    let report = reopened.feedback.as_ref().unwrap().as_ref().unwrap();
    assert_eq!(report.total(), 3);
    assert_eq!(report.score(), 2);
    assert!(report.rows[0].correct);
    assert!(report.rows[1].correct);
    assert!(!report.rows[2].correct);
    assert!(report.rows[2].answer.is_empty());
}

#[test]
fn test_feedback_on_empty_store_is_data_not_found() {
    let dir = TempDir::new().unwrap();
    let log = json_log(&dir);
    assert_eq!(log.feedback(), Err(FeedbackError::DataNotFound));
}

#[test]
fn test_corrupt_answer_file_reports_data_not_found() {
    let dir = TempDir::new().unwrap();
    let mut log = json_log(&dir);
    log.begin(&quiz().questions).unwrap();
    fs::write(dir.path().join("user_answers.json"), "{ not json").unwrap();
    assert_eq!(log.feedback(), Err(FeedbackError::DataNotFound));
}

#[test]
fn test_file_source_feeds_a_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiz.json");
    fs::write(&path, QUIZ_JSON).unwrap();

    let source = resolve_source(path.to_str().unwrap());
    let mut session = QuizSession::new(10);
    session.load(source.fetch(), Instant::now());
    assert_eq!(*session.phase(), Phase::Active);
    assert_eq!(session.question_count(), 3);
    assert_eq!(session.quiz().unwrap().questions[0].question_id, "1");
}

#[test]
fn test_invalid_quiz_file_lands_in_error_then_retry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quiz.json");
    fs::write(&path, r#"{ "data": { "questions": [] } }"#).unwrap();

    let source = resolve_source(path.to_str().unwrap());
    let result = source.fetch();
    assert!(matches!(result, Err(FetchError::Invalid(_))));

    let mut session = QuizSession::new(10);
    session.load(result, Instant::now());
    assert!(matches!(session.phase(), Phase::Error(_)));
    assert!(session.retry());
    assert_eq!(*session.phase(), Phase::Loading);
}

#[test]
fn test_restart_resets_store_and_score() {
    let dir = TempDir::new().unwrap();
    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(Config::default(), Some(json_log(&dir)), tx);
    let t0 = Instant::now();
    app.on_quiz_loaded(Ok(quiz()), t0);
    app.toggle_option(1);
    app.toggle_option(0);
    app.next_question(t0);
    assert_eq!(app.session.score(), 2);

    app.restart(t0);
    assert_eq!(app.session.score(), 0);
    assert_eq!(app.session.state().current_index, 0);
    let log = app.answer_log.as_ref().unwrap();
    assert_eq!(log.answers().unwrap(), Some(vec![]));
    assert_eq!(log.questions().unwrap().unwrap().len(), 3);
}
