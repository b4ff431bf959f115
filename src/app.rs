use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::scoring::{FeedbackError, FeedbackReport};
use crate::event::AppEvent;
use crate::quiz::QuizData;
use crate::session::quiz::{Advance, Phase, QuizSession};
use crate::source::{FetchError, resolve_source};
use crate::store::KeyValueStore;
use crate::store::answer_log::AnswerLog;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Quiz,
    Feedback,
}

pub type DynAnswerLog = AnswerLog<Box<dyn KeyValueStore>>;

pub struct App {
    pub screen: AppScreen,
    pub session: QuizSession,
    pub feedback: Option<Result<FeedbackReport, FeedbackError>>,
    pub config: Config,
    pub theme: &'static Theme,
    pub answer_log: Option<DynAnswerLog>,
    pub option_cursor: usize,
    pub feedback_scroll: usize,
    pub should_quit: bool,
    fetching: bool,
    log_pending: bool,
    events: Sender<AppEvent>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, answer_log: Option<DynAnswerLog>, events: Sender<AppEvent>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let session = QuizSession::new(config.time_per_question);

        Self {
            screen: AppScreen::Quiz,
            session,
            feedback: None,
            config,
            theme,
            answer_log,
            option_cursor: 0,
            feedback_scroll: 0,
            should_quit: false,
            fetching: false,
            log_pending: false,
            events,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Kick off the question fetch on a background thread; the result comes
    /// back as `AppEvent::QuizLoaded`.
    pub fn start_fetch(&mut self) {
        self.fetching = true;
        spawn_fetch(self.config.question_source.clone(), self.events.clone());
    }

    /// The answer log is only reset once the quiz screen is showing, so a
    /// quiz loading behind the feedback view leaves the stored run intact.
    pub fn on_quiz_loaded(&mut self, result: Result<QuizData, FetchError>, now: Instant) {
        self.fetching = false;
        let result = result.map(|mut quiz| {
            if self.config.shuffle_options {
                quiz.shuffle_options(&mut self.rng);
            }
            quiz
        });
        self.session.load(result, now);
        if *self.session.phase() == Phase::Active {
            if self.screen == AppScreen::Quiz {
                self.begin_answer_log();
            } else {
                self.log_pending = true;
            }
        }
    }

    pub fn retry(&mut self) {
        if self.session.retry() {
            info!("retrying question fetch");
            self.start_fetch();
        }
    }

    pub fn restart(&mut self, now: Instant) {
        if self.session.restart(now) {
            self.option_cursor = 0;
            self.feedback = None;
            self.screen = AppScreen::Quiz;
            self.begin_answer_log();
        }
    }

    /// The countdown only runs while the quiz screen is showing.
    pub fn on_tick(&mut self, now: Instant) {
        if self.screen != AppScreen::Quiz {
            return;
        }
        if let Some(advance) = self.session.poll(now) {
            self.on_advance(advance);
        }
    }

    pub fn next_question(&mut self, now: Instant) {
        if let Some(advance) = self.session.next(now) {
            self.on_advance(advance);
        }
    }

    fn on_advance(&mut self, advance: Advance) {
        self.option_cursor = 0;
        if let Some(log) = self.answer_log.as_mut()
            && let Err(e) = log.record(advance.question_index, &advance.answer)
        {
            warn!(error = %e, "failed to persist answer");
        }
    }

    fn begin_answer_log(&mut self) {
        self.log_pending = false;
        let Some(quiz) = self.session.quiz() else {
            return;
        };
        if let Some(log) = self.answer_log.as_mut()
            && let Err(e) = log.begin(&quiz.questions)
        {
            warn!(error = %e, "failed to persist questions");
        }
    }

    /// Build the feedback view from the answer log alone.
    pub fn open_feedback(&mut self) {
        let report = match self.answer_log.as_ref() {
            Some(log) => log.feedback(),
            None => Err(FeedbackError::DataNotFound),
        };
        if let Ok(ref r) = report {
            info!(score = r.score(), total = r.total(), "feedback computed");
        }
        self.feedback = Some(report);
        self.feedback_scroll = 0;
        self.screen = AppScreen::Feedback;
    }

    /// Return to the quiz. Starts the fetch if none ran yet (`--feedback`)
    /// and gives the current question a fresh countdown.
    pub fn back_to_quiz(&mut self, now: Instant) {
        self.screen = AppScreen::Quiz;
        let phase = self.session.phase().clone();
        match phase {
            Phase::Loading if !self.fetching => self.start_fetch(),
            Phase::Active => {
                if self.log_pending {
                    self.begin_answer_log();
                }
                self.session.resume(now);
            }
            _ => {}
        }
    }

    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |q| q.options.len())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.option_count();
        if count == 0 {
            return;
        }
        let next = (self.option_cursor as isize + delta).rem_euclid(count as isize);
        self.option_cursor = next as usize;
    }

    pub fn toggle_option(&mut self, index: usize) {
        let Some(word) = self
            .session
            .current_question()
            .and_then(|q| q.options.get(index))
            .cloned()
        else {
            return;
        };
        self.option_cursor = index;
        self.session.select(&word);
    }

    pub fn toggle_cursor(&mut self) {
        self.toggle_option(self.option_cursor);
    }

    pub fn scroll_feedback(&mut self, delta: isize) {
        let rows = match &self.feedback {
            Some(Ok(report)) => report.total(),
            _ => 0,
        };
        let next = (self.feedback_scroll as isize + delta).clamp(0, rows.saturating_sub(1) as isize);
        self.feedback_scroll = next as usize;
    }
}

pub fn spawn_fetch(setting: String, events: Sender<AppEvent>) {
    thread::spawn(move || {
        let source = resolve_source(&setting);
        info!(source = %source.describe(), "fetching questions");
        let result = source.fetch();
        let _ = events.send(AppEvent::QuizLoaded(result));
    });
}
