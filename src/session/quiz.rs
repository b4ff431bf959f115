use std::time::Instant;

use tracing::{debug, info, warn};

use crate::engine::scoring;
use crate::quiz::{Question, QuizData};
use crate::session::selection::BlankSelection;
use crate::session::timer::{Countdown, Timeout};
use crate::source::FetchError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error(String),
    Active,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceTrigger {
    Manual,
    Timeout,
}

impl AdvanceTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            AdvanceTrigger::Manual => "manual",
            AdvanceTrigger::Timeout => "timeout",
        }
    }
}

/// A finalized question, handed back to the caller for persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advance {
    pub question_index: usize,
    pub answer: Vec<String>,
    pub points: u32,
    pub trigger: AdvanceTrigger,
    pub completed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub selection: BlankSelection,
    pub cumulative_score: u32,
    pub completed: bool,
}

pub struct QuizSession {
    phase: Phase,
    quiz: Option<QuizData>,
    state: SessionState,
    timer: Option<Countdown>,
    time_per_question: u32,
}

impl QuizSession {
    pub fn new(time_per_question: u32) -> Self {
        Self {
            phase: Phase::Loading,
            quiz: None,
            state: SessionState::default(),
            timer: None,
            time_per_question: time_per_question.max(1),
        }
    }

    /// Resolve the pending fetch. Ignored unless the session is loading.
    pub fn load(&mut self, result: Result<QuizData, FetchError>, now: Instant) {
        if self.phase != Phase::Loading {
            warn!("quiz data arrived outside of loading phase, ignoring");
            return;
        }
        match result {
            Ok(quiz) => {
                info!(questions = quiz.len(), "quiz loaded");
                self.quiz = Some(quiz);
                self.start(now);
            }
            Err(err) => {
                warn!(error = %err, "failed to load quiz");
                self.phase = Phase::Error(err.to_string());
            }
        }
    }

    /// Leave the error state so the caller can fetch again.
    pub fn retry(&mut self) -> bool {
        if matches!(self.phase, Phase::Error(_)) {
            self.phase = Phase::Loading;
            true
        } else {
            false
        }
    }

    /// Back to the first question with a zero score. Only valid once a quiz
    /// has loaded; the quiz itself is not fetched again.
    pub fn restart(&mut self, now: Instant) -> bool {
        if !matches!(self.phase, Phase::Active | Phase::Completed) {
            return false;
        }
        info!("quiz restarted");
        self.start(now);
        true
    }

    /// Arm a fresh countdown for the current question. Used when the quiz
    /// screen comes back into view; the old countdown is discarded.
    pub fn resume(&mut self, now: Instant) {
        if self.phase != Phase::Active {
            return;
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        let index = self.state.current_index;
        debug!(question = index, "countdown rearmed");
        self.timer = Some(Countdown::new(index, self.time_per_question, now));
    }

    fn start(&mut self, now: Instant) {
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        let selection = self
            .quiz
            .as_ref()
            .and_then(|q| q.get(0))
            .map(BlankSelection::for_question)
            .unwrap_or_default();
        self.state = SessionState {
            current_index: 0,
            selection,
            cumulative_score: 0,
            completed: false,
        };
        self.timer = Some(Countdown::new(0, self.time_per_question, now));
        self.phase = Phase::Active;
    }

    pub fn select(&mut self, word: &str) {
        if self.phase != Phase::Active {
            return;
        }
        let Some(question) = self.quiz.as_ref().and_then(|q| q.get(self.state.current_index))
        else {
            return;
        };
        self.state.selection.select(question, word);
    }

    /// Whether the "next"/"finish" action is enabled.
    pub fn can_advance(&self) -> bool {
        self.phase == Phase::Active && self.state.selection.is_complete()
    }

    /// Manual advance; only allowed once every blank is filled.
    pub fn next(&mut self, now: Instant) -> Option<Advance> {
        if !self.can_advance() {
            return None;
        }
        self.advance(AdvanceTrigger::Manual, now)
    }

    /// Forced advance from an expired countdown, regardless of how many
    /// blanks are filled. Signals for any other question are dropped.
    pub fn on_timeout(&mut self, timeout: Timeout, now: Instant) -> Option<Advance> {
        if self.phase != Phase::Active || timeout.question_index != self.state.current_index {
            debug!(
                stale = timeout.question_index,
                current = self.state.current_index,
                "ignoring stale timeout"
            );
            return None;
        }
        self.advance(AdvanceTrigger::Timeout, now)
    }

    /// Drive the current countdown; returns the forced advance if it expired.
    pub fn poll(&mut self, now: Instant) -> Option<Advance> {
        let timeout = self.timer.as_mut()?.poll(now)?;
        self.on_timeout(timeout, now)
    }

    fn advance(&mut self, trigger: AdvanceTrigger, now: Instant) -> Option<Advance> {
        if self.phase != Phase::Active {
            return None;
        }
        let quiz = self.quiz.as_ref()?;
        let index = self.state.current_index;
        debug_assert!(index < quiz.len(), "question index {index} out of range");
        let question = quiz.get(index)?;

        let points = scoring::live_score(self.state.selection.words(), &question.correct_answer);
        self.state.cumulative_score += points;
        let answer = self.state.selection.words().to_vec();

        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }

        let completed = index + 1 >= quiz.len();
        if completed {
            self.state.completed = true;
            self.timer = None;
            self.phase = Phase::Completed;
        } else {
            self.state.current_index = index + 1;
            self.state.selection = quiz
                .get(index + 1)
                .map(BlankSelection::for_question)
                .unwrap_or_default();
            self.timer = Some(Countdown::new(index + 1, self.time_per_question, now));
        }

        info!(
            question = index,
            points,
            total = self.state.cumulative_score,
            trigger = trigger.as_str(),
            completed,
            "question finalized"
        );

        Some(Advance {
            question_index: index,
            answer,
            points,
            trigger,
            completed,
        })
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn quiz(&self) -> Option<&QuizData> {
        self.quiz.as_ref()
    }

    pub fn timer(&self) -> Option<&Countdown> {
        self.timer.as_ref()
    }

    pub fn time_per_question(&self) -> u32 {
        self.time_per_question
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref()?.get(self.state.current_index)
    }

    pub fn question_count(&self) -> usize {
        self.quiz.as_ref().map_or(0, QuizData::len)
    }

    pub fn is_last_question(&self) -> bool {
        self.state.current_index + 1 >= self.question_count()
    }

    pub fn score(&self) -> u32 {
        self.state.cumulative_score
    }

    pub fn max_score(&self) -> u32 {
        self.quiz.as_ref().map_or(0, QuizData::max_score)
    }

    /// What the current selection would score if finalized now.
    pub fn pending_points(&self) -> u32 {
        self.current_question().map_or(0, |q| {
            scoring::live_score(self.state.selection.words(), &q.correct_answer)
        })
    }
}
