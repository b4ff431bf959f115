use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::engine::scoring::{self, FeedbackError, FeedbackReport};
use crate::quiz::Question;
use crate::store::schema::{ANSWERS_KEY, AnswersData, QUESTIONS_KEY, QuestionsData};
use crate::store::{KeyValueStore, StoreError};

/// The questions of the current quiz plus the answers given so far,
/// written while the quiz runs and read back by the feedback view.
pub struct AnswerLog<S> {
    store: S,
}

impl<S: KeyValueStore> AnswerLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store the question list and clear any answers from an earlier run.
    pub fn begin(&mut self, questions: &[Question]) -> Result<(), StoreError> {
        let questions = QuestionsData::new(questions.to_vec());
        self.store
            .set(QUESTIONS_KEY, &serde_json::to_string_pretty(&questions)?)?;
        self.write_answers(&AnswersData::default())
    }

    /// Record the finalized answer for `question_index`. Missing earlier
    /// entries are filled with empty answers.
    pub fn record(&mut self, question_index: usize, answer: &[String]) -> Result<(), StoreError> {
        let mut data = self
            .read::<AnswersData>(ANSWERS_KEY)?
            .filter(|d| !d.needs_reset())
            .unwrap_or_default();
        if data.answers.len() <= question_index {
            data.answers.resize(question_index + 1, Vec::new());
        }
        data.answers[question_index] = answer.to_vec();
        data.updated_at = Utc::now();
        self.write_answers(&data)
    }

    pub fn questions(&self) -> Result<Option<Vec<Question>>, StoreError> {
        Ok(self
            .read::<QuestionsData>(QUESTIONS_KEY)?
            .filter(|d| !d.needs_reset())
            .map(|d| d.questions))
    }

    pub fn answers(&self) -> Result<Option<Vec<Vec<String>>>, StoreError> {
        Ok(self
            .read::<AnswersData>(ANSWERS_KEY)?
            .filter(|d| !d.needs_reset())
            .map(|d| d.answers))
    }

    /// Score the stored answers with the order-insensitive feedback rule.
    /// Unreadable entries count as missing.
    pub fn feedback(&self) -> Result<FeedbackReport, FeedbackError> {
        let questions = self.questions().unwrap_or_else(|e| {
            warn!(error = %e, "stored questions unreadable");
            None
        });
        let answers = self.answers().unwrap_or_else(|e| {
            warn!(error = %e, "stored answers unreadable");
            None
        });
        match (questions, answers) {
            (Some(questions), Some(answers)) => scoring::feedback_report(&questions, &answers),
            _ => Err(FeedbackError::DataNotFound),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    fn write_answers(&mut self, data: &AnswersData) -> Result<(), StoreError> {
        self.store
            .set(ANSWERS_KEY, &serde_json::to_string_pretty(data)?)
    }
}
