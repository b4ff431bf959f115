use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Marker standing in for one blank inside a question's text.
pub const BLANK_MARKER: &str = "_____________";

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("quiz contains no questions")]
    NoQuestions,
    #[error("question {question_id} has no blanks")]
    NoBlanks { question_id: String },
    #[error("question {question_id} has {blanks} blanks but {answers} correct words")]
    BlankCountMismatch {
        question_id: String,
        blanks: usize,
        answers: usize,
    },
    #[error("question {question_id}: correct word {word:?} is not among the options")]
    AnswerNotInOptions { question_id: String, word: String },
    #[error("malformed quiz json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(deserialize_with = "id_as_string")]
    pub question_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl Question {
    /// Number of words the user must pick (one per blank).
    pub fn blanks(&self) -> usize {
        self.correct_answer.len()
    }

    pub fn marker_count(&self) -> usize {
        self.question.matches(BLANK_MARKER).count()
    }

    /// Text pieces around the blanks; always `marker_count() + 1` long.
    pub fn segments(&self) -> Vec<&str> {
        self.question.split(BLANK_MARKER).collect()
    }

    pub fn has_option(&self, word: &str) -> bool {
        self.options.iter().any(|o| o == word)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        let blanks = self.marker_count();
        if blanks == 0 {
            return Err(QuizError::NoBlanks {
                question_id: self.question_id.clone(),
            });
        }
        if blanks != self.correct_answer.len() {
            return Err(QuizError::BlankCountMismatch {
                question_id: self.question_id.clone(),
                blanks,
                answers: self.correct_answer.len(),
            });
        }
        if let Some(word) = self.correct_answer.iter().find(|w| !self.has_option(w)) {
            return Err(QuizError::AnswerNotInOptions {
                question_id: self.question_id.clone(),
                word: word.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizData {
    pub questions: Vec<Question>,
}

#[derive(Deserialize)]
struct Envelope {
    data: QuizData,
}

impl QuizData {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse the `{ "data": { "questions": [...] } }` wire format and validate it.
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let envelope: Envelope = serde_json::from_str(json)?;
        envelope.data.validate()?;
        Ok(envelope.data)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        self.questions.iter().try_for_each(Question::validate)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Best possible live score: one point per blank across the quiz.
    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(|q| q.blanks() as u32).sum()
    }

    pub fn shuffle_options<R: Rng>(&mut self, rng: &mut R) {
        for q in &mut self.questions {
            q.options.shuffle(rng);
        }
    }
}

#[cfg(test)]
pub(crate) fn question(id: &str, text: &str, options: &[&str], correct: &[&str]) -> Question {
    Question {
        question_id: id.to_string(),
        question: text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer: correct.iter().map(|s| s.to_string()).collect(),
    }
}
