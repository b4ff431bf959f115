use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::Question;

pub const QUESTIONS_KEY: &str = "all_questions";
pub const ANSWERS_KEY: &str = "user_answers";

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionsData {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

impl QuestionsData {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            questions,
        }
    }

    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

/// One entry per finalized question, in question order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswersData {
    pub schema_version: u32,
    pub updated_at: DateTime<Utc>,
    pub answers: Vec<Vec<String>>,
}

impl Default for AnswersData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            updated_at: Utc::now(),
            answers: Vec::new(),
        }
    }
}

impl AnswersData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
