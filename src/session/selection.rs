use crate::quiz::Question;

/// Words picked for the current question's blanks, in blank order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlankSelection {
    words: Vec<String>,
    capacity: usize,
}

impl BlankSelection {
    pub fn new(capacity: usize) -> Self {
        Self {
            words: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn for_question(question: &Question) -> Self {
        Self::new(question.blanks())
    }

    /// Toggle `word`: remove it if already picked, otherwise append it
    /// while there is a free blank. Words outside `question.options` are
    /// ignored.
    pub fn select(&mut self, question: &Question, word: &str) {
        if let Some(pos) = self.words.iter().position(|w| w == word) {
            self.words.remove(pos);
            return;
        }
        if self.words.len() >= self.capacity || !question.has_option(word) {
            return;
        }
        self.words.push(word.to_string());
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn blank(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_complete(&self) -> bool {
        self.words.len() == self.capacity
    }
}
