//! Scoring for the live quiz and for the after-the-fact feedback view.
//!
//! The two procedures disagree on purpose: live scoring awards one point
//! per blank filled with the right word in the right position, while
//! feedback marks a whole question right when the same words were chosen
//! in any order. Keep them separate.

use thiserror::Error;

use crate::quiz::Question;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("no quiz data found, complete a quiz first")]
    DataNotFound,
}

/// Points for one question during the live session: one per blank whose
/// selected word matches the correct word at the same position.
pub fn live_score(selected: &[String], correct: &[String]) -> u32 {
    correct
        .iter()
        .enumerate()
        .filter(|(i, word)| selected.get(*i) == Some(*word))
        .count() as u32
}

/// Order-insensitive comparison used by the feedback view: sort both word
/// lists and compare.
pub fn feedback_is_correct(answer: &[String], correct: &[String]) -> bool {
    let mut answer = answer.to_vec();
    let mut correct = correct.to_vec();
    answer.sort();
    correct.sort();
    answer == correct
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackRow {
    pub question_id: String,
    pub question: String,
    pub answer: Vec<String>,
    pub correct_answer: Vec<String>,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackReport {
    pub rows: Vec<FeedbackRow>,
}

impl FeedbackReport {
    /// Questions marked correct; each contributes at most one.
    pub fn score(&self) -> usize {
        self.rows.iter().filter(|r| r.correct).count()
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }
}

/// Rebuild per-question correctness from persisted questions and answers.
/// Questions without a stored answer count as unanswered.
pub fn feedback_report(
    questions: &[Question],
    answers: &[Vec<String>],
) -> Result<FeedbackReport, FeedbackError> {
    if questions.is_empty() || answers.is_empty() {
        return Err(FeedbackError::DataNotFound);
    }

    let rows = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = answers.get(i).cloned().unwrap_or_default();
            let correct = feedback_is_correct(&answer, &q.correct_answer);
            FeedbackRow {
                question_id: q.question_id.clone(),
                question: q.question.clone(),
                answer,
                correct_answer: q.correct_answer.clone(),
                correct,
            }
        })
        .collect();

    Ok(FeedbackReport { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_live_score_is_position_sensitive() {
        assert_eq!(live_score(&words(&["slow", "fast"]), &words(&["fast", "slow"])), 0);
        assert_eq!(live_score(&words(&["fast", "slow"]), &words(&["fast", "slow"])), 2);
        assert_eq!(live_score(&words(&["fast", "red"]), &words(&["fast", "slow"])), 1);
    }

    #[test]
    fn test_live_score_partial_selection() {
        assert_eq!(live_score(&words(&["fast"]), &words(&["fast", "slow"])), 1);
        assert_eq!(live_score(&[], &words(&["fast", "slow"])), 0);
    }

    #[test]
    fn test_feedback_is_order_insensitive() {
        assert!(feedback_is_correct(&words(&["slow", "fast"]), &words(&["fast", "slow"])));
        assert!(!feedback_is_correct(&words(&["slow"]), &words(&["fast", "slow"])));
        assert!(!feedback_is_correct(&words(&["slow", "red"]), &words(&["fast", "slow"])));
    }

    #[test]
    fn test_policies_disagree_on_swapped_words() {
        let correct = words(&["fast", "slow"]);
        let picked = words(&["slow", "fast"]);
        assert_eq!(live_score(&picked, &correct), 0);
        assert!(feedback_is_correct(&picked, &correct));
    }

    #[test]
    fn test_feedback_report_counts_questions_not_blanks() {
        let questions = vec![
            question("1", "_____________ _____________", &["a", "b"], &["a", "b"]),
            question("2", "_____________", &["x", "y"], &["x"]),
        ];
        let answers = vec![words(&["b", "a"]), words(&["y"])];
        let report = feedback_report(&questions, &answers).unwrap();
        assert_eq!(report.score(), 1);
        assert_eq!(report.total(), 2);
        assert!(report.rows[0].correct);
        assert!(!report.rows[1].correct);
    }

    #[test]
    fn test_feedback_missing_answers_count_as_wrong() {
        let questions = vec![
            question("1", "_____________", &["a"], &["a"]),
            question("2", "_____________", &["b"], &["b"]),
        ];
        let report = feedback_report(&questions, &[words(&["a"])]).unwrap();
        assert_eq!(report.score(), 1);
        assert!(report.rows[1].answer.is_empty());
    }

    #[test]
    fn test_feedback_without_data_is_error() {
        let questions = vec![question("1", "_____________", &["a"], &["a"])];
        assert_eq!(feedback_report(&questions, &[]), Err(FeedbackError::DataNotFound));
        assert_eq!(
            feedback_report(&[], &[words(&["a"])]),
            Err(FeedbackError::DataNotFound)
        );
    }
}
