use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cloze::engine::scoring::{feedback_report, live_score};
use cloze::quiz::{BLANK_MARKER, Question};

fn make_questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| Question {
            question_id: i.to_string(),
            question: format!("The {BLANK_MARKER} sat on the {BLANK_MARKER} near the {BLANK_MARKER}."),
            options: ["cat", "mat", "door", "dog", "rug", "window"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            correct_answer: ["cat", "mat", "door"].iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

fn make_answers(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            let words: &[&str] = match i % 3 {
                0 => &["cat", "mat", "door"],
                1 => &["door", "cat", "mat"],
                _ => &["dog"],
            };
            words.iter().map(|s| s.to_string()).collect()
        })
        .collect()
}

fn bench_live_score(c: &mut Criterion) {
    let questions = make_questions(100);
    let answers = make_answers(100);

    c.bench_function("live_score (100 questions)", |b| {
        b.iter(|| {
            questions
                .iter()
                .zip(&answers)
                .map(|(q, a)| live_score(black_box(a), black_box(&q.correct_answer)))
                .sum::<u32>()
        })
    });
}

fn bench_feedback_report(c: &mut Criterion) {
    let questions = make_questions(100);
    let answers = make_answers(100);

    c.bench_function("feedback_report (100 questions)", |b| {
        b.iter(|| feedback_report(black_box(&questions), black_box(&answers)))
    });
}

criterion_group!(benches, bench_live_score, bench_feedback_report);
criterion_main!(benches);
