//! Shared fixtures for integration tests.

use hastyquiz_core::model::{Quiz, QuizOption, QuizQuestion, QuestionType};

/// A quiz with `questions` questions of `options` options each; option 0 of
/// every question is the correct one, with ids `q{n}` / `q{n}-o{m}`.
pub fn sample_quiz(questions: usize, options: usize) -> Quiz {
    Quiz {
        id: "sample-quiz".to_string(),
        title: "Sample quiz".to_string(),
        description: Some("Integration fixture".to_string()),
        language: "en".to_string(),
        questions: (0..questions)
            .map(|q| QuizQuestion {
                id: format!("q{q}"),
                text: format!("Question {q}?"),
                options: (0..options)
                    .map(|o| QuizOption {
                        id: format!("q{q}-o{o}"),
                        text: format!("Option {o}"),
                        is_correct: o == 0,
                    })
                    .collect(),
                explanation: None,
                question_type: QuestionType::infer(options),
            })
            .collect(),
    }
}

pub fn correct_option(question: usize) -> String {
    format!("q{question}-o0")
}

pub fn wrong_option(question: usize) -> String {
    format!("q{question}-o1")
}
