//! Quiz document model.
//!
//! The content types are immutable once a quiz has been loaded into the
//! session engine; the engine is the sole writer of `QuizResult` and
//! `QuizSummary`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ========== Question type ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Multiple,
    TrueFalse,
}

impl QuestionType {
    /// Infer the type from the option count when the document omits it.
    pub fn infer(option_count: usize) -> Self {
        if option_count > 2 {
            QuestionType::Multiple
        } else {
            QuestionType::TrueFalse
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::TrueFalse => "truefalse",
        }
    }
}

// ========== Content ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

impl QuizQuestion {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub language: String,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }
}

// ========== Per-session records ==========

/// Outcome of a single question within one attempt.
///
/// `selected_option_id` is `None` when the question timed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub question_id: String,
    pub selected_option_id: Option<String>,
    pub is_correct: bool,
    pub time_taken: u32,
}

/// Immutable scored record of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub quiz_id: String,
    pub quiz_title: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_time: u32,
    pub results: Vec<QuizResult>,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_inference() {
        assert_eq!(QuestionType::infer(2), QuestionType::TrueFalse);
        assert_eq!(QuestionType::infer(3), QuestionType::Multiple);
        assert_eq!(QuestionType::infer(5), QuestionType::Multiple);
    }

    #[test]
    fn test_question_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&QuestionType::Multiple).unwrap(),
            "\"multiple\""
        );
        assert_eq!(
            serde_json::to_string(&QuestionType::TrueFalse).unwrap(),
            "\"truefalse\""
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = QuizResult {
            question_id: "q1".to_string(),
            selected_option_id: None,
            is_correct: false,
            time_taken: 30,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["questionId"], "q1");
        assert_eq!(json["selectedOptionId"], serde_json::Value::Null);
        assert_eq!(json["isCorrect"], false);
        assert_eq!(json["timeTaken"], 30);
    }

    #[test]
    fn test_correct_option_lookup() {
        let question = QuizQuestion {
            id: "q1".to_string(),
            text: "2 + 2?".to_string(),
            options: vec![
                QuizOption {
                    id: "a".to_string(),
                    text: "3".to_string(),
                    is_correct: false,
                },
                QuizOption {
                    id: "b".to_string(),
                    text: "4".to_string(),
                    is_correct: true,
                },
            ],
            explanation: None,
            question_type: QuestionType::TrueFalse,
        };
        assert_eq!(question.correct_option().map(|o| o.id.as_str()), Some("b"));
        assert!(question.option("missing").is_none());
    }
}
