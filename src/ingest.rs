//! Quiz ingestion boundary.
//!
//! Turns raw JSON text (hand-written or model-generated) into a validated,
//! fully-normalized [`Quiz`]. Normalization fills missing ids with UUIDs and
//! infers the question type from the option count, so the session engine never
//! has to re-derive either. No partially-valid quiz ever escapes this module.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Quiz, QuizOption, QuizQuestion, QuestionType};

const MIN_TITLE_CHARS: usize = 3;
const MIN_QUESTION_CHARS: usize = 3;
const MIN_OPTIONS: usize = 2;
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no JSON object found in the input")]
    NoJsonObject,

    #[error("title must have at least {MIN_TITLE_CHARS} characters")]
    TitleTooShort,

    #[error("at least 1 question is required")]
    NoQuestions,

    #[error("question {index}: text must have at least {MIN_QUESTION_CHARS} characters")]
    QuestionTextTooShort { index: usize },

    #[error("question {index}: at least {MIN_OPTIONS} options are required")]
    TooFewOptions { index: usize },

    #[error("question {index}, option {option}: text cannot be empty")]
    EmptyOptionText { index: usize, option: usize },

    #[error("question {index}: exactly one option must be correct (found {found})")]
    CorrectCountMismatch { index: usize, found: usize },

    #[error("question {index}: true/false questions must have exactly 2 options")]
    TrueFalseOptionCount { index: usize },

    #[error("question {index}: duplicate option id \"{id}\"")]
    DuplicateOptionId { index: usize, id: String },

    #[error("duplicate question id \"{id}\"")]
    DuplicateQuestionId { id: String },
}

// Raw shapes as they arrive over the wire. Ids and types are optional here;
// normalization produces the fully-specified model types.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOption {
    #[serde(default)]
    id: Option<String>,
    text: String,
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(rename = "type", default)]
    question_type: Option<QuestionType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuiz {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

/// Validate and normalize a quiz document from raw JSON text.
pub fn validate_quiz_json(raw: &str) -> Result<Quiz, ValidationError> {
    let raw_quiz: RawQuiz = serde_json::from_str(raw)?;
    normalize(raw_quiz)
}

fn normalize(raw: RawQuiz) -> Result<Quiz, ValidationError> {
    if raw.title.chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::TitleTooShort);
    }
    if raw.questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }

    let mut questions = Vec::with_capacity(raw.questions.len());
    let mut question_ids = Vec::with_capacity(raw.questions.len());

    for (index, question) in raw.questions.into_iter().enumerate() {
        if question.text.chars().count() < MIN_QUESTION_CHARS {
            return Err(ValidationError::QuestionTextTooShort { index });
        }
        if question.options.len() < MIN_OPTIONS {
            return Err(ValidationError::TooFewOptions { index });
        }

        let correct = question.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(ValidationError::CorrectCountMismatch {
                index,
                found: correct,
            });
        }

        let question_type = question
            .question_type
            .unwrap_or_else(|| QuestionType::infer(question.options.len()));
        if question_type == QuestionType::TrueFalse && question.options.len() != 2 {
            return Err(ValidationError::TrueFalseOptionCount { index });
        }

        let mut options = Vec::with_capacity(question.options.len());
        let mut option_ids = Vec::with_capacity(question.options.len());
        for (opt_index, option) in question.options.into_iter().enumerate() {
            if option.text.trim().is_empty() {
                return Err(ValidationError::EmptyOptionText {
                    index,
                    option: opt_index,
                });
            }
            let id = option
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            if option_ids.contains(&id) {
                return Err(ValidationError::DuplicateOptionId { index, id });
            }
            option_ids.push(id.clone());
            options.push(QuizOption {
                id,
                text: option.text,
                is_correct: option.is_correct,
            });
        }

        let id = question
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if question_ids.contains(&id) {
            return Err(ValidationError::DuplicateQuestionId { id });
        }
        question_ids.push(id.clone());

        questions.push(QuizQuestion {
            id,
            text: question.text,
            options,
            explanation: question.explanation,
            question_type,
        });
    }

    Ok(Quiz {
        id: raw.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        title: raw.title,
        description: raw.description,
        language: raw.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        questions,
    })
}

/// Slice the first complete JSON object out of free-form model output.
///
/// Model replies often wrap the payload in prose or markdown fences. The scan
/// is string- and escape-aware so braces inside string literals do not
/// unbalance the window.
pub fn extract_json_object(text: &str) -> Result<&str, ValidationError> {
    let bytes = text.as_bytes();
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
            } else {
                match b {
                    b'\\' => escape = true,
                    b'"' => in_string = false,
                    _ => {}
                }
            }
            continue;
        }
        match b {
            b'"' if start.is_some() => in_string = true,
            b'{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                if let Some(s) = start {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    Err(ValidationError::NoJsonObject)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option_json(text: &str, correct: bool) -> String {
        format!("{{\"text\": \"{text}\", \"isCorrect\": {correct}}}")
    }

    fn quiz_json(questions: &[String]) -> String {
        format!(
            "{{\"title\": \"Sample quiz\", \"questions\": [{}]}}",
            questions.join(",")
        )
    }

    fn question_json(text: &str, options: &[String]) -> String {
        format!(
            "{{\"text\": \"{text}\", \"options\": [{}]}}",
            options.join(",")
        )
    }

    #[test]
    fn test_valid_quiz_is_normalized() {
        let json = quiz_json(&[question_json(
            "What is 2 + 2?",
            &[
                option_json("3", false),
                option_json("4", true),
                option_json("5", false),
            ],
        )]);
        let quiz = validate_quiz_json(&json).unwrap();

        assert_eq!(quiz.title, "Sample quiz");
        assert_eq!(quiz.language, "en");
        assert!(!quiz.id.is_empty());
        let question = &quiz.questions[0];
        assert!(!question.id.is_empty());
        assert_eq!(question.question_type, QuestionType::Multiple);
        assert!(question.options.iter().all(|o| !o.id.is_empty()));
    }

    #[test]
    fn test_two_options_infer_truefalse() {
        let json = quiz_json(&[question_json(
            "The sky is blue.",
            &[option_json("True", true), option_json("False", false)],
        )]);
        let quiz = validate_quiz_json(&json).unwrap();
        assert_eq!(quiz.questions[0].question_type, QuestionType::TrueFalse);
    }

    #[test]
    fn test_declared_truefalse_with_three_options_rejected() {
        let json = r#"{
            "title": "Sample quiz",
            "questions": [{
                "text": "The sky is blue.",
                "type": "truefalse",
                "options": [
                    {"text": "True", "isCorrect": true},
                    {"text": "False", "isCorrect": false},
                    {"text": "Maybe", "isCorrect": false}
                ]
            }]
        }"#;
        assert!(matches!(
            validate_quiz_json(json),
            Err(ValidationError::TrueFalseOptionCount { index: 0 })
        ));
    }

    #[test]
    fn test_missing_options_rejected() {
        let json = r#"{"title": "Sample quiz", "questions": [{"text": "No options here?"}]}"#;
        assert!(matches!(
            validate_quiz_json(json),
            Err(ValidationError::TooFewOptions { index: 0 })
        ));
    }

    #[test]
    fn test_zero_or_two_correct_options_rejected() {
        let none_correct = quiz_json(&[question_json(
            "Pick one",
            &[option_json("a", false), option_json("b", false)],
        )]);
        assert!(matches!(
            validate_quiz_json(&none_correct),
            Err(ValidationError::CorrectCountMismatch { index: 0, found: 0 })
        ));

        let two_correct = quiz_json(&[question_json(
            "Pick one",
            &[option_json("a", true), option_json("b", true)],
        )]);
        assert!(matches!(
            validate_quiz_json(&two_correct),
            Err(ValidationError::CorrectCountMismatch { index: 0, found: 2 })
        ));
    }

    #[test]
    fn test_short_title_rejected() {
        let json = r#"{"title": "ab", "questions": []}"#;
        assert!(matches!(
            validate_quiz_json(json),
            Err(ValidationError::TitleTooShort)
        ));
    }

    #[test]
    fn test_empty_question_list_rejected() {
        let json = r#"{"title": "Sample quiz", "questions": []}"#;
        assert!(matches!(
            validate_quiz_json(json),
            Err(ValidationError::NoQuestions)
        ));
    }

    #[test]
    fn test_malformed_json_reports_parse_error() {
        assert!(matches!(
            validate_quiz_json("{not json"),
            Err(ValidationError::Json(_))
        ));
    }

    #[test]
    fn test_extract_json_object_strips_fences() {
        let reply = "Here is your quiz:\n```json\n{\"title\": \"T\"}\n```\nEnjoy!";
        assert_eq!(extract_json_object(reply).unwrap(), "{\"title\": \"T\"}");
    }

    #[test]
    fn test_extract_json_object_ignores_braces_in_strings() {
        let reply = "{\"text\": \"curly } brace\", \"n\": 1}";
        assert_eq!(extract_json_object(reply).unwrap(), reply);
    }

    #[test]
    fn test_extract_json_object_requires_object() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(ValidationError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("{ never closed"),
            Err(ValidationError::NoJsonObject)
        ));
    }
}
