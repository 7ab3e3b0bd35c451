//! Scoring and summary computation.
//!
//! Pure functions of a result list and a quiz. Everything the results view
//! shows is recomputable from a persisted [`QuizSummary`] alone, so the
//! history view can render past attempts without the original quiz document.

use chrono::{DateTime, Utc};

use crate::model::{Quiz, QuizResult, QuizSummary};

pub fn summarize(quiz: &Quiz, results: &[QuizResult], completed_at: DateTime<Utc>) -> QuizSummary {
    let correct_answers = results.iter().filter(|r| r.is_correct).count() as u32;
    let total_time = results.iter().map(|r| r.time_taken).sum();

    QuizSummary {
        quiz_id: quiz.id.clone(),
        quiz_title: quiz.title.clone(),
        total_questions: quiz.question_count() as u32,
        correct_answers,
        total_time,
        results: results.to_vec(),
        completed_at,
    }
}

/// Percentage of correct answers, rounded to the nearest integer.
pub fn score_percent(summary: &QuizSummary) -> u32 {
    if summary.total_questions == 0 {
        return 0;
    }
    let ratio = f64::from(summary.correct_answers) / f64::from(summary.total_questions);
    (ratio * 100.0).round() as u32
}

/// Average seconds spent per question, rounded to the nearest integer.
pub fn average_time_per_question(summary: &QuizSummary) -> u32 {
    if summary.total_questions == 0 {
        return 0;
    }
    let avg = f64::from(summary.total_time) / f64::from(summary.total_questions);
    avg.round() as u32
}

pub fn feedback_message(score_percent: u32) -> &'static str {
    if score_percent >= 90 {
        "Excellent! You're a master of this topic!"
    } else if score_percent >= 70 {
        "Great job! You have a solid understanding."
    } else if score_percent >= 50 {
        "Good effort! Keep practicing to improve."
    } else {
        "Don't give up! Try again to improve your score."
    }
}

/// `m:ss` rendering of a duration in seconds.
pub fn format_duration(total_secs: u32) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}
