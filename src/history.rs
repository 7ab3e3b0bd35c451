//! Durable collections: the session summary history and the saved-quiz roster.

use std::sync::Arc;

use tracing::warn;

use crate::model::{Quiz, QuizSummary};
use crate::storage::{keys, KeyValueStore, StoreExt};

/// Append-only log of completed session summaries.
///
/// `completedAt` is the natural idempotency key for a completion event: an
/// append with a timestamp already present is silently skipped, so the same
/// summary can never be recorded twice.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<QuizSummary>,
}

impl HistoryStore {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = store.load_or(keys::QUIZ_HISTORY, Vec::new());
        Self { store, entries }
    }

    pub fn entries(&self) -> &[QuizSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `false` when the summary was already recorded.
    pub fn append(&mut self, summary: QuizSummary) -> bool {
        if self
            .entries
            .iter()
            .any(|s| s.completed_at == summary.completed_at)
        {
            return false;
        }
        self.entries.push(summary);
        self.persist();
        true
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(keys::QUIZ_HISTORY, &self.entries) {
            warn!(error = %err, "failed to persist quiz history");
        }
    }
}

/// Roster of imported quizzes, upserted by quiz id.
pub struct SavedQuizzes {
    store: Arc<dyn KeyValueStore>,
    quizzes: Vec<Quiz>,
}

impl SavedQuizzes {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let quizzes = store.load_or(keys::SAVED_QUIZZES, Vec::new());
        Self { store, quizzes }
    }

    pub fn all(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn get(&self, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == quiz_id)
    }

    pub fn save(&mut self, quiz: Quiz) {
        match self.quizzes.iter_mut().find(|q| q.id == quiz.id) {
            Some(existing) => *existing = quiz,
            None => self.quizzes.push(quiz),
        }
        if let Err(err) = self.store.save(keys::SAVED_QUIZZES, &self.quizzes) {
            warn!(error = %err, "failed to persist saved quizzes");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizResult;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn summary_at(ts: i64) -> QuizSummary {
        QuizSummary {
            quiz_id: "quiz".to_string(),
            quiz_title: "History fixture".to_string(),
            total_questions: 1,
            correct_answers: 1,
            total_time: 4,
            results: vec![QuizResult {
                question_id: "q0".to_string(),
                selected_option_id: Some("a".to_string()),
                is_correct: true,
                time_taken: 4,
            }],
            completed_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn test_append_persists_and_reloads() {
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryStore::load(store.clone());
        assert!(history.is_empty());

        assert!(history.append(summary_at(100)));
        assert!(history.append(summary_at(200)));
        assert_eq!(history.len(), 2);

        let reloaded = HistoryStore::load(store);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_duplicate_completed_at_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryStore::load(store);

        assert!(history.append(summary_at(100)));
        assert!(!history.append(summary_at(100)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_saved_quizzes_upsert_by_id() {
        let store = Arc::new(MemoryStore::new());
        let mut saved = SavedQuizzes::load(store.clone());

        let quiz = Quiz {
            id: "quiz".to_string(),
            title: "First title".to_string(),
            description: None,
            language: "en".to_string(),
            questions: Vec::new(),
        };
        saved.save(quiz.clone());
        saved.save(Quiz {
            title: "Second title".to_string(),
            ..quiz
        });

        assert_eq!(saved.all().len(), 1);
        assert_eq!(saved.get("quiz").unwrap().title, "Second title");

        let reloaded = SavedQuizzes::load(store);
        assert_eq!(reloaded.all().len(), 1);
    }
}
