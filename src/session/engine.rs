//! Quiz session state machine.
//!
//! Owns the quiz lifecycle: load, configure, start (with shuffle), per-question
//! answer/timeout, score accumulation, completion, summary, history append,
//! reset/restart. All mutations run on the caller's thread; persistence is a
//! best-effort mirror (failures are logged, never surfaced), and invalid
//! operations (stale timer callbacks, re-answers, unknown option ids) are
//! silent no-ops so the presentation layer can stay naive.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::events::{EventBus, QuizEvent};
use crate::history::HistoryStore;
use crate::model::{Quiz, QuizResult, QuizSummary};
use crate::prefs::UserPreferences;
use crate::session::clock::{SystemClock, TimeSource};
use crate::session::{shuffle, summary};
use crate::storage::{keys, KeyValueStore, StoreExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No quiz loaded.
    Idle,
    /// Quiz loaded, not started.
    Configuring,
    /// A question is in progress.
    Active,
    /// A summary exists for the attempt.
    Completed,
}

impl SessionPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "IDLE",
            SessionPhase::Configuring => "CONFIGURING",
            SessionPhase::Active => "ACTIVE",
            SessionPhase::Completed => "COMPLETED",
        }
    }
}

pub struct SessionEngine {
    store: Arc<dyn KeyValueStore>,
    events: Arc<EventBus>,
    clock: Box<dyn TimeSource>,
    history: HistoryStore,

    /// The quiz as loaded; the canonical ordering every shuffle starts from.
    source: Option<Quiz>,
    /// The arrangement presented this session (possibly a shuffled copy).
    current: Option<Quiz>,

    phase: SessionPhase,
    current_index: usize,
    results: Vec<QuizResult>,
    summary: Option<QuizSummary>,
    session_prefs: UserPreferences,

    question_started: Option<Instant>,
    /// Bumped on every question entry/exit; expiries carrying an older epoch
    /// belong to a question that has already moved on and are ignored.
    timer_epoch: u64,
}

impl SessionEngine {
    pub fn new(store: Arc<dyn KeyValueStore>, events: Arc<EventBus>) -> Self {
        Self::with_clock(store, events, Box::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        events: Arc<EventBus>,
        clock: Box<dyn TimeSource>,
    ) -> Self {
        let history = HistoryStore::load(store.clone());
        Self {
            store,
            events,
            clock,
            history,
            source: None,
            current: None,
            phase: SessionPhase::Idle,
            current_index: 0,
            results: Vec::new(),
            summary: None,
            session_prefs: UserPreferences::default(),
            question_started: None,
            timer_epoch: 0,
        }
    }

    /// Rebuild an inactive engine from the persisted mirror.
    pub fn restore(store: Arc<dyn KeyValueStore>, events: Arc<EventBus>) -> Self {
        let mut engine = Self::new(store, events);
        let quiz: Option<Quiz> = match engine.store.load(keys::CURRENT_QUIZ) {
            Ok(quiz) => quiz,
            Err(err) => {
                warn!(error = %err, "failed to restore current quiz");
                None
            }
        };
        if let Some(quiz) = quiz {
            engine.results = engine.store.load_or(keys::CURRENT_RESULTS, Vec::new());
            engine.summary = engine.store.load_or(keys::CURRENT_SUMMARY, None);
            engine.phase = if engine.summary.is_some() {
                SessionPhase::Completed
            } else {
                SessionPhase::Configuring
            };
            engine.source = Some(quiz.clone());
            engine.current = Some(quiz);
        }
        engine
    }

    // ========== Read accessors ==========

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_quiz(&self) -> Option<&Quiz> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn current_question_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&crate::model::QuizQuestion> {
        self.current.as_ref()?.question(self.current_index)
    }

    pub fn results(&self) -> &[QuizResult] {
        &self.results
    }

    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn session_preferences(&self) -> &UserPreferences {
        &self.session_prefs
    }

    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    /// Seconds allowed per question for the running session.
    pub fn time_limit(&self) -> u32 {
        self.session_prefs.time_per_question
    }

    /// A session counts as complete when a summary exists, or, defensively,
    /// when every question has a result and the session is no longer active
    /// (covers a summary write lagging the final result write).
    pub fn is_complete(&self) -> bool {
        if self.summary.is_some() {
            return true;
        }
        match self.current.as_ref() {
            Some(quiz) => {
                !self.is_active()
                    && quiz.question_count() > 0
                    && self.results.len() == quiz.question_count()
            }
            None => false,
        }
    }

    // ========== Transitions ==========

    /// Replace the loaded quiz, discarding any in-flight session.
    pub fn load_quiz(&mut self, quiz: Quiz) {
        info!(quiz_id = %quiz.id, title = %quiz.title, "quiz loaded");
        self.events.publish(QuizEvent::QuizLoaded {
            quiz_id: quiz.id.clone(),
            title: quiz.title.clone(),
            question_count: quiz.question_count() as u32,
        });

        self.persist(keys::CURRENT_QUIZ, &quiz);
        self.source = Some(quiz.clone());
        self.current = Some(quiz);
        self.clear_session_state();
        self.phase = SessionPhase::Configuring;
        self.persist_session_slots();
    }

    /// Begin an attempt. Valid when a quiz is loaded and no question is in
    /// progress; shuffling (when enabled) is re-applied on every start.
    pub fn start(&mut self, prefs: &UserPreferences) -> bool {
        self.start_with_rng(prefs, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng>(&mut self, prefs: &UserPreferences, rng: &mut R) -> bool {
        if self.phase == SessionPhase::Active {
            return false;
        }
        let Some(source) = self.source.as_ref() else {
            return false;
        };

        let mut arranged = source.clone();
        shuffle::shuffle_for_session(&mut arranged, prefs, rng);

        self.session_prefs = prefs.clone();
        self.clear_session_state();
        self.phase = SessionPhase::Active;
        self.question_started = Some(self.clock.now());
        self.events.publish(QuizEvent::SessionStarted {
            quiz_id: arranged.id.clone(),
            question_count: arranged.question_count() as u32,
        });
        debug!(
            quiz_id = %arranged.id,
            shuffle_questions = prefs.shuffle_questions,
            shuffle_options = prefs.shuffle_options,
            "session started"
        );
        self.current = Some(arranged);
        self.persist_session_slots();
        true
    }

    /// Record an answer for the current question. At most one result per
    /// question per attempt: re-answers and foreign option ids are no-ops.
    pub fn answer_question(&mut self, option_id: &str) -> bool {
        if self.phase != SessionPhase::Active || self.current_answered() {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        let Some(option) = question.option(option_id) else {
            debug!(option_id, "answer ignored: option does not belong to the current question");
            return false;
        };

        let is_correct = option.is_correct;
        let selected = Some(option.id.clone());
        let time_taken = self.elapsed_clamped();
        self.record_result(selected, is_correct, time_taken);
        true
    }

    /// Timer expiry for the question the given epoch was armed for.
    /// Equivalent to answering nothing: incorrect, full time charged.
    pub fn time_expire(&mut self, epoch: u64) -> bool {
        if self.phase != SessionPhase::Active
            || epoch != self.timer_epoch
            || self.current_answered()
        {
            debug!(epoch, current_epoch = self.timer_epoch, "expiry ignored");
            return false;
        }
        if self.current_question().is_none() {
            return false;
        }

        let time_taken = self.session_prefs.time_per_question;
        self.record_result(None, false, time_taken);
        true
    }

    /// Advance to the next question; past the last question the session ends.
    pub fn go_to_next_question(&mut self) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        let question_count = self.current.as_ref().map_or(0, Quiz::question_count);
        if self.current_index + 1 >= question_count {
            self.end_session();
            return true;
        }
        self.current_index += 1;
        self.enter_question();
        self.events.publish(QuizEvent::QuestionAdvanced {
            index: self.current_index as u32,
        });
        true
    }

    /// Step back one question; a no-op at the first question.
    pub fn go_to_previous_question(&mut self) -> bool {
        if self.phase != SessionPhase::Active || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.enter_question();
        true
    }

    /// Close the attempt: build the summary, append it to history, persist.
    /// Guarded against double completion.
    pub fn end_session(&mut self) -> bool {
        if self.phase != SessionPhase::Active || self.summary.is_some() {
            return false;
        }
        let Some(quiz) = self.current.as_ref() else {
            return false;
        };

        let summary = summary::summarize(quiz, &self.results, Utc::now());
        info!(
            quiz_id = %summary.quiz_id,
            correct = summary.correct_answers,
            total = summary.total_questions,
            "session ended"
        );
        self.events.publish(QuizEvent::SessionEnded {
            quiz_id: summary.quiz_id.clone(),
            correct_answers: summary.correct_answers,
            total_questions: summary.total_questions,
            total_time: summary.total_time,
        });

        self.phase = SessionPhase::Completed;
        self.question_started = None;
        self.timer_epoch += 1;
        self.persist(keys::CURRENT_SUMMARY, &summary);
        self.history.append(summary.clone());
        self.summary = Some(summary);
        true
    }

    /// Back to configuring; keeps the loaded quiz.
    pub fn reset_session(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.clear_session_state();
        self.phase = SessionPhase::Configuring;
        self.persist_session_slots();
        if let Some(quiz) = self.current.as_ref() {
            self.events.publish(QuizEvent::SessionReset {
                quiz_id: quiz.id.clone(),
            });
        }
        true
    }

    pub fn restart_session(&mut self, prefs: &UserPreferences) -> bool {
        self.restart_session_with_rng(prefs, &mut rand::thread_rng())
    }

    pub fn restart_session_with_rng<R: Rng>(
        &mut self,
        prefs: &UserPreferences,
        rng: &mut R,
    ) -> bool {
        self.reset_session() && self.start_with_rng(prefs, rng)
    }

    // ========== Internals ==========

    fn current_answered(&self) -> bool {
        self.results.len() > self.current_index
    }

    fn elapsed_clamped(&self) -> u32 {
        let elapsed = self
            .question_started
            .map(|started| self.clock.now().saturating_duration_since(started))
            .unwrap_or_default();
        let secs = elapsed.as_secs_f64().round() as u32;
        secs.min(self.session_prefs.time_per_question)
    }

    fn record_result(&mut self, selected: Option<String>, is_correct: bool, time_taken: u32) {
        let Some(question) = self.current_question() else {
            return;
        };
        let result = QuizResult {
            question_id: question.id.clone(),
            selected_option_id: selected,
            is_correct,
            time_taken,
        };

        // The question is settled; a timer still in flight for it is stale.
        self.timer_epoch += 1;
        self.question_started = None;

        self.events.publish(QuizEvent::AnswerRecorded {
            question_id: result.question_id.clone(),
            selected_option_id: result.selected_option_id.clone(),
            is_correct: result.is_correct,
            time_taken: result.time_taken,
        });
        self.results.push(result);
        // Durable before any derived transition.
        self.persist(keys::CURRENT_RESULTS, &self.results);

        if !is_correct && self.session_prefs.restart_on_error {
            self.end_session();
        } else {
            // Ends the session when this was the last question.
            self.go_to_next_question();
        }
    }

    fn enter_question(&mut self) {
        self.timer_epoch += 1;
        self.question_started = Some(self.clock.now());
    }

    fn clear_session_state(&mut self) {
        self.current_index = 0;
        self.results.clear();
        self.summary = None;
        self.question_started = None;
        self.timer_epoch += 1;
    }

    fn persist_session_slots(&self) {
        self.persist(keys::CURRENT_RESULTS, &self.results);
        if let Err(err) = self.store.remove(keys::CURRENT_SUMMARY) {
            warn!(error = %err, "failed to clear stored summary");
        }
    }

    fn persist<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.store.save(key, value) {
            warn!(key, error = %err, "failed to persist session state");
        }
    }
}
