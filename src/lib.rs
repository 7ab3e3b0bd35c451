//! # hastyquiz-core
//!
//! Session engine and authoring flow for the HastyQuiz application: quiz
//! documents are imported (hand-written or AI-generated) through a validating
//! ingestion boundary, played under a per-question countdown by a session
//! state machine, scored into immutable summaries, and recorded in a durable
//! attempt history. The crate has no process boundary of its own; a host UI
//! drives it through [`session::SessionHandle`] and renders its state.
//!
//! Module map:
//!
//! - [`model`] - the quiz document and result/summary types
//! - [`ingest`] - JSON validation and normalization
//! - [`prefs`] - playback preferences with merge-over-defaults loading
//! - [`storage`] - key/value persistence boundary
//! - [`session`] - the state machine, timer, shuffle, and scoring
//! - [`history`] - summary history and the saved-quiz roster
//! - [`events`] - lifecycle event bus for the presentation layer
//! - [`generator`] - prompt templating and the AI generation client
//! - [`logging`] - tracing setup for embedding hosts

pub mod events;
pub mod generator;
pub mod history;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod session;
pub mod storage;

pub use events::{EventBus, EventEnvelope, QuizEvent};
pub use history::{HistoryStore, SavedQuizzes};
pub use ingest::{validate_quiz_json, ValidationError};
pub use model::{Quiz, QuizOption, QuizQuestion, QuizResult, QuizSummary, QuestionType};
pub use prefs::{ExplanationTiming, PreferenceStore, PreferencesPatch, Theme, UserPreferences};
pub use session::{SessionEngine, SessionHandle, SessionPhase};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError, StoreExt};
