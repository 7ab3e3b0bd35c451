//! User playback preferences.
//!
//! A fixed struct with a hardcoded default table. Loading merges a persisted
//! partial object over the defaults field by field; unknown keys in the stored
//! document are ignored rather than carried along. Range enforcement is the
//! input layer's job; the store accepts whatever it is given.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{keys, KeyValueStore, StoreExt};

pub const DEFAULT_TIME_PER_QUESTION: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationTiming {
    AfterEach,
    AtEnd,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub time_per_question: u32,
    pub restart_on_error: bool,
    pub show_explanations: ExplanationTiming,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub theme: Theme,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            time_per_question: DEFAULT_TIME_PER_QUESTION,
            restart_on_error: false,
            show_explanations: ExplanationTiming::AfterEach,
            shuffle_questions: false,
            shuffle_options: false,
            theme: Theme::Light,
        }
    }
}

/// Partial update; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default)]
    pub time_per_question: Option<u32>,
    #[serde(default)]
    pub restart_on_error: Option<bool>,
    #[serde(default)]
    pub show_explanations: Option<ExplanationTiming>,
    #[serde(default)]
    pub shuffle_questions: Option<bool>,
    #[serde(default)]
    pub shuffle_options: Option<bool>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl UserPreferences {
    /// Shallow-merge a patch; only known fields are considered.
    pub fn merge(&mut self, patch: &PreferencesPatch) {
        if let Some(v) = patch.time_per_question {
            self.time_per_question = v;
        }
        if let Some(v) = patch.restart_on_error {
            self.restart_on_error = v;
        }
        if let Some(v) = patch.show_explanations {
            self.show_explanations = v;
        }
        if let Some(v) = patch.shuffle_questions {
            self.shuffle_questions = v;
        }
        if let Some(v) = patch.shuffle_options {
            self.shuffle_options = v;
        }
        if let Some(v) = patch.theme {
            self.theme = v;
        }
    }
}

/// Loads once at startup, persists synchronously after every mutation.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    current: UserPreferences,
}

impl PreferenceStore {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut current = UserPreferences::default();
        let patch: PreferencesPatch = store.load_or(keys::USER_PREFERENCES, PreferencesPatch::default());
        current.merge(&patch);
        Self { store, current }
    }

    pub fn current(&self) -> &UserPreferences {
        &self.current
    }

    pub fn update(&mut self, patch: &PreferencesPatch) -> &UserPreferences {
        self.current.merge(patch);
        self.persist();
        &self.current
    }

    pub fn reset(&mut self) -> &UserPreferences {
        self.current = UserPreferences::default();
        self.persist();
        &self.current
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(keys::USER_PREFERENCES, &self.current) {
            warn!(error = %err, "failed to persist preferences");
        }
    }
}
