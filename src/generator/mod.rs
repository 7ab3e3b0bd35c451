//! AI authoring flow: prompt templating, model selection, generation client,
//! and the generator-form state carried between sessions.
//!
//! The session engine never calls into this module; generated JSON goes
//! through [`crate::ingest`] like any hand-written import.

pub mod client;
pub mod models;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{keys, KeyValueStore, StoreExt};

pub use client::{GenerateError, GeneratedQuiz, GeneratorClient};
pub use models::{AiModel, ModelQuality, ModelSpeed, ModelStrategy, AVAILABLE_MODELS};
pub use prompt::{build_prompt, GeneratorSettings};

/// Authoring-form state remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastGeneratorConfig {
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub option_count: Option<u32>,
    #[serde(default)]
    pub difficulty: String,
}

pub fn load_last_config(store: &dyn KeyValueStore) -> LastGeneratorConfig {
    store.load_or(keys::LAST_GENERATOR_CONFIG, LastGeneratorConfig::default())
}

pub fn save_last_config(store: &dyn KeyValueStore, config: &LastGeneratorConfig) {
    if let Err(err) = store.save(keys::LAST_GENERATOR_CONFIG, config) {
        warn!(error = %err, "failed to persist generator config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_last_config_roundtrip() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        assert_eq!(load_last_config(store.as_ref()), LastGeneratorConfig::default());

        let config = LastGeneratorConfig {
            question_count: Some(10),
            option_count: Some(4),
            difficulty: "hard".to_string(),
        };
        save_last_config(store.as_ref(), &config);
        assert_eq!(load_last_config(store.as_ref()), config);
    }
}
