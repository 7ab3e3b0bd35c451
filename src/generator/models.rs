//! Model catalog and selection strategies for quiz generation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpeed {
    Fast,
    Medium,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelQuality {
    Basic,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy)]
pub struct AiModel {
    pub id: &'static str,
    pub name: &'static str,
    pub speed: ModelSpeed,
    pub quality: ModelQuality,
    pub description: &'static str,
}

pub const AVAILABLE_MODELS: &[AiModel] = &[
    AiModel {
        id: "google/gemini-2.0-flash-exp:free",
        name: "Gemini Flash",
        speed: ModelSpeed::Fast,
        quality: ModelQuality::Good,
        description: "Fast and efficient, good answers in most cases.",
    },
    AiModel {
        id: "google/gemini-2.5-pro-exp-03-25:free",
        name: "Gemini Pro",
        speed: ModelSpeed::Medium,
        quality: ModelQuality::Excellent,
        description: "Excellent quality, good balance of speed and accuracy.",
    },
    AiModel {
        id: "deepseek/deepseek-r1:free",
        name: "DeepSeek R1",
        speed: ModelSpeed::Medium,
        quality: ModelQuality::Excellent,
        description: "More precise for complex, structured tasks.",
    },
    AiModel {
        id: "deepseek/deepseek-v3-base:free",
        name: "DeepSeek Base",
        speed: ModelSpeed::Fast,
        quality: ModelQuality::Good,
        description: "Good general performance for medium-difficulty quizzes.",
    },
    AiModel {
        id: "tngtech/deepseek-r1t-chimera:free",
        name: "DeepSeek Chimera",
        speed: ModelSpeed::Slow,
        quality: ModelQuality::Excellent,
        description: "Excellent at well-formed JSON and detailed content.",
    },
    AiModel {
        id: "meta-llama/llama-3.1-8b-instruct:free",
        name: "Llama 3.1 (8B)",
        speed: ModelSpeed::Fast,
        quality: ModelQuality::Basic,
        description: "Fastest, but with simpler answers.",
    },
    AiModel {
        id: "meta-llama/llama-3.3-nemotron-super-49b-v1:free",
        name: "Llama 3.3 Nemotron",
        speed: ModelSpeed::Slow,
        quality: ModelQuality::Excellent,
        description: "Large language model with excellent content quality.",
    },
    AiModel {
        id: "shisa-ai/shisa-v2-llama3.3-70b:free",
        name: "Shisa V2 (70B)",
        speed: ModelSpeed::Slow,
        quality: ModelQuality::Excellent,
        description: "Large model with high accuracy and advanced reasoning.",
    },
];

/// Ordering preference when trying models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelStrategy {
    Balanced,
    Speed,
    Quality,
    ReliableJson,
}

impl ModelSpeed {
    fn rank(self) -> u8 {
        match self {
            ModelSpeed::Fast => 0,
            ModelSpeed::Medium => 1,
            ModelSpeed::Slow => 2,
        }
    }
}

impl ModelQuality {
    fn rank(self) -> u8 {
        match self {
            ModelQuality::Excellent => 0,
            ModelQuality::Good => 1,
            ModelQuality::Basic => 2,
        }
    }
}

/// Model ids in the order the given strategy wants them tried.
pub fn models_by_strategy(strategy: ModelStrategy) -> Vec<&'static str> {
    match strategy {
        ModelStrategy::Speed => {
            let mut models: Vec<&AiModel> = AVAILABLE_MODELS.iter().collect();
            models.sort_by_key(|m| m.speed.rank());
            models.into_iter().map(|m| m.id).collect()
        }
        ModelStrategy::Quality => {
            let mut models: Vec<&AiModel> = AVAILABLE_MODELS.iter().collect();
            models.sort_by_key(|m| m.quality.rank());
            models.into_iter().map(|m| m.id).collect()
        }
        // Models that most consistently return parseable JSON first.
        ModelStrategy::ReliableJson => vec![
            "tngtech/deepseek-r1t-chimera:free",
            "deepseek/deepseek-r1:free",
            "google/gemini-2.5-pro-exp-03-25:free",
            "deepseek/deepseek-v3-base:free",
            "shisa-ai/shisa-v2-llama3.3-70b:free",
            "meta-llama/llama-3.3-nemotron-super-49b-v1:free",
            "google/gemini-2.0-flash-exp:free",
            "meta-llama/llama-3.1-8b-instruct:free",
        ],
        ModelStrategy::Balanced => vec![
            "deepseek/deepseek-v3-base:free",
            "google/gemini-2.0-flash-exp:free",
            "deepseek/deepseek-r1:free",
            "google/gemini-2.5-pro-exp-03-25:free",
            "tngtech/deepseek-r1t-chimera:free",
            "meta-llama/llama-3.1-8b-instruct:free",
            "meta-llama/llama-3.3-nemotron-super-49b-v1:free",
            "shisa-ai/shisa-v2-llama3.3-70b:free",
        ],
    }
}
