//! Chat-completions client with per-strategy model fallback.
//!
//! Tries each model in the strategy's order until one returns a reply that
//! contains a parseable JSON object; the reply still goes through the regular
//! ingestion validation before anything is loaded into a session.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generator::models::{models_by_strategy, ModelStrategy};
use crate::ingest;

const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const APP_REFERER: &str = "https://hastyquiz.app";
const APP_TITLE: &str = "HastyQuiz";

const FORMAT_INSTRUCTIONS: &str = "\
FORMAT INSTRUCTIONS:\n\
- Reply ONLY with valid JSON\n\
- Do NOT include markdown code blocks (such as ```json)\n\
- Do NOT include explanations, reasoning, or any text that is not part of the JSON\n\
- Make sure every string is wrapped in double quotes\n\
- Check that every field (type, isCorrect, etc.) is correctly formatted\n\
- The JSON must start with { and end with } with no characters before or after";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generator API key not configured (set OPENROUTER_API_KEY)")]
    MissingApiKey,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model {model} returned an empty reply")]
    EmptyReply { model: String },

    #[error("model {model} returned data that is not valid JSON: {message}")]
    MalformedReply { model: String, message: String },

    #[error("all available models failed; last error: {last_error}")]
    AllModelsFailed { last_error: String },
}

/// A successful generation: which model produced it and the JSON text.
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub model: String,
    pub json: String,
}

pub struct GeneratorClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeneratorClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Read `OPENROUTER_API_KEY` (and optional `OPENROUTER_BASE_URL`).
    pub fn from_env() -> Result<Self, GenerateError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerateError::MissingApiKey)?;
        let mut client = Self::new(api_key);
        if let Ok(endpoint) = std::env::var("OPENROUTER_BASE_URL") {
            if !endpoint.trim().is_empty() {
                client.endpoint = endpoint;
            }
        }
        Ok(client)
    }

    /// Generate quiz JSON, falling back through the strategy's model order.
    pub async fn generate(
        &self,
        prompt: &str,
        strategy: ModelStrategy,
    ) -> Result<GeneratedQuiz, GenerateError> {
        let enhanced_prompt = format!("{prompt}\n\n{FORMAT_INSTRUCTIONS}");
        let mut last_error = String::from("no models attempted");

        for model in models_by_strategy(strategy) {
            match self.try_model(model, &enhanced_prompt).await {
                Ok(json) => {
                    info!(model, "quiz generated");
                    return Ok(GeneratedQuiz {
                        model: model.to_string(),
                        json,
                    });
                }
                Err(err) => {
                    warn!(model, error = %err, "generation attempt failed");
                    last_error = err.to_string();
                }
            }
        }

        Err(GenerateError::AllModelsFailed { last_error })
    }

    async fn try_model(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.5,
            max_tokens: 4000,
            top_p: 0.9,
            frequency_penalty: 0.2,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        let content = content.trim();
        if content.is_empty() {
            return Err(GenerateError::EmptyReply {
                model: model.to_string(),
            });
        }

        let json = ingest::extract_json_object(content).map_err(|_| {
            GenerateError::MalformedReply {
                model: model.to_string(),
                message: "no JSON object found in the reply".to_string(),
            }
        })?;
        if let Err(err) = serde_json::from_str::<serde_json::Value>(json) {
            return Err(GenerateError::MalformedReply {
                model: model.to_string(),
                message: err.to_string(),
            });
        }

        Ok(json.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}
