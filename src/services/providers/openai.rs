//! OpenAI-compatible chat completion provider
//!
//! Works against api.openai.com or any server exposing the same `/models` and
//! `/chat/completions` endpoints.
//!
//! API Flow:
//! 1. Availability: GET /models with the bearer key → any 2xx means usable
//! 2. Generation: POST /chat/completions → first choice's message content
use crate::{
    config::Config,
    services::{
        prompt::RecipePrompt,
        providers::{GenerativeProvider, UpstreamError},
    },
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
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
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Overrides the token ceiling and sampling temperature
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Builds a provider when an API key is configured
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.api_key()?;
        Some(
            Self::new(
                api_key.to_string(),
                config.openai_base_url.clone(),
                config.openai_model.clone(),
            )
            .with_sampling(config.generation_max_tokens, config.generation_temperature),
        )
    }

    /// Extracts the most useful message from a failed response
    async fn api_error(response: reqwest::Response) -> UpstreamError {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return UpstreamError::RateLimited { retry_after_secs };
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or(body);

        UpstreamError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for OpenAiProvider {
    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    status = %response.status(),
                    provider = "openai",
                    "Capability probe rejected"
                );
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, provider = "openai", "Capability probe failed");
                false
            }
        }
    }

    async fn complete(&self, prompt: &RecipePrompt) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, provider = "openai", "Requesting completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = Self::api_error(response).await;
            tracing::error!(error = %error, provider = "openai", "Completion request failed");
            return Err(error);
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(UpstreamError::EmptyResponse)?;

        tracing::info!(
            model = %self.model,
            chars = content.len(),
            provider = "openai",
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
