//! Generative text backend abstraction
//!
//! The recipe pipeline talks to the model through this trait so the backend can
//! be swapped (or faked in tests) without touching the orchestration logic.
//! Implementations own their transport and must translate every failure into an
//! [`UpstreamError`].
use std::sync::Arc;
use std::time::Duration;

use crate::{config::Config, services::prompt::RecipePrompt};

pub mod disabled;
pub mod openai;

pub use disabled::DisabledProvider;
pub use openai::OpenAiProvider;

/// Failure talking to the generation backend
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Generation backend is not configured")]
    NotConfigured,

    #[error("Request to generation backend failed: {0}")]
    RequestFailed(String),

    #[error("Generation backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Generation backend rate limited the request, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Generation backend returned no content")]
    EmptyResponse,

    #[error("Generation backend did not answer within {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(error: reqwest::Error) -> Self {
        UpstreamError::RequestFailed(error.to_string())
    }
}

/// Trait for text generation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Whether the backend can be used right now
    ///
    /// Requires credentials AND a successful capability probe. A configured
    /// key whose probe fails counts as unavailable.
    async fn is_available(&self) -> bool;

    /// Sends the prompt and returns the raw completion text
    async fn complete(&self, prompt: &RecipePrompt) -> Result<String, UpstreamError>;

    /// Provider name for logging and health reporting
    fn name(&self) -> &'static str;
}

/// Picks the backend from configuration: OpenAI when a key is set, disabled otherwise
pub fn create_provider(config: &Config) -> Arc<dyn GenerativeProvider> {
    match OpenAiProvider::from_config(config) {
        Some(provider) => {
            tracing::info!(
                model = %config.openai_model,
                base_url = %config.openai_base_url,
                "Recipe generation backend configured"
            );
            Arc::new(provider)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, recipes will come from the fallback generator");
            Arc::new(DisabledProvider)
        }
    }
}
