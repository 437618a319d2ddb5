use crate::services::{
    prompt::RecipePrompt,
    providers::{GenerativeProvider, UpstreamError},
};

/// Stand-in used when no API key is configured; never available
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

#[async_trait::async_trait]
impl GenerativeProvider for DisabledProvider {
    async fn is_available(&self) -> bool {
        false
    }

    async fn complete(&self, _prompt: &RecipePrompt) -> Result<String, UpstreamError> {
        Err(UpstreamError::NotConfigured)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
